//! Interactive questions
//!
//! Only reached when the resolved mode allows prompting; the handlers never
//! construct a prompter for non-interactive runs.

use crate::errors::{AppError, AppResult};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Ask for a line of text. An empty answer takes `default` when given.
    fn ask(&mut self, question: &str, default: Option<&str>) -> AppResult<String>;

    /// Yes/no question
    fn confirm(&mut self, question: &str, default: bool) -> AppResult<bool>;
}

/// Prompts on stderr, answers from stdin
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(&self, prompt: &str) -> AppResult<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", prompt)
            .and_then(|_| stderr.flush())
            .map_err(|e| AppError::prompt(format!("failed to write prompt: {}", e)))?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::prompt(format!("failed to read answer: {}", e)))?;
        if read == 0 {
            return Err(AppError::prompt("input closed before an answer was given"));
        }
        Ok(line.trim().to_string())
    }
}

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> AppResult<String> {
        let prompt = match default {
            Some(d) => format!("{} [{}]: ", question, d),
            None => format!("{}: ", question),
        };
        let answer = self.read_line(&prompt)?;
        Ok(choose(answer, default))
    }

    fn confirm(&mut self, question: &str, default: bool) -> AppResult<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.read_line(&format!("{} [{}]: ", question, hint))?;
            if let Some(value) = parse_yes_no(&answer, default) {
                return Ok(value);
            }
        }
    }
}

fn choose(answer: String, default: Option<&str>) -> String {
    match default {
        Some(d) if answer.is_empty() => d.to_string(),
        _ => answer,
    }
}

fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Answers queued up front; running out is a prompt error
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, question: &str) -> AppResult<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| AppError::prompt(format!("no scripted answer for '{}'", question)))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> AppResult<String> {
        let answer = self.next(question)?;
        Ok(choose(answer.trim().to_string(), default))
    }

    fn confirm(&mut self, question: &str, default: bool) -> AppResult<bool> {
        let answer = self.next(question)?;
        parse_yes_no(&answer, default)
            .ok_or_else(|| AppError::prompt(format!("'{}' is not a yes/no answer", answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_parsing() {
        assert_eq!(parse_yes_no("", true), Some(true));
        assert_eq!(parse_yes_no("YES", false), Some(true));
        assert_eq!(parse_yes_no(" n ", true), Some(false));
        assert_eq!(parse_yes_no("maybe", true), None);
    }

    #[test]
    fn test_scripted_defaults_and_exhaustion() {
        let mut prompter = ScriptedPrompter::new(["", "custom"]);
        assert_eq!(prompter.ask("Template", Some("basic")).unwrap(), "basic");
        assert_eq!(prompter.ask("Author", Some("Ada")).unwrap(), "custom");
        assert!(matches!(
            prompter.ask("License", None),
            Err(AppError::Prompt { .. })
        ));
        assert_eq!(prompter.asked, vec!["Template", "Author", "License"]);
    }
}
