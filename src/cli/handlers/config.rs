//! Saved configuration management handler

use super::super::commands::ConfigAction;
use super::super::flags::parse_vars;
use super::super::output::TextRender;
use super::super::CliContext;
use super::Done;
use crate::config::profiles::ProfileSummary;
use crate::config::GenerationProfile;
use crate::errors::ErrorContextExt;
use anyhow::Result;
use serde::Serialize;
use std::fs;

pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ProfileList(Vec<ProfileSummary>);

impl TextRender for ProfileList {
    fn render_text(&self) -> String {
        if self.0.is_empty() {
            return "No saved configurations".to_string();
        }
        let width = self.0.iter().map(|p| p.name.len()).max().unwrap_or(0);
        self.0
            .iter()
            .map(|p| {
                format!(
                    "{:<width$}  {:<8}  {}",
                    p.name,
                    p.template,
                    p.created_at.format("%Y-%m-%d %H:%M"),
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextRender for GenerationProfile {
    fn render_text(&self) -> String {
        let mut out = format!("name: {}\ntemplate: {}", self.name, self.template);
        let optional = [
            ("description", &self.description),
            ("author", &self.author),
            ("license", &self.license),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                out.push_str(&format!("\n{}: {}", label, value));
            }
        }
        for (key, value) in &self.variables {
            out.push_str(&format!("\nvar {}={}", key, value));
        }
        out.push_str(&format!("\ncreated: {}", self.created_at.to_rfc3339()));
        out
    }
}

impl<'a> ConfigHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle(&self, action: ConfigAction) -> Result<()> {
        let store = self.context.config_manager.profiles();
        let printer = &self.context.printer;

        match action {
            ConfigAction::List => printer.print(&ProfileList(store.list()?))?,
            ConfigAction::View { name } => printer.print(&store.load(&name)?)?,
            ConfigAction::Save {
                name,
                template,
                description,
                author,
                license,
                vars,
                force,
            } => {
                let mut profile = GenerationProfile::new(name, template);
                profile.description = description;
                profile.author = author;
                profile.license = license;
                profile.variables = parse_vars(&vars)?;
                let path = store.save(&profile, force)?;
                printer.print(&Done {
                    action: "Saved configuration",
                    name: profile.name,
                    path: Some(path),
                })?;
            }
            ConfigAction::Delete { name, yes } => {
                // Fail on unknown names before asking
                store.load(&name)?;
                let question = format!("Delete saved configuration '{}'?", name);
                if !self.context.confirm(&question, yes)? {
                    printer.info("Aborted");
                    return Ok(());
                }
                store.delete(&name)?;
                printer.print(&Done {
                    action: "Deleted configuration",
                    name,
                    path: None,
                })?;
            }
            ConfigAction::Export { name, output } => {
                let content = store.export(&name)?;
                match output {
                    Some(path) => {
                        fs::write(&path, content).in_file_operation(&path, "write exported configuration")?;
                        printer.print(&Done {
                            action: "Exported configuration",
                            name,
                            path: Some(path),
                        })?;
                    }
                    // Raw TOML so it can be redirected into a file
                    None => print!("{}", content),
                }
            }
            ConfigAction::Import { file, name, force } => {
                let profile = store.import(&file, name.as_deref(), force)?;
                printer.print(&Done {
                    action: "Imported configuration",
                    name: profile.name,
                    path: Some(file),
                })?;
            }
        }
        Ok(())
    }
}
