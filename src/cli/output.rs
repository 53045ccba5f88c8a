//! Rendering of command results on stdout

use crate::errors::AppResult;
use crate::resolve::{OutputFormat, OutputLevel};
use serde::Serialize;

/// Human-readable rendering of a result
pub trait TextRender {
    fn render_text(&self) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
    level: OutputLevel,
}

impl Printer {
    pub fn new(format: OutputFormat, level: OutputLevel) -> Self {
        Self { format, level }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T>(&self, value: &T) -> AppResult<String>
    where
        T: Serialize + TextRender,
    {
        Ok(match self.format {
            OutputFormat::Text => value.render_text(),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }

    /// Results are printed at every output level
    pub fn print<T>(&self, value: &T) -> AppResult<()>
    where
        T: Serialize + TextRender,
    {
        let rendered = self.render(value)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }

    /// Whether an informational line would be shown
    pub fn shows_info(&self) -> bool {
        self.format == OutputFormat::Text && !self.level.is_quiet()
    }

    /// Side note for humans; dropped in quiet mode and machine formats
    pub fn info(&self, line: impl AsRef<str>) {
        if self.shows_info() {
            println!("{}", line.as_ref());
        }
    }
}
