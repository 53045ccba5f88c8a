//! `genforge version [--check]`

use super::super::output::TextRender;
use super::super::CliContext;
use crate::version::{check_for_update, HttpReleaseSource, UpdateCheck, VERSION};
use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<UpdateCheck>,
}

impl TextRender for VersionInfo {
    fn render_text(&self) -> String {
        let mut out = format!("genforge {}", self.version);
        if let Some(target) = &self.target {
            out.push_str(&format!("\ntarget: {}", target));
        }
        if let Some(update) = &self.update {
            if update.update_available {
                out.push_str(&format!("\nUpdate available: {}", update.latest));
                if let Some(url) = &update.url {
                    out.push_str(&format!(" ({})", url));
                }
            } else {
                out.push_str("\nUp to date");
            }
        }
        out
    }
}

pub struct VersionHandler<'a> {
    context: &'a CliContext,
}

impl<'a> VersionHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub async fn handle(&self, check: bool) -> Result<()> {
        let target = self
            .context
            .run
            .output
            .level
            .is_chatty()
            .then(|| format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS));

        let update = if check {
            let settings = &self.context.config_manager.settings().update;
            let source =
                HttpReleaseSource::new(&settings.url, Duration::from_secs(settings.timeout_secs))?;
            Some(check_for_update(&source).await?)
        } else {
            None
        };

        self.context.printer.print(&VersionInfo {
            version: VERSION,
            target,
            update,
        })?;
        Ok(())
    }
}
