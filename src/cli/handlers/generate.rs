//! `genforge generate`

use super::super::commands::GenerateArgs;
use super::super::flags::{mode_flags, parse_vars};
use super::super::output::TextRender;
use super::super::CliContext;
use crate::generator::templates::TemplateEngine;
use crate::generator::{GenerationOutcome, GenerationRequest, Generator};
use crate::resolve::{GenerationMode, ModeResolution, ModeSource};
use anyhow::Result;
use tracing::info;

pub struct GenerateHandler<'a> {
    context: &'a CliContext,
}

impl<'a> GenerateHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub async fn handle(&self, args: GenerateArgs) -> Result<()> {
        let resolution = self.context.run.resolve_mode(&mode_flags(&args.mode))?;
        let mode = effective_mode(&resolution, &args);
        info!(%mode, source = %resolution.source, "resolved generation mode");

        let request = GenerationRequest {
            name: args.name,
            template: args.template,
            output: args.output,
            description: args.description,
            author: args.author,
            license: args.license,
            variables: parse_vars(&args.vars)?,
            config_file: args.config_file,
            profile: args.profile,
            force: args.force,
            dry_run: args.dry_run,
        };

        let engine = TemplateEngine::new()?;
        let settings = self.context.config_manager.settings();
        let profiles = self.context.config_manager.profiles();
        let cache = self.context.cache();
        let generator =
            Generator::new(&engine, &settings.defaults, &profiles).with_cache(cache.as_ref());

        let mut prompter = self.context.prompter();
        let outcome = generator.run(mode, &request, prompter.as_mut()).await?;
        self.context.printer.print(&outcome)?;
        Ok(())
    }
}

/// A saved-configuration source implies config mode unless a flag chose
/// otherwise.
fn effective_mode(resolution: &ModeResolution, args: &GenerateArgs) -> GenerationMode {
    let has_profile = args.config_file.is_some() || args.profile.is_some();
    match resolution.source {
        ModeSource::Environment(_) if has_profile => GenerationMode::Config,
        _ => resolution.mode,
    }
}

impl TextRender for GenerationOutcome {
    fn render_text(&self) -> String {
        let verb = if self.dry_run { "Would generate" } else { "Generated" };
        let mut out = format!(
            "{} {} from template '{}' in {}",
            verb,
            self.project_name,
            self.template,
            self.output_dir.display()
        );
        for file in &self.files {
            out.push_str("\n  ");
            out.push_str(file);
        }
        out
    }
}
