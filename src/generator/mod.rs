//! Project generation workflow
//!
//! The resolved [`GenerationMode`] decides where inputs come from:
//! prompts, flags plus settings defaults, or a saved configuration.

pub mod audit;
pub mod templates;

use crate::cache::{cache_key, CacheManager};
use crate::config::{GenerationDefaults, GenerationProfile, ProfileStore};
use crate::errors::{AppError, AppResult, ErrorContextExt};
use crate::prompt::Prompter;
use crate::resolve::GenerationMode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use templates::{RenderedFile, TemplateContext, TemplateEngine};
use tracing::{debug, info, warn};

/// Inputs of `genforge generate`, all optional until a mode fills them
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub name: Option<String>,
    pub template: Option<String>,
    pub output: Option<PathBuf>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub license: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub config_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub force: bool,
    pub dry_run: bool,
}

/// Fully resolved inputs, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub template: String,
    pub output_dir: PathBuf,
    pub context: TemplateContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub project_name: String,
    pub template: String,
    pub mode: GenerationMode,
    pub output_dir: PathBuf,
    pub files: Vec<String>,
    pub dry_run: bool,
    pub cache_hit: bool,
}

/// Project names become package and directory names
pub fn validate_project_name(name: &str) -> AppResult<()> {
    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if starts_with_letter && allowed && name.len() <= 64 {
        Ok(())
    } else {
        Err(AppError::invalid_argument(
            format!("project name '{}'", name),
            "must start with a letter and contain only letters, digits, '-' and '_' (max 64)",
        ))
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

pub struct Generator<'a> {
    engine: &'a TemplateEngine,
    defaults: &'a GenerationDefaults,
    profiles: &'a ProfileStore,
    cache: Option<&'a CacheManager>,
}

impl<'a> Generator<'a> {
    pub fn new(
        engine: &'a TemplateEngine,
        defaults: &'a GenerationDefaults,
        profiles: &'a ProfileStore,
    ) -> Self {
        Self {
            engine,
            defaults,
            profiles,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Option<&'a CacheManager>) -> Self {
        self.cache = cache;
        self
    }

    /// Gather inputs the way `mode` prescribes
    pub fn plan(
        &self,
        mode: GenerationMode,
        request: &GenerationRequest,
        prompter: &mut dyn Prompter,
    ) -> AppResult<GenerationPlan> {
        let (name, template, mut context) = match mode {
            GenerationMode::Interactive => self.gather_interactive(request, prompter)?,
            GenerationMode::NonInteractive => self.gather_from_flags(request)?,
            GenerationMode::Config => self.gather_from_profile(request)?,
            GenerationMode::Auto => {
                return Err(AppError::generation("generation mode was not resolved"));
            }
        };
        TemplateEngine::find(&template)?;

        let variables = std::mem::take(&mut context.variables);
        let context = context.with_variables(variables);
        let output_dir = request.output.clone().unwrap_or_else(|| PathBuf::from(&name));
        debug!(%mode, template = %template, output = %output_dir.display(), "planned generation");

        Ok(GenerationPlan {
            template,
            output_dir,
            context,
        })
    }

    fn gather_interactive(
        &self,
        request: &GenerationRequest,
        prompter: &mut dyn Prompter,
    ) -> AppResult<(String, String, TemplateContext)> {
        let name = match non_blank(request.name.as_ref()) {
            Some(name) => name,
            None => prompter.ask("Project name", None)?,
        };
        validate_project_name(&name)?;

        let template = match non_blank(request.template.as_ref()) {
            Some(template) => template,
            None => {
                let choices: Vec<_> = TemplateEngine::catalog().iter().map(|t| t.name).collect();
                prompter.ask(
                    &format!("Template ({})", choices.join(", ")),
                    Some(self.defaults.template.as_str()),
                )?
            }
        };

        let mut context = TemplateContext::new(&name);
        context.description = match non_blank(request.description.as_ref()) {
            Some(d) => d,
            None => prompter.ask("Description", Some(""))?,
        };
        context.author = match non_blank(request.author.as_ref()) {
            Some(a) => a,
            None => prompter.ask("Author", Some(self.defaults.author.as_deref().unwrap_or("")))?,
        };
        context.license = match non_blank(request.license.as_ref()) {
            Some(l) => l,
            None => prompter.ask("License", Some(self.defaults.license.as_str()))?,
        };
        context.variables = request.variables.clone();
        Ok((name, template, context))
    }

    fn gather_from_flags(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<(String, String, TemplateContext)> {
        let name = non_blank(request.name.as_ref()).ok_or_else(|| {
            AppError::invalid_argument(
                "<NAME>",
                "a project name is required in non-interactive mode",
            )
        })?;
        validate_project_name(&name)?;

        let template =
            non_blank(request.template.as_ref()).unwrap_or_else(|| self.defaults.template.clone());
        let mut context = TemplateContext::new(&name);
        context.description = non_blank(request.description.as_ref()).unwrap_or_default();
        context.author = non_blank(request.author.as_ref())
            .or_else(|| self.defaults.author.clone())
            .unwrap_or_default();
        context.license =
            non_blank(request.license.as_ref()).unwrap_or_else(|| self.defaults.license.clone());
        context.variables = request.variables.clone();
        Ok((name, template, context))
    }

    fn gather_from_profile(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<(String, String, TemplateContext)> {
        let profile = match (&request.config_file, non_blank(request.profile.as_ref())) {
            (Some(path), _) => GenerationProfile::from_file(path)?,
            (None, Some(name)) => self.profiles.load(&name)?,
            (None, None) => {
                return Err(AppError::invalid_argument(
                    "--mode=config-file",
                    "config mode needs --config-file <PATH> or --profile <NAME>",
                ));
            }
        };
        info!(profile = %profile.name, "using saved configuration");

        // Explicit flags win over the saved values
        let name = non_blank(request.name.as_ref()).unwrap_or_else(|| profile.name.clone());
        validate_project_name(&name)?;
        let template = non_blank(request.template.as_ref()).unwrap_or(profile.template);

        let mut context = TemplateContext::new(&name);
        context.description = non_blank(request.description.as_ref())
            .or(profile.description)
            .unwrap_or_default();
        context.author = non_blank(request.author.as_ref())
            .or(profile.author)
            .or_else(|| self.defaults.author.clone())
            .unwrap_or_default();
        context.license = non_blank(request.license.as_ref())
            .or(profile.license)
            .unwrap_or_else(|| self.defaults.license.clone());
        let mut variables = profile.variables;
        variables.extend(request.variables.clone());
        context.variables = variables;
        Ok((name, template, context))
    }

    /// Plan, render (through the cache when enabled) and write the project
    pub async fn run(
        &self,
        mode: GenerationMode,
        request: &GenerationRequest,
        prompter: &mut dyn Prompter,
    ) -> AppResult<GenerationOutcome> {
        let plan = self.plan(mode, request, prompter)?;

        if !request.dry_run && !request.force && is_non_empty_dir(&plan.output_dir).await? {
            return Err(AppError::generation(format!(
                "output directory {} is not empty (use --force to write into it)",
                plan.output_dir.display()
            )));
        }

        let (files, cache_hit) = self.render(&plan)?;
        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();

        if request.dry_run {
            info!(files = paths.len(), "dry run, nothing written");
        } else {
            write_files(&plan.output_dir, &files).await?;
            info!(
                project = %plan.context.project_name,
                output = %plan.output_dir.display(),
                files = paths.len(),
                "project generated"
            );
        }

        Ok(GenerationOutcome {
            project_name: plan.context.project_name.clone(),
            template: plan.template,
            mode,
            output_dir: plan.output_dir,
            files: paths,
            dry_run: request.dry_run,
            cache_hit,
        })
    }

    fn render(&self, plan: &GenerationPlan) -> AppResult<(Vec<RenderedFile>, bool)> {
        let Some(cache) = self.cache else {
            return Ok((self.engine.render_project(&plan.template, &plan.context)?, false));
        };

        let key = cache_key(&plan.template, &cache_fields(&plan.context));
        match cache.get(&key) {
            Ok(Some(files)) => return Ok((files, true)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cache unavailable, rendering directly"),
        }

        let files = self.engine.render_project(&plan.template, &plan.context)?;
        if let Err(e) = cache.put(&key, &plan.template, &files) {
            warn!(error = %e, "failed to store render in cache");
        }
        Ok((files, false))
    }
}

/// Every input that affects the rendered output
fn cache_fields(context: &TemplateContext) -> BTreeMap<String, String> {
    let mut fields = context.variables.clone();
    fields.insert("project_name".to_string(), context.project_name.clone());
    fields.insert("description".to_string(), context.description.clone());
    fields.insert("author".to_string(), context.author.clone());
    fields.insert("license".to_string(), context.license.clone());
    fields.insert("year".to_string(), context.year.to_string());
    fields
}

async fn is_non_empty_dir(dir: &Path) -> AppResult<bool> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(false);
    }
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .in_file_operation(dir, "read output directory")?;
    Ok(entries
        .next_entry()
        .await
        .in_file_operation(dir, "read output directory")?
        .is_some())
}

async fn write_files(root: &Path, files: &[RenderedFile]) -> AppResult<()> {
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .in_file_operation(parent, "create project directory")?;
        }
        tokio::fs::write(&path, &file.content)
            .await
            .in_file_operation(&path, "write project file")?;
        debug!(path = %path.display(), "wrote file");
    }
    Ok(())
}
