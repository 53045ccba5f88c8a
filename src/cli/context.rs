//! CLI Context for dependency injection and shared state
//!
//! Built once per invocation after flag resolution; handlers borrow it and
//! never look at raw flags again.

use super::output::Printer;
use crate::cache::CacheManager;
use crate::config::{ConfigManager, GenforgeDirs};
use crate::errors::AppResult;
use crate::prompt::{Prompter, StdinPrompter};
use crate::resolve::ResolvedRunConfig;

pub struct CliContext {
    pub run: ResolvedRunConfig,
    pub config_manager: ConfigManager,
    pub printer: Printer,
}

impl CliContext {
    pub fn new(run: ResolvedRunConfig, dirs: GenforgeDirs) -> AppResult<Self> {
        let config_manager = ConfigManager::new(dirs)?;
        let printer = Printer::new(run.format, run.output.level);
        tracing::debug!(
            config = %config_manager.settings_path().display(),
            cache = %config_manager.dirs().cache_dir.display(),
            "context ready"
        );
        Ok(Self {
            run,
            config_manager,
            printer,
        })
    }

    /// The render cache, unless disabled in settings
    pub fn cache(&self) -> Option<CacheManager> {
        let settings = &self.config_manager.settings().cache;
        settings.enabled.then(|| self.cache_manager())
    }

    /// The cache directory regardless of the enabled setting
    pub fn cache_manager(&self) -> CacheManager {
        CacheManager::new(
            self.config_manager.dirs().cache_dir.clone(),
            self.config_manager.settings().cache.max_entries,
        )
    }

    pub fn prompter(&self) -> Box<dyn Prompter> {
        Box::new(StdinPrompter)
    }

    /// Ask before a destructive action. Skipped with `--yes`; refused when
    /// prompting is impossible.
    pub fn confirm(&self, question: &str, assume_yes: bool) -> AppResult<bool> {
        if assume_yes {
            return Ok(true);
        }
        if !self.run.can_prompt() {
            return Err(crate::errors::AppError::invalid_argument(
                "--yes",
                "confirmation required but prompting is disabled (non-interactive run)",
            ));
        }
        self.prompter().confirm(question, false)
    }
}
