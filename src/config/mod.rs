//! Settings, saved configurations and the genforge home directory

pub mod profiles;
pub mod settings;

use crate::errors::{AppError, AppResult};
use crate::resolve::environment::EnvSource;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub use profiles::{GenerationProfile, ProfileStore};
pub use settings::{CacheSettings, GenerationDefaults, Settings, UpdateSettings};

/// Overrides the base directory for settings, saved configs and cache
pub const HOME_ENV: &str = "GENFORGE_HOME";

const SETTINGS_FILE: &str = "settings.toml";
const PROFILES_DIR: &str = "configs";

/// Where genforge keeps its state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenforgeDirs {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl GenforgeDirs {
    /// `GENFORGE_HOME` when set, platform directories otherwise
    pub fn resolve(env: &dyn EnvSource) -> AppResult<Self> {
        if let Some(home) = env.var(HOME_ENV).filter(|h| !h.trim().is_empty()) {
            return Ok(Self::at(home));
        }
        let dirs = ProjectDirs::from("dev", "genforge", "genforge")
            .ok_or_else(|| AppError::config("Failed to determine the user directories"))?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Everything under one base directory
    pub fn at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            cache_dir: home.join("cache"),
            config_dir: home,
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join(PROFILES_DIR)
    }
}

/// Loads `settings.toml`, writing the defaults on first use
#[derive(Debug)]
pub struct ConfigManager {
    dirs: GenforgeDirs,
    settings_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    pub fn new(dirs: GenforgeDirs) -> AppResult<Self> {
        fs::create_dir_all(&dirs.config_dir)
            .map_err(|e| AppError::io_with_source(&dirs.config_dir, "create config directory", e))?;

        let settings_path = dirs.settings_file();
        let settings = Self::load_or_create(&settings_path)?;
        Ok(Self {
            dirs,
            settings_path,
            settings,
        })
    }

    fn load_or_create(path: &Path) -> AppResult<Settings> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::io_with_source(path, "read settings file", e))?;
            toml::from_str(&content)
                .map_err(|e| AppError::config_with_source("Failed to parse settings file", e))
        } else {
            let settings = Settings::default();
            let content = toml::to_string_pretty(&settings)
                .map_err(|e| AppError::config_with_source("Failed to serialize default settings", e))?;
            fs::write(path, content)
                .map_err(|e| AppError::io_with_source(path, "write default settings", e))?;
            tracing::debug!(path = %path.display(), "wrote default settings");
            Ok(settings)
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dirs(&self) -> &GenforgeDirs {
        &self.dirs
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn profiles(&self) -> ProfileStore {
        ProfileStore::new(self.dirs.profiles_dir())
    }
}
