//! Saved generation configurations, one TOML file per profile

use crate::errors::{AppError, AppResult, ErrorContextExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MAX_NAME_LEN: usize = 64;

/// A named set of `generate` inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl GenerationProfile {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            description: None,
            author: None,
            license: None,
            variables: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Read a profile from any TOML file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).in_file_operation(path, "read configuration file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let profile: Self = toml::from_str(content)
            .map_err(|e| AppError::config_with_source("Failed to parse saved configuration", e))?;
        validate_name(&profile.name)?;
        Ok(profile)
    }

    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .with_context_lazy(|| format!("serialize saved configuration '{}'", self.name))
    }
}

/// Row of `config list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub template: String,
    pub created_at: DateTime<Utc>,
}

/// Profile names end up as file names: keep them to `[A-Za-z0-9_-]`
pub fn validate_name(name: &str) -> AppResult<()> {
    let reason = if name.is_empty() {
        Some("name must not be empty".to_string())
    } else if name.len() > MAX_NAME_LEN {
        Some(format!("name must be at most {} characters", MAX_NAME_LEN))
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some("name may only contain letters, digits, '-' and '_'".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(AppError::invalid_argument(format!("name '{}'", name), reason)),
        None => Ok(()),
    }
}

/// Directory of `<name>.toml` profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.toml", name)))
    }

    pub fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.path_for(name)?.exists())
    }

    /// All saved profiles, sorted by name. Unreadable files are skipped.
    pub fn list(&self) -> AppResult<Vec<ProfileSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).in_file_operation(&self.dir, "list saved configurations")?;
        let mut summaries = Vec::new();
        for entry in entries {
            let path = entry.in_file_operation(&self.dir, "list saved configurations")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            match GenerationProfile::from_file(&path) {
                Ok(profile) => summaries.push(ProfileSummary {
                    name: profile.name,
                    template: profile.template,
                    created_at: profile.created_at,
                }),
                Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable configuration"),
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    pub fn load(&self, name: &str) -> AppResult<GenerationProfile> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(AppError::not_found("saved configuration", name));
        }
        GenerationProfile::from_file(&path)
    }

    /// Write a profile; an existing one is only replaced with `overwrite`
    pub fn save(&self, profile: &GenerationProfile, overwrite: bool) -> AppResult<PathBuf> {
        let path = self.path_for(&profile.name)?;
        if path.exists() && !overwrite {
            return Err(AppError::invalid_argument(
                format!("name '{}'", profile.name),
                "a saved configuration with this name already exists (use --force to replace it)",
            ));
        }

        fs::create_dir_all(&self.dir).in_file_operation(&self.dir, "create configurations directory")?;
        fs::write(&path, profile.to_toml()?).in_file_operation(&path, "write saved configuration")?;
        info!(name = %profile.name, path = %path.display(), "saved configuration");
        Ok(path)
    }

    pub fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(AppError::not_found("saved configuration", name));
        }
        fs::remove_file(&path).in_file_operation(&path, "delete saved configuration")?;
        info!(name, "deleted configuration");
        Ok(())
    }

    /// The profile's TOML text
    pub fn export(&self, name: &str) -> AppResult<String> {
        self.load(name)?.to_toml()
    }

    /// Store a profile read from `source`, optionally under a new name
    pub fn import(
        &self,
        source: &Path,
        rename: Option<&str>,
        overwrite: bool,
    ) -> AppResult<GenerationProfile> {
        let mut profile = GenerationProfile::from_file(source)?;
        if let Some(name) = rename {
            validate_name(name)?;
            profile.name = name.to_string();
        }
        self.save(&profile, overwrite)?;
        Ok(profile)
    }
}
