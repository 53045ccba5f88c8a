use serde::{Deserialize, Serialize};

/// Contents of `settings.toml`
///
/// Every section falls back to its defaults when absent, so a partial file
/// written by hand still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub defaults: GenerationDefaults,
    pub update: UpdateSettings,
    pub cache: CacheSettings,
}

/// Values used by `generate` when neither a flag nor a prompt supplies one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
    pub template: String,
    pub author: Option<String>,
    pub license: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Endpoint returning the latest release as JSON
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            template: "basic".to_string(),
            author: None,
            license: "MIT".to_string(),
        }
    }
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            url: "https://api.github.com/repos/genforge/genforge/releases/latest".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [defaults]
            author = "Ada"

            [cache]
            max_entries = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.defaults.author.as_deref(), Some("Ada"));
        assert_eq!(settings.defaults.template, "basic");
        assert_eq!(settings.cache.max_entries, 3);
        assert!(settings.cache.enabled);
        assert_eq!(settings.update, UpdateSettings::default());
    }

    #[test]
    fn test_defaults_survive_toml() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
