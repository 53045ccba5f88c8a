//! Version reporting and update checks

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `major.minor.patch`; pre-release and build suffixes are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    pub fn current() -> AppResult<Self> {
        VERSION.parse()
    }
}

impl FromStr for SemVer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let core = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed)
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let invalid = || AppError::invalid_argument("version", format!("'{}' is not a version", s));
        let mut parts = core.split('.');
        let mut next = |required: bool| -> AppResult<u64> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };

        let version = Self {
            major: next(true)?,
            minor: next(false)?,
            patch: next(false)?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Where the latest release is looked up
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest(&self) -> AppResult<Release>;
}

/// JSON endpoint with a `tag_name` or `version` field
pub struct HttpReleaseSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpReleaseSource {
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "update URL must be http or https, got {}",
                url.scheme()
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("genforge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }
}

/// Pull the release out of a GitHub-style or plain JSON document
pub fn parse_release(body: &serde_json::Value) -> Option<Release> {
    let version = body
        .get("tag_name")
        .or_else(|| body.get("version"))
        .and_then(|v| v.as_str())?;
    let url = body
        .get("html_url")
        .or_else(|| body.get("url"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Some(Release {
        version: version.to_string(),
        url,
    })
}

#[async_trait]
impl ReleaseSource for HttpReleaseSource {
    async fn latest(&self) -> AppResult<Release> {
        tracing::debug!(url = %self.url, "checking for updates");
        let response = self.client.get(self.url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(AppError::network(
                self.url.as_str(),
                format!("server returned {}", response.status()),
            ));
        }
        let body: serde_json::Value = response.json().await?;
        parse_release(&body).ok_or_else(|| {
            AppError::network(self.url.as_str(), "response has no tag_name or version field")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCheck {
    pub current: String,
    pub latest: String,
    pub update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub async fn check_for_update(source: &dyn ReleaseSource) -> AppResult<UpdateCheck> {
    let current = SemVer::current()?;
    let release = source.latest().await?;
    let latest: SemVer = release.version.parse()?;
    Ok(UpdateCheck {
        current: current.to_string(),
        latest: latest.to_string(),
        update_available: latest > current,
        url: release.url,
    })
}
