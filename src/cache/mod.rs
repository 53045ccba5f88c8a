//! Render cache
//!
//! Layout under the cache directory:
//! - `index.json`: entry metadata plus hit/miss counters
//! - `entries/<key>.json`: the rendered files of one entry

use crate::errors::{AppError, AppResult, ErrorContextExt};
use crate::generator::templates::RenderedFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const INDEX_FILE: &str = "index.json";
const ENTRIES_DIR: &str = "entries";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub template: String,
    pub files: Vec<String>,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheIndex {
    #[serde(default)]
    pub entries: BTreeMap<String, CacheEntry>,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
    pub hits: u64,
    pub misses: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub removed_entries: usize,
    pub freed_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Index entries whose payload was missing
    pub dropped_entries: usize,
    /// Payload files nothing in the index pointed to
    pub removed_orphans: usize,
    /// Payloads recovered into a rebuilt index
    pub recovered_entries: usize,
    pub index_rebuilt: bool,
}

/// SHA-256 over the template name and the sorted variables, hex-encoded
pub fn cache_key(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(template.as_bytes());
    for (key, value) in variables {
        // NUL cannot appear in a template name or a `--var` pair
        hasher.update([0]);
        hasher.update(key.as_bytes());
        hasher.update([0]);
        hasher.update(value.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct CacheManager {
    dir: PathBuf,
    /// Zero means unbounded
    max_entries: usize,
}

impl CacheManager {
    pub fn new(dir: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            dir: dir.into(),
            max_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn entries_dir(&self) -> PathBuf {
        self.dir.join(ENTRIES_DIR)
    }

    fn payload_path(&self, key: &str) -> PathBuf {
        self.entries_dir().join(format!("{}.json", key))
    }

    fn ensure_dirs(&self) -> AppResult<()> {
        let entries = self.entries_dir();
        fs::create_dir_all(&entries).in_file_operation(&entries, "create cache directory")
    }

    /// Missing index reads as empty; an unparsable one is an error
    fn load_index(&self) -> AppResult<CacheIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(CacheIndex::default());
        }
        let content = fs::read_to_string(&path).in_file_operation(&path, "read cache index")?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::cache_with_source(
                "cache index is corrupted; run `genforge cache repair`",
                e,
            )
        })
    }

    fn save_index(&self, index: &CacheIndex) -> AppResult<()> {
        self.ensure_dirs()?;
        let path = self.index_path();
        let content = serde_json::to_string_pretty(index).with_context("serialize cache index")?;
        fs::write(&path, content).in_file_operation(&path, "write cache index")
    }

    fn read_payload(&self, key: &str) -> Option<Vec<RenderedFile>> {
        let content = fs::read_to_string(self.payload_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Look up a render; counts a hit or a miss either way
    pub fn get(&self, key: &str) -> AppResult<Option<Vec<RenderedFile>>> {
        let mut index = self.load_index()?;
        let payload = if index.entries.contains_key(key) {
            self.read_payload(key)
        } else {
            None
        };

        match payload {
            Some(files) => {
                index.hits += 1;
                if let Some(entry) = index.entries.get_mut(key) {
                    entry.last_used = Utc::now();
                }
                debug!(key, "cache hit");
                self.save_index(&index)?;
                Ok(Some(files))
            }
            None => {
                index.misses += 1;
                // A dangling entry is useless; forget it.
                index.entries.remove(key);
                debug!(key, "cache miss");
                self.save_index(&index)?;
                Ok(None)
            }
        }
    }

    /// Store a render, evicting least recently used entries past the limit
    pub fn put(&self, key: &str, template: &str, files: &[RenderedFile]) -> AppResult<()> {
        self.ensure_dirs()?;
        let mut index = self.load_index()?;

        let payload = serde_json::to_string(files)
            .with_context_lazy(|| format!("serialize cache entry {}", key))?;
        let path = self.payload_path(key);
        fs::write(&path, &payload).in_file_operation(&path, "write cache entry")?;

        let now = Utc::now();
        index.entries.insert(
            key.to_string(),
            CacheEntry {
                template: template.to_string(),
                files: files.iter().map(|f| f.path.clone()).collect(),
                size: payload.len() as u64,
                created_at: now,
                last_used: now,
            },
        );

        if self.max_entries > 0 {
            while index.entries.len() > self.max_entries {
                let Some(oldest) = index
                    .entries
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                index.entries.remove(&oldest);
                let path = self.payload_path(&oldest);
                match fs::remove_file(&path) {
                    Ok(()) => debug!(key = %oldest, "evicted cache entry"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(key = %oldest, "evicted cache entry without payload")
                    }
                    Err(e) => warn!(
                        key = %oldest,
                        path = %path.display(),
                        error = %e,
                        "evicted cache entry but could not remove its payload"
                    ),
                }
            }
        }

        self.save_index(&index)
    }

    pub fn stats(&self) -> AppResult<CacheStats> {
        let index = self.load_index()?;
        Ok(CacheStats {
            path: self.dir.clone(),
            entries: index.entries.len(),
            bytes: index.entries.values().map(|e| e.size).sum(),
            hits: index.hits,
            misses: index.misses,
            oldest: index.entries.values().map(|e| e.created_at).min(),
            newest: index.entries.values().map(|e| e.created_at).max(),
        })
    }

    /// Remove every entry and reset the counters
    pub fn clear(&self) -> AppResult<ClearReport> {
        let report = match self.load_index() {
            Ok(index) => ClearReport {
                removed_entries: index.entries.len(),
                freed_bytes: index.entries.values().map(|e| e.size).sum(),
            },
            Err(e) => {
                warn!(error = %e, "clearing a cache with an unreadable index");
                ClearReport::default()
            }
        };

        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).in_file_operation(&self.dir, "remove cache directory")?;
        }
        self.ensure_dirs()?;
        info!(entries = report.removed_entries, "cache cleared");
        Ok(report)
    }

    /// Reconcile the index with the payload files on disk
    pub fn repair(&self) -> AppResult<RepairReport> {
        self.ensure_dirs()?;
        let mut report = RepairReport::default();

        let mut index = match self.load_index() {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "rebuilding cache index");
                report.index_rebuilt = true;
                CacheIndex::default()
            }
        };

        let on_disk = self.payload_keys()?;

        let before = index.entries.len();
        index.entries.retain(|key, _| on_disk.contains(key));
        report.dropped_entries = before - index.entries.len();

        for key in on_disk.difference(&index.entries.keys().cloned().collect()) {
            let recovered = report
                .index_rebuilt
                .then(|| self.read_payload(key))
                .flatten();
            match recovered {
                Some(files) => {
                    let path = self.payload_path(key);
                    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    let now = Utc::now();
                    index.entries.insert(
                        key.clone(),
                        CacheEntry {
                            template: "unknown".to_string(),
                            files: files.into_iter().map(|f| f.path).collect(),
                            size,
                            created_at: now,
                            last_used: now,
                        },
                    );
                    report.recovered_entries += 1;
                }
                None => {
                    let path = self.payload_path(key);
                    fs::remove_file(&path).in_file_operation(&path, "remove orphaned cache entry")?;
                    report.removed_orphans += 1;
                }
            }
        }

        self.save_index(&index)?;
        info!(
            dropped = report.dropped_entries,
            orphans = report.removed_orphans,
            recovered = report.recovered_entries,
            rebuilt = report.index_rebuilt,
            "cache repaired"
        );
        Ok(report)
    }

    fn payload_keys(&self) -> AppResult<BTreeSet<String>> {
        let dir = self.entries_dir();
        let mut keys = BTreeSet::new();
        for entry in fs::read_dir(&dir).in_file_operation(&dir, "list cache entries")? {
            let path = entry.in_file_operation(&dir, "list cache entries")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.insert(stem.to_string());
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn files(tag: &str) -> Vec<RenderedFile> {
        vec![RenderedFile {
            path: "README.md".to_string(),
            content: format!("# {}", tag),
        }]
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_key_is_stable_and_sensitive() {
        let a = cache_key("basic", &vars(&[("project_name", "demo")]));
        assert_eq!(a, cache_key("basic", &vars(&[("project_name", "demo")])));
        assert_ne!(a, cache_key("cli", &vars(&[("project_name", "demo")])));
        assert_ne!(a, cache_key("basic", &vars(&[("project_name", "demo2")])));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_separates_fields() {
        // Same bytes, different split between key and value
        assert_ne!(
            cache_key("basic", &vars(&[("ab", "c")])),
            cache_key("basic", &vars(&[("a", "bc")]))
        );
        assert_ne!(
            cache_key("basic", &BTreeMap::new()),
            cache_key("basic", &vars(&[("", "")]))
        );
    }

    #[test]
    fn test_key_of_empty_input_is_sha256_of_empty_string() {
        assert_eq!(
            cache_key("", &BTreeMap::new()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_eviction_survives_unremovable_payload() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path(), 1);
        cache.put("a", "basic", &files("a")).unwrap();

        // A directory where the payload file should be cannot be removed
        // with `remove_file`
        let payload = cache.payload_path("a");
        fs::remove_file(&payload).unwrap();
        fs::create_dir(&payload).unwrap();

        cache.put("b", "basic", &files("b")).unwrap();
        let index = cache.load_index().unwrap();
        let keys: Vec<_> = index.entries.keys().cloned().collect();
        assert_eq!(keys, vec!["b"]);
        assert!(payload.exists());
    }

    #[test]
    fn test_miss_then_hit() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path().join("cache"), 10);

        assert!(cache.get("k1").unwrap().is_none());
        cache.put("k1", "basic", &files("one")).unwrap();
        assert_eq!(cache.get("k1").unwrap(), Some(files("one")));

        let stats = cache.stats().unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!(stats.bytes > 0);
        assert!(stats.oldest.is_some());
    }

    #[test]
    fn test_lru_eviction() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path(), 2);

        cache.put("a", "basic", &files("a")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        cache.put("b", "basic", &files("b")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        // touch a so b becomes the least recently used
        assert!(cache.get("a").unwrap().is_some());
        std::thread::sleep(std::time::Duration::from_millis(5));
        cache.put("c", "basic", &files("c")).unwrap();

        let index = cache.load_index().unwrap();
        let keys: Vec<_> = index.entries.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(!cache.payload_path("b").exists());
    }

    #[test]
    fn test_clear() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path().join("cache"), 0);
        cache.put("a", "basic", &files("a")).unwrap();
        cache.put("b", "cli", &files("b")).unwrap();

        let report = cache.clear().unwrap();
        assert_eq!(report.removed_entries, 2);
        assert!(report.freed_bytes > 0);
        assert_eq!(cache.stats().unwrap().entries, 0);
    }

    #[test]
    fn test_repair_drops_dangling_and_orphans() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path(), 0);
        cache.put("kept", "basic", &files("kept")).unwrap();
        cache.put("dangling", "basic", &files("gone")).unwrap();
        fs::remove_file(cache.payload_path("dangling")).unwrap();
        fs::write(cache.payload_path("orphan"), "[]").unwrap();

        let report = cache.repair().unwrap();
        assert_eq!(report.dropped_entries, 1);
        assert_eq!(report.removed_orphans, 1);
        assert!(!report.index_rebuilt);
        assert_eq!(cache.stats().unwrap().entries, 1);
        assert!(!cache.payload_path("orphan").exists());
    }

    #[test]
    fn test_repair_rebuilds_corrupt_index() {
        let tmp = TempDir::new().unwrap();
        let cache = CacheManager::new(tmp.path(), 0);
        cache.put("a", "basic", &files("a")).unwrap();
        fs::write(cache.index_path(), "{not json").unwrap();

        assert!(matches!(cache.stats(), Err(AppError::Cache { .. })));

        let report = cache.repair().unwrap();
        assert!(report.index_rebuilt);
        assert_eq!(report.recovered_entries, 1);
        assert_eq!(cache.get("a").unwrap(), Some(files("a")));
    }
}
