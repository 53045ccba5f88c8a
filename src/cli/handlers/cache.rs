//! `genforge cache ...`

use super::super::commands::CacheAction;
use super::super::output::TextRender;
use super::super::CliContext;
use crate::cache::{CacheStats, ClearReport, RepairReport};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

pub struct CacheHandler<'a> {
    context: &'a CliContext,
}

#[derive(Debug, Serialize)]
struct CachePath {
    path: PathBuf,
}

impl TextRender for CachePath {
    fn render_text(&self) -> String {
        self.path.display().to_string()
    }
}

impl<'a> CacheHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle(&self, action: CacheAction) -> Result<()> {
        let cache = self.context.cache_manager();
        let printer = &self.context.printer;
        match action {
            CacheAction::Stats => printer.print(&cache.stats()?)?,
            CacheAction::Clear { yes } => {
                let question = format!("Remove everything in {}?", cache.path().display());
                if !self.context.confirm(&question, yes)? {
                    printer.info("Aborted");
                    return Ok(());
                }
                printer.print(&cache.clear()?)?;
            }
            CacheAction::Repair => printer.print(&cache.repair()?)?,
            CacheAction::Path => printer.print(&CachePath {
                path: cache.path().to_path_buf(),
            })?,
        }
        Ok(())
    }
}

impl TextRender for CacheStats {
    fn render_text(&self) -> String {
        let lookups = self.hits + self.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 * 100.0 / lookups as f64
        };
        let mut out = format!(
            "Cache: {}\nEntries: {}\nSize: {} bytes\nHits: {}  Misses: {}  ({:.1}% hit rate)",
            self.path.display(),
            self.entries,
            self.bytes,
            self.hits,
            self.misses,
            hit_rate
        );
        if let (Some(oldest), Some(newest)) = (self.oldest, self.newest) {
            out.push_str(&format!(
                "\nOldest: {}\nNewest: {}",
                oldest.format("%Y-%m-%d %H:%M:%S UTC"),
                newest.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        out
    }
}

impl TextRender for ClearReport {
    fn render_text(&self) -> String {
        format!(
            "Removed {} entries ({} bytes)",
            self.removed_entries, self.freed_bytes
        )
    }
}

impl TextRender for RepairReport {
    fn render_text(&self) -> String {
        let mut out = format!(
            "Dropped {} dangling entries, removed {} orphaned files",
            self.dropped_entries, self.removed_orphans
        );
        if self.index_rebuilt {
            out.push_str(&format!(
                "\nIndex rebuilt, {} entries recovered",
                self.recovered_entries
            ));
        }
        out
    }
}
