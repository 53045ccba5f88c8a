//! Checks over generated projects: `validate` and `audit`

use super::templates::TemplateEngine;
use crate::errors::{AppError, AppResult, ErrorContextExt};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub dir: PathBuf,
    pub template: String,
    pub checked: usize,
    pub missing: Vec<String>,
    pub empty: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.empty.is_empty()
    }
}

/// Every file the template declares must exist and be non-empty
pub fn validate_project(dir: &Path, template: &str) -> AppResult<ValidationReport> {
    require_dir(dir)?;
    let template = TemplateEngine::find(template)?;

    let mut report = ValidationReport {
        dir: dir.to_path_buf(),
        template: template.name.to_string(),
        checked: 0,
        missing: Vec::new(),
        empty: Vec::new(),
    };
    for path in template.paths() {
        report.checked += 1;
        let full = dir.join(path);
        match fs::metadata(&full) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            Ok(meta) if meta.is_file() => report.empty.push(path.to_string()),
            _ => report.missing.push(path.to_string()),
        }
    }
    tracing::debug!(dir = %dir.display(), checked = report.checked, "validated project");
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: FindingSeverity,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub dir: PathBuf,
    pub strict: bool,
    pub files_scanned: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn count(&self, severity: FindingSeverity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Errors always fail; warnings only in strict mode
    pub fn passed(&self) -> bool {
        self.count(FindingSeverity::Error) == 0
            && (!self.strict || self.count(FindingSeverity::Warning) == 0)
    }
}

pub fn audit_project(dir: &Path, strict: bool) -> AppResult<AuditReport> {
    require_dir(dir)?;

    let files = collect_files(dir)?;

    let mut findings = Vec::new();
    if !dir.join("README.md").is_file() {
        findings.push(Finding {
            severity: FindingSeverity::Warning,
            path: "README.md".to_string(),
            line: None,
            message: "project has no README.md".to_string(),
        });
    }

    for file in &files {
        let relative = file
            .strip_prefix(dir)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        let bytes = fs::read(file).in_file_operation(file, "read project file")?;
        if bytes.is_empty() {
            findings.push(Finding {
                severity: FindingSeverity::Warning,
                path: relative,
                line: None,
                message: "file is empty".to_string(),
            });
            continue;
        }
        // Binary files only get the emptiness check
        let Ok(text) = String::from_utf8(bytes) else {
            continue;
        };
        scan_text(&relative, &text, &mut findings);
    }

    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.line.cmp(&b.line))
    });

    tracing::debug!(dir = %dir.display(), files = files.len(), findings = findings.len(), "audited project");
    Ok(AuditReport {
        dir: dir.to_path_buf(),
        strict,
        files_scanned: files.len(),
        findings,
    })
}

fn scan_text(path: &str, text: &str, findings: &mut Vec<Finding>) {
    for (number, line) in text.lines().enumerate() {
        let line_no = Some(number + 1);
        if let Some(start) = line.find("{{") {
            if line[start..].contains("}}") {
                findings.push(Finding {
                    severity: FindingSeverity::Error,
                    path: path.to_string(),
                    line: line_no,
                    message: "unrendered template placeholder".to_string(),
                });
            }
        }
        if line.contains("TODO") {
            findings.push(Finding {
                severity: FindingSeverity::Info,
                path: path.to_string(),
                line: line_no,
                message: "TODO marker".to_string(),
            });
        }
    }
}

fn require_dir(dir: &Path) -> AppResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(AppError::not_found("project directory", dir.display().to_string()))
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Regular files under `dir`, sorted, outside build and VCS directories
fn collect_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_skipped_dir(e)) {
        let entry = entry.in_file_operation(dir, "walk project directory")?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, path: &str, content: &str) {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_validate_reports_missing_and_empty() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "# demo");
        write(tmp.path(), "Cargo.toml", "");
        write(tmp.path(), ".gitignore", "/target");

        let report = validate_project(tmp.path(), "basic").unwrap();
        assert_eq!(report.checked, 4);
        assert_eq!(report.missing, vec!["src/main.rs"]);
        assert_eq!(report.empty, vec!["Cargo.toml"]);
        assert!(!report.passed());
    }

    #[test]
    fn test_validate_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = validate_project(&tmp.path().join("nope"), "basic").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_validate_unknown_template() {
        let tmp = TempDir::new().unwrap();
        assert!(validate_project(tmp.path(), "web").is_err());
    }

    #[test]
    fn test_audit_findings() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/main.rs", "fn main() {}\n// TODO: args\n");
        write(tmp.path(), "Cargo.toml", "name = \"{{project_name}}\"\n");
        write(tmp.path(), "empty.txt", "");
        write(tmp.path(), "target/debug/skip.rs", "{{ignored}}");

        let report = audit_project(tmp.path(), false).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.count(FindingSeverity::Error), 1);
        // missing README plus the empty file
        assert_eq!(report.count(FindingSeverity::Warning), 2);
        assert_eq!(report.count(FindingSeverity::Info), 1);
        assert_eq!(report.findings[0].path, "Cargo.toml");
        assert_eq!(report.findings[0].line, Some(1));
        assert!(!report.passed());
    }

    #[test]
    fn test_audit_skips_build_and_vcs_dirs() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "# ok\n");
        write(tmp.path(), "src/lib.rs", "pub fn f() {}\n");
        write(tmp.path(), ".git/HEAD", "");
        write(tmp.path(), "target/debug/out.rs", "{{leftover}}");
        write(tmp.path(), "web/node_modules/pkg/index.js", "// TODO");
        // Only the directory names are skipped, not files that share them
        write(tmp.path(), "docs/target", "see build docs\n");

        let report = audit_project(tmp.path(), true).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert!(report.findings.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn test_audit_of_skipped_root_name_still_scans() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("target");
        write(&root, "README.md", "# ok\n");

        let report = audit_project(&root, false).unwrap();
        assert_eq!(report.files_scanned, 1);
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/lib.rs", "pub fn f() {}\n");

        assert!(audit_project(tmp.path(), false).unwrap().passed());
        assert!(!audit_project(tmp.path(), true).unwrap().passed());
    }

    #[test]
    fn test_clean_project_passes_strict() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "# ok\n");
        assert!(audit_project(tmp.path(), true).unwrap().passed());
    }
}
