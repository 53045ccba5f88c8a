//! `genforge validate` and `genforge audit`

use super::super::output::TextRender;
use super::super::CliContext;
use crate::generator::audit::{audit_project, validate_project, AuditReport, FindingSeverity, ValidationReport};
use anyhow::{bail, Result};
use std::path::Path;

pub struct ProjectHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ProjectHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_validate(&self, dir: &Path, template: &str) -> Result<()> {
        let report = validate_project(dir, template)?;
        self.context.printer.print(&report)?;
        if !report.passed() {
            bail!(
                "validation failed: {} missing, {} empty",
                report.missing.len(),
                report.empty.len()
            );
        }
        Ok(())
    }

    pub fn handle_audit(&self, dir: &Path, strict: bool) -> Result<()> {
        let report = audit_project(dir, strict)?;
        self.context.printer.print(&report)?;
        if !report.passed() {
            bail!(
                "audit failed: {} errors, {} warnings{}",
                report.count(FindingSeverity::Error),
                report.count(FindingSeverity::Warning),
                if strict { " (strict)" } else { "" }
            );
        }
        Ok(())
    }
}

impl TextRender for ValidationReport {
    fn render_text(&self) -> String {
        let mut out = format!(
            "{}: {} files checked against template '{}'",
            self.dir.display(),
            self.checked,
            self.template
        );
        for path in &self.missing {
            out.push_str(&format!("\n  missing  {}", path));
        }
        for path in &self.empty {
            out.push_str(&format!("\n  empty    {}", path));
        }
        if self.passed() {
            out.push_str("\nOK");
        }
        out
    }
}

impl TextRender for AuditReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            let location = match finding.line {
                Some(line) => format!("{}:{}", finding.path, line),
                None => finding.path.clone(),
            };
            out.push_str(&format!(
                "{:<8} {}  {}\n",
                finding.severity, location, finding.message
            ));
        }
        out.push_str(&format!(
            "{} files scanned: {} errors, {} warnings, {} info",
            self.files_scanned,
            self.count(FindingSeverity::Error),
            self.count(FindingSeverity::Warning),
            self.count(FindingSeverity::Info)
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::audit::Finding;

    #[test]
    fn test_audit_text() {
        let report = AuditReport {
            dir: "demo".into(),
            strict: false,
            files_scanned: 2,
            findings: vec![Finding {
                severity: FindingSeverity::Error,
                path: "Cargo.toml".to_string(),
                line: Some(3),
                message: "unrendered template placeholder".to_string(),
            }],
        };
        let text = report.render_text();
        assert!(text.starts_with("error    Cargo.toml:3  unrendered template placeholder"));
        assert!(text.ends_with("2 files scanned: 1 errors, 0 warnings, 0 info"));
    }

    #[test]
    fn test_validation_text() {
        let report = ValidationReport {
            dir: "demo".into(),
            template: "basic".to_string(),
            checked: 4,
            missing: vec!["src/main.rs".to_string()],
            empty: vec![],
        };
        assert_eq!(
            report.render_text(),
            "demo: 4 files checked against template 'basic'\n  missing  src/main.rs"
        );
    }
}
