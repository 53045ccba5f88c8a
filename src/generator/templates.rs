//! Built-in project templates rendered with Handlebars

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Utc};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// One file of a project template; `content` is a Handlebars template
#[derive(Debug)]
pub struct TemplateFile {
    pub path: &'static str,
    pub content: &'static str,
}

#[derive(Debug)]
pub struct ProjectTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub files: &'static [TemplateFile],
}

impl ProjectTemplate {
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.files.iter().map(|f| f.path)
    }
}

const README: &str = r#"# {{project_name}}

{{description}}

Author: {{author}}
License: {{license}}
"#;

const GITIGNORE: &str = "/target\n";

const CATALOG: &[ProjectTemplate] = &[
    ProjectTemplate {
        name: "basic",
        description: "Binary crate with a single main.rs",
        files: &[
            TemplateFile {
                path: "README.md",
                content: README,
            },
            TemplateFile {
                path: ".gitignore",
                content: GITIGNORE,
            },
            TemplateFile {
                path: "Cargo.toml",
                content: r#"[package]
name = "{{project_name}}"
version = "0.1.0"
edition = "2021"
description = "{{description}}"
authors = ["{{author}}"]
license = "{{license}}"

[dependencies]
"#,
            },
            TemplateFile {
                path: "src/main.rs",
                content: r#"fn main() {
    println!("Hello from {{project_name}}!");
}
"#,
            },
        ],
    },
    ProjectTemplate {
        name: "cli",
        description: "Command-line tool using clap",
        files: &[
            TemplateFile {
                path: "README.md",
                content: README,
            },
            TemplateFile {
                path: ".gitignore",
                content: GITIGNORE,
            },
            TemplateFile {
                path: "Cargo.toml",
                content: r#"[package]
name = "{{project_name}}"
version = "0.1.0"
edition = "2021"
description = "{{description}}"
authors = ["{{author}}"]
license = "{{license}}"

[dependencies]
clap = { version = "4.5", features = ["derive"] }
"#,
            },
            TemplateFile {
                path: "src/main.rs",
                content: r#"use clap::Parser;

/// {{description}}
#[derive(Parser)]
#[command(name = "{{project_name}}", version)]
struct Cli {
    /// Print more output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        eprintln!("{{project_name}} starting");
    }
}
"#,
            },
        ],
    },
    ProjectTemplate {
        name: "library",
        description: "Library crate with a unit test",
        files: &[
            TemplateFile {
                path: "README.md",
                content: README,
            },
            TemplateFile {
                path: ".gitignore",
                content: "/target\nCargo.lock\n",
            },
            TemplateFile {
                path: "Cargo.toml",
                content: r#"[package]
name = "{{project_name}}"
version = "0.1.0"
edition = "2021"
description = "{{description}}"
authors = ["{{author}}"]
license = "{{license}}"

[lib]
name = "{{crate_name}}"
"#,
            },
            TemplateFile {
                path: "src/lib.rs",
                content: r#"//! {{description}}

pub fn add(left: u64, right: u64) -> u64 {
    left + right
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        assert_eq!(add(2, 2), 4);
    }
}
"#,
            },
        ],
    },
];

/// Values available to every template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub project_name: String,
    pub crate_name: String,
    pub description: String,
    pub author: String,
    pub license: String,
    pub year: i32,
    /// Custom `--var` values; never shadow the fields above
    #[serde(flatten)]
    pub variables: BTreeMap<String, String>,
}

const RESERVED: &[&str] = &[
    "project_name",
    "crate_name",
    "description",
    "author",
    "license",
    "year",
];

impl TemplateContext {
    pub fn new(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            crate_name: crate_name(project_name),
            description: String::new(),
            author: String::new(),
            license: String::new(),
            year: Utc::now().year(),
            variables: BTreeMap::new(),
        }
    }

    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = variables
            .into_iter()
            .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
            .collect();
        self
    }
}

/// `my-app` -> `my_app`
pub fn crate_name(project_name: &str) -> String {
    project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// A rendered file, path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Register every catalog file as `<template>/<path>`
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        for template in CATALOG {
            for file in template.files {
                check_relative(file.path)?;
                let key = format!("{}/{}", template.name, file.path);
                handlebars
                    .register_template_string(&key, file.content)
                    .map_err(|e| {
                        AppError::template_with_source(format!("Failed to register template {}", key), e)
                    })?;
            }
        }

        Ok(Self { handlebars })
    }

    pub fn catalog() -> &'static [ProjectTemplate] {
        CATALOG
    }

    pub fn find(name: &str) -> AppResult<&'static ProjectTemplate> {
        CATALOG
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| AppError::not_found("template", name))
    }

    pub fn render_project(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> AppResult<Vec<RenderedFile>> {
        let template = Self::find(template)?;
        template
            .files
            .iter()
            .map(|file| -> AppResult<RenderedFile> {
                let key = format!("{}/{}", template.name, file.path);
                let content = self.handlebars.render(&key, context)?;
                Ok(RenderedFile {
                    path: file.path.to_string(),
                    content,
                })
            })
            .collect()
    }
}

fn check_relative(path: &str) -> AppResult<()> {
    let safe = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(AppError::template(format!(
            "template path '{}' must stay inside the project",
            path
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TemplateContext {
        let mut ctx = TemplateContext::new("demo-app");
        ctx.description = "A demo's app".to_string();
        ctx.author = "Ada <ada@example.com>".to_string();
        ctx.license = "MIT".to_string();
        ctx
    }

    #[test]
    fn test_catalog_names() {
        let names: Vec<_> = TemplateEngine::catalog().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["basic", "cli", "library"]);
    }

    #[test]
    fn test_render_basic() {
        let engine = TemplateEngine::new().unwrap();
        let files = engine.render_project("basic", &context()).unwrap();

        let cargo = files.iter().find(|f| f.path == "Cargo.toml").unwrap();
        assert!(cargo.content.contains("name = \"demo-app\""));
        // No HTML escaping in generated sources
        assert!(cargo.content.contains("authors = [\"Ada <ada@example.com>\"]"));

        let readme = files.iter().find(|f| f.path == "README.md").unwrap();
        assert!(readme.content.contains("A demo's app"));
    }

    #[test]
    fn test_rendered_output_has_no_placeholders() {
        let engine = TemplateEngine::new().unwrap();
        for template in TemplateEngine::catalog() {
            for file in engine.render_project(template.name, &context()).unwrap() {
                assert!(!file.content.contains("{{"), "{} {}", template.name, file.path);
            }
        }
    }

    #[test]
    fn test_library_uses_crate_name() {
        let engine = TemplateEngine::new().unwrap();
        let files = engine.render_project("library", &context()).unwrap();
        let cargo = files.iter().find(|f| f.path == "Cargo.toml").unwrap();
        assert!(cargo.content.contains("name = \"demo_app\""));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        assert!(matches!(
            engine.render_project("web", &context()),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_variables_cannot_shadow_builtins() {
        let vars = BTreeMap::from([
            ("author".to_string(), "Mallory".to_string()),
            ("port".to_string(), "8080".to_string()),
        ]);
        let ctx = context().with_variables(vars);
        assert_eq!(ctx.author, "Ada <ada@example.com>");
        assert_eq!(ctx.variables.len(), 1);
    }

    #[test]
    fn test_relative_paths_only() {
        assert!(check_relative("src/main.rs").is_ok());
        assert!(check_relative("../escape").is_err());
        assert!(check_relative("/etc/passwd").is_err());
    }
}
