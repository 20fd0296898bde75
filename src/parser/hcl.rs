//! HCL-based module loader implementation.
//!
//! Reads the `.tf` and `.tf.json` files directly inside one directory (the
//! same unit Terraform treats as a module) and extracts its `module` calls.

use crate::error::{ErrorCollector, Result, ResultExt};
use crate::parser::{ModuleLoader, TERRAFORM_EXTENSIONS};
use crate::types::{ModuleCall, SourcePos};

use async_trait::async_trait;
use hcl::{Body, Expression};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// Matches a module block header: module "name" {
static MODULE_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*module[ \t]+"?([A-Za-z0-9_-]+)"?[ \t]*\{"#).expect("Invalid regex")
});

/// Module loader backed by `hcl-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclModuleLoader;

impl HclModuleLoader {
    /// Create a new loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse the contents of a single Terraform file.
    ///
    /// # Errors
    ///
    /// Returns `ModuleLoad` if the content is not valid HCL (or JSON for
    /// `.tf.json` files).
    pub fn parse_content(&self, content: &str, file: &Path) -> Result<Vec<ModuleCall>> {
        if file.to_string_lossy().ends_with(".tf.json") {
            parse_json(content, file)
        } else {
            parse_hcl(content, file)
        }
    }

    /// Collect the Terraform files directly inside `dir`, sorted by name.
    async fn terraform_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.with_path(dir)?;

        while let Some(entry) = entries.next_entry().await.with_path(dir)? {
            let path = entry.path();
            if !path.is_file() || is_ignored_file(&path) || !is_terraform_file(&path) {
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ModuleLoader for HclModuleLoader {
    async fn load_module(&self, dir: &Path) -> Result<Vec<ModuleCall>> {
        if !dir.is_dir() {
            return Err(crate::err!(DirectoryNotFound {
                path: dir.to_path_buf(),
            }));
        }

        let files = self.terraform_files(dir).await?;
        let mut calls = Vec::new();
        let mut errors = ErrorCollector::new();

        for file in &files {
            tracing::trace!(file = %file.display(), "Parsing file");
            let content = tokio::fs::read_to_string(file).await.with_path(file)?;

            match self.parse_content(&content, file) {
                Ok(found) => calls.extend(found),
                Err(e) => {
                    tracing::debug!(file = %file.display(), error = %e, "Failed to parse file");
                    errors.add(e);
                }
            }
        }

        errors.into_result()?;

        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            modules = calls.len(),
            "Loaded Terraform directory"
        );

        Ok(calls)
    }
}

/// Check if a file is a Terraform file.
fn is_terraform_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    TERRAFORM_EXTENSIONS
        .iter()
        .any(|ext| path_str.ends_with(ext))
}

/// Editor swap files and hidden files are never configuration.
fn is_ignored_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(std::ffi::OsStr::to_str) else {
        return true;
    };
    name.starts_with('.') || name.ends_with('~') || (name.starts_with('#') && name.ends_with('#'))
}

fn parse_hcl(content: &str, file: &Path) -> Result<Vec<ModuleCall>> {
    let body: Body = hcl::from_str(content).map_err(|e| {
        crate::err!(ModuleLoad {
            file: file.to_path_buf(),
            message: e.to_string(),
        })
    })?;

    let lines = module_header_lines(content);
    let mut calls = Vec::new();

    for structure in body.into_inner() {
        let hcl::Structure::Block(block) = structure else {
            continue;
        };
        if block.identifier.as_str() != "module" {
            continue;
        }

        let Some(name) = block.labels.first().map(|l| l.as_str().to_string()) else {
            tracing::warn!(file = %file.display(), "Module block without a name, ignoring");
            continue;
        };

        let Some(source) = get_string_attribute(&block.body, "source") else {
            tracing::warn!(
                module = %name,
                file = %file.display(),
                "Module block missing a literal source attribute"
            );
            continue;
        };

        let line = lines.get(name.as_str()).copied().unwrap_or(0);
        calls.push(ModuleCall {
            name,
            source,
            position: SourcePos::new(file, line),
        });
    }

    Ok(calls)
}

fn parse_json(content: &str, file: &Path) -> Result<Vec<ModuleCall>> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        crate::err!(ModuleLoad {
            file: file.to_path_buf(),
            message: e.to_string(),
        })
    })?;

    let Some(modules) = value.get("module").and_then(serde_json::Value::as_object) else {
        return Ok(Vec::new());
    };

    let module_key = content.find("\"module\"").unwrap_or(0);
    let mut calls = Vec::new();

    for (name, body) in modules {
        // A module body may be written as an object or a list of objects
        let source = match body {
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("source").and_then(serde_json::Value::as_str)),
            other => other.get("source").and_then(serde_json::Value::as_str),
        };

        let Some(source) = source else {
            tracing::warn!(
                module = %name,
                file = %file.display(),
                "Module object missing a string source"
            );
            continue;
        };

        let line = content[module_key..]
            .find(&format!("\"{name}\""))
            .map_or(0, |offset| line_of(content, module_key + offset));

        calls.push(ModuleCall {
            name: name.clone(),
            source: source.to_string(),
            position: SourcePos::new(file, line),
        });
    }

    Ok(calls)
}

/// Map every module block name to the line its header is on.
fn module_header_lines(content: &str) -> HashMap<&str, usize> {
    MODULE_HEADER_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            Some((name.as_str(), line_of(content, name.start())))
        })
        .collect()
}

/// Convert a byte offset to a 1-based line number.
fn line_of(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())].matches('\n').count() + 1
}

/// Get a literal string attribute from a body.
fn get_string_attribute(body: &Body, key: &str) -> Option<String> {
    body.attributes()
        .find(|attr| attr.key.as_str() == key)
        .and_then(|attr| match &attr.expr {
            Expression::String(s) => Some(s.clone()),
            _ => None,
        })
}
