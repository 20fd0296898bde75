//! Core data types used throughout drdrei.
//!
//! This module defines the fundamental data structures for representing:
//! - Terraform module calls and their source positions
//! - Features (named release lines) parsed from git refs and tags
//! - The per-repository index of latest tags
//! - Audit results, load warnings and the final report

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

/// Prefix of Terraform's generic git module sources.
pub const GIT_SOURCE_PREFIX: &str = "git::";

/// Position of a module block inside a Terraform file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    /// File where the block is declared
    pub file: PathBuf,
    /// 1-based line of the block header (0 when unknown)
    pub line: usize,
}

impl SourcePos {
    /// Create a new source position.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A `module` block found while loading one Terraform directory.
///
/// # Example HCL
///
/// ```hcl
/// module "network" {
///   source = "git::https://github.com/org/infra.git?ref=network-1.2.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCall {
    /// The label of the module block (e.g., "network")
    pub name: String,

    /// The raw `source` attribute
    pub source: String,

    /// Where the block is declared
    pub position: SourcePos,
}

impl ModuleCall {
    /// Whether the source uses Terraform's generic git scheme (`git::`).
    #[must_use]
    pub fn is_git_source(&self) -> bool {
        self.source.starts_with(GIT_SOURCE_PREFIX)
    }
}

/// A named release line and its version, e.g. `network` and `1.2.0` for
/// the tag `network-1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name
    pub name: String,
    /// Version text, kept exactly as written
    pub version: String,
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Latest version of every feature, per repository identity.
///
/// Built once per run by the tag resolver and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryTagIndex {
    repositories: HashMap<String, HashMap<String, String>>,
}

impl RepositoryTagIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest versions of one repository.
    pub fn insert(&mut self, repository: String, latest: HashMap<String, String>) {
        self.repositories.insert(repository, latest);
    }

    /// Latest known version of `feature` in `repository`.
    #[must_use]
    pub fn latest(&self, repository: &str, feature: &str) -> Option<&str> {
        self.repositories
            .get(repository)
            .and_then(|features| features.get(feature))
            .map(String::as_str)
    }

    /// All features known for `repository`.
    #[must_use]
    pub fn features(&self, repository: &str) -> Option<&HashMap<String, String>> {
        self.repositories.get(repository)
    }

    /// Number of repositories in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether the index holds no repository.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl FromIterator<(String, HashMap<String, String>)> for RepositoryTagIndex {
    fn from_iter<I: IntoIterator<Item = (String, HashMap<String, String>)>>(iter: I) -> Self {
        Self {
            repositories: iter.into_iter().collect(),
        }
    }
}

/// Outcome of auditing one version-pinned module call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Feature name parsed from the module's ref
    pub feature: String,
    /// Version the module call is pinned to
    pub current: String,
    /// Latest version published upstream (empty if none seen)
    pub latest: String,
    /// Where the module call is declared
    pub position: SourcePos,
    /// Label of the module block
    pub module_name: String,
    /// Repository identity the module points at
    pub repository: String,
}

impl AuditResult {
    /// Whether the pinned version is the latest one.
    ///
    /// Versions are compared as plain strings: `1.0` and `1.0.0` differ.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.current == self.latest
    }
}

/// A directory whose Terraform files could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadWarning {
    /// The directory that was skipped
    pub directory: PathBuf,
    /// Why it was skipped
    pub message: String,
}

impl Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.directory.display(), self.message)
    }
}

/// Everything produced by one audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Results selected for reporting
    pub results: Vec<AuditResult>,
    /// Directories skipped because they failed to load
    pub warnings: Vec<LoadWarning>,
    /// Number of directories inspected
    pub directories_scanned: usize,
    /// Number of `git::` module calls found
    pub git_module_calls: usize,
    /// Number of distinct repositories queried
    pub repositories_queried: usize,
}

impl AuditReport {
    /// Whether nothing needs attention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Output report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text format
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(source: &str) -> ModuleCall {
        ModuleCall {
            name: "app".to_string(),
            source: source.to_string(),
            position: SourcePos::new("main.tf", 3),
        }
    }

    #[test]
    fn test_is_git_source() {
        assert!(call("git::https://github.com/org/repo.git?ref=app-1.0.0").is_git_source());
        assert!(!call("github.com/org/repo").is_git_source());
        assert!(!call("terraform-aws-modules/vpc/aws").is_git_source());
        assert!(!call("../modules/app").is_git_source());
    }

    #[test]
    fn test_source_pos_display() {
        assert_eq!(SourcePos::new("envs/prod/main.tf", 12).to_string(), "envs/prod/main.tf:12");
    }

    #[test]
    fn test_up_to_date_is_string_equality() {
        let mut result = AuditResult {
            feature: "app".to_string(),
            current: "1.0".to_string(),
            latest: "1.0.0".to_string(),
            position: SourcePos::new("main.tf", 1),
            module_name: "app".to_string(),
            repository: "git@github.com:org/repo.git".to_string(),
        };
        assert!(!result.is_up_to_date());

        result.current = "1.0.0".to_string();
        assert!(result.is_up_to_date());
    }

    #[test]
    fn test_tag_index_lookup() {
        let mut index = RepositoryTagIndex::new();
        index.insert(
            "git@github.com:org/repo.git".to_string(),
            HashMap::from([("app".to_string(), "2.0.0".to_string())]),
        );

        assert_eq!(index.latest("git@github.com:org/repo.git", "app"), Some("2.0.0"));
        assert_eq!(index.latest("git@github.com:org/repo.git", "db"), None);
        assert_eq!(index.latest("git@github.com:org/other.git", "app"), None);
        assert_eq!(index.len(), 1);
    }
}
