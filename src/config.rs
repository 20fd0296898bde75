//! Configuration module for drdrei.
//!
//! This module handles loading and validating configuration from:
//! - A YAML configuration file (`~/.drdrei.yaml` or `--config <file>`)
//! - Environment variables (`DRDREI_*`)
//! - CLI arguments
//!
//! Later sources win: defaults < file < environment < flags.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # ~/.drdrei.yaml
//!
//! # Audit options
//! audit:
//!   recursive: false
//!   ignore_paths:
//!     - .terraform
//!     - .git
//!   report_all: false   # Also report module calls that are up to date
//!
//! # Output options
//! output:
//!   json: false
//!   pretty: true
//!   colored: true
//!
//! # Remote tag listing
//! git:
//!   program: git
//!   timeout_secs: 60
//!   concurrency: 8
//! ```

use crate::error::{DrdreiError, Result, ResultExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Name of the configuration file looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".drdrei.yaml";

static BRACED_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Audit options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Walk target directories recursively.
    pub recursive: bool,

    /// Directory or file base names pruned during a recursive walk.
    pub ignore_paths: Vec<String>,

    /// Report every version-pinned module call, not only stale ones.
    pub report_all: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            ignore_paths: vec![".terraform".to_string(), ".git".to_string()],
            report_all: false,
        }
    }
}

/// Output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit JSON instead of text.
    pub json: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Use colored text output.
    pub colored: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            pretty: true,
            colored: true,
        }
    }
}

/// Remote tag listing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Git executable.
    pub program: String,

    /// Timeout of a single `git ls-remote` invocation, in seconds.
    pub timeout_secs: u64,

    /// Maximum number of repositories queried at once.
    pub concurrency: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeout_secs: 60,
            concurrency: 8,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audit options
    pub audit: AuditConfig,

    /// Output options
    pub output: OutputConfig,

    /// Git options
    pub git: GitConfig,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// `${VAR}` and `$VAR` references are expanded from the environment
    /// first; unknown variables are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is out of range.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        // An empty or comment-only file deserializes to null
        let config: Self = if expanded.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Option<Self>>(&expanded)
                .map_err(|e| {
                    DrdreiError::config_parse(
                        e.to_string(),
                        Some(Box::new(e)),
                        file!(),
                        line!(),
                    )
                })?
                .unwrap_or_default()
        };

        config.validate()?;

        tracing::debug!(
            recursive = config.audit.recursive,
            ignore_paths = config.audit.ignore_paths.len(),
            concurrency = config.git.concurrency,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        let content = std::fs::read_to_string(path).with_path(path)?;
        Self::from_yaml(&content)
    }

    /// The configuration file to use: `explicit` if given, otherwise
    /// `~/.drdrei.yaml` when it exists.
    #[must_use]
    pub fn locate_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let candidate = dirs::home_dir()?.join(DEFAULT_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Apply `DRDREI_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` if a variable holds an invalid value.
    pub fn load_from_env(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` if a variable holds an invalid value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("DRDREI_RECURSIVE") {
            self.audit.recursive = parse_bool("DRDREI_RECURSIVE", &value)?;
        }
        if let Some(value) = get("DRDREI_IGNORE_PATHS") {
            self.audit.ignore_paths = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(value) = get("DRDREI_REPORT_ALL") {
            self.audit.report_all = parse_bool("DRDREI_REPORT_ALL", &value)?;
        }
        if let Some(value) = get("DRDREI_JSON") {
            self.output.json = parse_bool("DRDREI_JSON", &value)?;
        }
        if let Some(value) = get("DRDREI_GIT_PROGRAM") {
            self.git.program = value;
        }
        if let Some(value) = get("DRDREI_GIT_TIMEOUT") {
            self.git.timeout_secs = parse_number("DRDREI_GIT_TIMEOUT", &value)?;
        }
        if let Some(value) = get("DRDREI_GIT_CONCURRENCY") {
            self.git.concurrency = parse_number("DRDREI_GIT_CONCURRENCY", &value)?;
        }

        self.validate()
    }

    /// Merge CLI arguments into the configuration.
    ///
    /// Flags only ever switch options on; `--ignorePaths` replaces the
    /// configured list when given.
    pub fn merge_cli_args(&mut self, args: &crate::cli::Cli) {
        if args.recursive {
            self.audit.recursive = true;
        }
        if !args.ignore_paths.is_empty() {
            self.audit.ignore_paths.clone_from(&args.ignore_paths);
        }
        if args.all {
            self.audit.report_all = true;
        }
        if args.json {
            self.output.json = true;
        }
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` for the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.git.program.trim().is_empty() {
            return Err(crate::err!(ConfigValue {
                key: "git.program".to_string(),
                message: "must not be empty".to_string(),
            }));
        }
        if self.git.timeout_secs == 0 {
            return Err(crate::err!(ConfigValue {
                key: "git.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            }));
        }
        if self.git.concurrency == 0 {
            return Err(crate::err!(ConfigValue {
                key: "git.concurrency".to_string(),
                message: "must be greater than zero".to_string(),
            }));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(crate::err!(ConfigValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        })),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        crate::err!(ConfigValue {
            key: key.to_string(),
            message: format!("'{value}': {e}"),
        })
    })
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
fn expand_env_vars(content: &str) -> String {
    expand_vars(content, |name| std::env::var(name).ok())
}

fn expand_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let braced = BRACED_VAR_PATTERN.replace_all(content, |caps: &regex::Captures<'_>| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    BARE_VAR_PATTERN
        .replace_all(&braced, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
