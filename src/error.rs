//! Error types for drdrei.
//!
//! This module defines the error hierarchy using `thiserror`. Every variant
//! carries the source location it was raised from, which the `err!` macro
//! fills in automatically.
//!
//! # Error Categories
//!
//! - **Filesystem errors**: directory walking, reading Terraform files
//! - **Load errors**: Terraform files that fail to parse
//! - **Source errors**: `git::` module sources that cannot be decomposed
//! - **Remote errors**: tag listing failures and unparseable tag versions
//! - **Config errors**: invalid configuration files or values
//!
//! # Example
//!
//! ```rust
//! use drdrei::error::{DrdreiError, Result};
//!
//! fn read_main(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| DrdreiError::io(path, e, file!(), line!()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(ConfigValue { key: "git.timeout_secs".to_string(), message: "must be positive".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident $(: $value:expr)?),* $(,)? }) => {
        $crate::error::DrdreiError::$variant {
            $($field $(: $value)?,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for drdrei operations.
pub type Result<T> = std::result::Result<T, DrdreiError>;

/// The main error type for drdrei.
#[derive(Error, Debug)]
pub enum DrdreiError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Failure while walking a directory tree.
    #[error("Failed to walk directory '{path}' ({src_path}:{src_line}): {message}")]
    DirectoryWalk {
        /// The root being walked
        path: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Terraform Loading Errors
    // =========================================================================
    /// A Terraform file could not be parsed.
    #[error("Failed to load Terraform file '{file}' ({src_path}:{src_line}): {message}")]
    ModuleLoad {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A `git::` module source could not be decomposed into host/org/repo.
    #[error("Failed to parse git source '{module_source}' ({src_path}:{src_line}): {message}")]
    GitSourceParse {
        /// The source string that failed to parse
        module_source: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Remote Tag Errors
    // =========================================================================
    /// Listing the remote tags of a repository failed.
    #[error("Failed to list remote tags of '{repository}' ({src_path}:{src_line}): {message}")]
    RemoteQuery {
        /// The repository identity that was queried
        repository: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A tag carried a version that is not valid semver.
    #[error("Failed to parse version '{version}' ({src_path}:{src_line}): {source}")]
    VersionParse {
        /// The version string that failed to parse
        version: String,
        /// The underlying semver error
        #[source]
        source: semver::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total): {}", summarize(.errors))]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<DrdreiError>,
    },
}

fn summarize(errors: &[DrdreiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DrdreiError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::ConfigParse {
            message,
            source,
            src_path,
            src_line,
        }
    }

    /// Determines if the error only affects a single directory, so the audit
    /// can record it as a warning and move on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { .. } | Self::DirectoryNotFound { .. } | Self::ModuleLoad { .. } => true,
            Self::Multiple { errors, .. } => errors.iter().all(Self::is_recoverable),
            _ => false,
        }
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::DirectoryNotFound { .. } => 15,
            Self::DirectoryWalk { .. } => 16,
            Self::RemoteQuery { .. } => 17,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            Self::Multiple { .. } => 21,
            Self::GitSourceParse { .. } => 23,
            Self::VersionParse { .. } => 24,
            _ => 1,
        }
    }

    /// Consolidates multiple errors into a single `DrdreiError::Multiple` if there's more than one.
    /// Otherwise, returns the single error or `Ok(())` if no errors.
    ///
    /// # Errors
    ///
    /// Returns the collected error(s) when `errors` is not empty.
    pub fn collect(mut errors: Vec<Self>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => Err(Self::Multiple { count, errors }),
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T> {
    /// Adds a file path context to an I/O error.
    ///
    /// # Errors
    ///
    /// Returns `DrdreiError::Io` when `self` is an error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| DrdreiError::Io {
            path: path.into(),
            source,
            src_path: file!(),
            src_line: line!(),
        })
    }
}

impl From<serde_json::Error> for DrdreiError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}

/// A utility for collecting multiple errors during parsing or processing.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DrdreiError>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn add(&mut self, error: DrdreiError) {
        self.errors.push(error);
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Convert to a Result, returning Multiple error if there are any errors.
    ///
    /// # Errors
    ///
    /// Returns the collected error(s) when any were added.
    pub fn into_result(self) -> Result<()> {
        DrdreiError::collect(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_error(file: &str) -> DrdreiError {
        crate::err!(ModuleLoad {
            file: PathBuf::from(file),
            message: "unexpected token".to_string(),
        })
    }

    #[test]
    fn test_collect_empty_is_ok() {
        assert!(DrdreiError::collect(Vec::new()).is_ok());
    }

    #[test]
    fn test_collect_single_error_is_unwrapped() {
        let err = DrdreiError::collect(vec![load_error("main.tf")]).unwrap_err();
        assert!(matches!(err, DrdreiError::ModuleLoad { .. }));
    }

    #[test]
    fn test_collect_multiple_errors() {
        let mut collector = ErrorCollector::new();
        collector.add(load_error("a.tf"));
        collector.add(load_error("b.tf"));
        assert_eq!(collector.count(), 2);

        let err = collector.into_result().unwrap_err();
        match &err {
            DrdreiError::Multiple { count, .. } => assert_eq!(*count, 2),
            other => panic!("Expected Multiple, got {other:?}"),
        }
        assert!(err.to_string().contains("a.tf"));
        assert!(err.to_string().contains("b.tf"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_remote_errors_are_not_recoverable() {
        let err = crate::err!(RemoteQuery {
            repository: "git@github.com:org/repo.git".to_string(),
            message: "exit status 128".to_string(),
        });
        assert!(!err.is_recoverable());
        assert_eq!(err.exit_code(), 17);
    }

    #[test]
    fn test_err_macro_accepts_field_shorthand() {
        let repository = "git@github.com:org/repo.git".to_string();
        let message = "timed out after 1s".to_string();
        let err = crate::err!(RemoteQuery {
            repository,
            message,
        });
        match err {
            DrdreiError::RemoteQuery {
                repository,
                message,
                src_path,
                ..
            } => {
                assert_eq!(repository, "git@github.com:org/repo.git");
                assert_eq!(message, "timed out after 1s");
                assert_eq!(src_path, file!());
            }
            other => panic!("Expected RemoteQuery, got {other:?}"),
        }
    }

    #[test]
    fn test_with_path_wraps_io_errors() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.with_path("/tmp/missing.tf").unwrap_err();
        assert!(err.to_string().contains("/tmp/missing.tf"));
    }
}
