//! Report generation module.
//!
//! This module renders an [`AuditReport`] in two formats:
//! - Text: Human-readable CLI output, one stanza per module call
//! - JSON: Machine-readable array of `{feature, pos, current, latest}`
//!
//! # Example
//!
//! ```rust
//! use drdrei::reporter::Reporter;
//! use drdrei::types::{AuditReport, ReportFormat};
//! use drdrei::Config;
//!
//! let reporter = Reporter::new(&Config::default());
//! let text = reporter.generate(&AuditReport::default(), ReportFormat::Text).unwrap();
//! assert_eq!(text, "You are all up to date\n");
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{AuditReport, ReportFormat};

pub use json::{JsonEntry, JsonReporter};
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, report: &AuditReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(report),
            ReportFormat::Text => TextReporter::new(&self.config).generate(report),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from audit results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, report: &AuditReport) -> Result<String>;
}
