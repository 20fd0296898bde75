//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{AuditReport, AuditResult};
use colored::Colorize;

/// Printed when no module call needs attention.
pub const UP_TO_DATE_MESSAGE: &str = "You are all up to date";

/// Text report generator for CLI output.
///
/// Every result is rendered as a stanza:
///
/// ```text
/// network live/main.tf:12:0
/// using: network-1.2.0
/// latest: network-1.4.0
/// ```
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
        }
    }

    fn format_result(&self, result: &AuditResult) -> String {
        let location = format!("{}:0", result.position);
        let using = format!("{}-{}", result.feature, result.current);
        let latest = format!("{}-{}", result.feature, result.latest);

        if self.use_colors {
            let latest = if result.is_up_to_date() {
                latest.green()
            } else {
                latest.yellow().bold()
            };
            format!(
                "{} {}\nusing: {}\nlatest: {}\n\n",
                result.feature.bright_white().bold(),
                location.dimmed(),
                using,
                latest,
            )
        } else {
            format!("{} {location}\nusing: {using}\nlatest: {latest}\n\n", result.feature)
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, report: &AuditReport) -> Result<String> {
        if report.is_empty() {
            return Ok(format!("{UP_TO_DATE_MESSAGE}\n"));
        }

        Ok(report
            .results
            .iter()
            .map(|result| self.format_result(result))
            .collect())
    }
}
