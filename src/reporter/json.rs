//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{AuditReport, AuditResult};
use serde::{Deserialize, Serialize};

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &AuditReport) -> Result<String> {
        let entries: Vec<JsonEntry> = report.results.iter().map(JsonEntry::from).collect();

        let mut buf = Vec::new();
        let serialized = if self.pretty {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            entries.serialize(&mut serializer)
        } else {
            serde_json::to_writer(&mut buf, &entries)
        };

        serialized.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })?;

        let mut json = String::from_utf8(buf).map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("JSON report is not valid UTF-8: {e}"),
            })
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// One audited module call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonEntry {
    /// Feature name
    pub feature: String,
    /// `<file>:<line>` of the module block
    pub pos: String,
    /// Pinned version
    pub current: String,
    /// Latest published version (empty if none)
    pub latest: String,
}

impl From<&AuditResult> for JsonEntry {
    fn from(result: &AuditResult) -> Self {
        Self {
            feature: result.feature.clone(),
            pos: result.position.to_string(),
            current: result.current.clone(),
            latest: result.latest.clone(),
        }
    }
}
