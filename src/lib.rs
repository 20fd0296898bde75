//! # drdrei
//!
//! Finds Terraform module calls that are pinned to an outdated feature tag.
//!
//! Module sources such as
//! `git::https://github.com/org/infra.git?ref=network-1.2.0` pin a module to
//! a tag of the form `<feature>-<semver>`. drdrei lists the tags of every
//! referenced repository and reports each module call whose pinned version
//! is not the latest tag of its feature.
//!
//! ## Features
//!
//! - **Terraform loading**: `module` blocks from `.tf` and `.tf.json` files
//! - **One query per repository**: HTTPS and SSH sources of the same
//!   repository share a single `git ls-remote`
//! - **Semantic ordering**: `1.10.0` is newer than `1.9.0`
//! - **Output formats**: plain text and JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use drdrei::reporter::Reporter;
//! use drdrei::{Auditor, Config, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let auditor = Auditor::new(config.clone());
//!
//!     let report = auditor.run(&["./terraform"]).await?;
//!     print!("{}", Reporter::new(&config).generate(&report, ReportFormat::Text)?);
//!
//!     Ok(())
//! }
//! ```

// Note: README is not included as doc to avoid doctest failures
// See README.md for full documentation
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod parser;
pub mod reporter;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use audit::Auditor;
pub use config::Config;
pub use error::{DrdreiError, Result};
pub use types::{
    AuditReport, AuditResult, Feature, LoadWarning, ModuleCall, ReportFormat,
    RepositoryTagIndex, SourcePos,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auditor_creation() {
        let auditor = Auditor::new(Config::default());
        assert_eq!(auditor.config().git.program, "git");
    }
}
