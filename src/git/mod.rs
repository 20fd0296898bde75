//! Remote tag discovery.
//!
//! This module lists the tags of remote repositories and reduces them to the
//! latest version of every feature.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        TagResolver                              │
//! │  - One query per distinct repository                            │
//! │  - Bounded parallelism                                          │
//! │  - Builds the RepositoryTagIndex                                │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      TagLister (trait)                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                     ┌─────────────────┐
//!                     │ GitCliTagLister │
//!                     │  git ls-remote  │
//!                     └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use drdrei::git::{GitCliTagLister, TagLister};
//! use drdrei::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let lister = GitCliTagLister::new(&Config::default().git);
//!     let output = lister.list_tags("git@github.com:org/infra.git").await?;
//!     println!("{output}");
//!     Ok(())
//! }
//! ```

mod client;
mod resolver;

pub use client::GitCliTagLister;
pub use resolver::TagResolver;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for listing the tags of a remote repository.
///
/// Implementations return the raw `git ls-remote --tags` output: one
/// `<sha>\trefs/tags/<tag>` line per tag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagLister: Send + Sync {
    /// List the tags of `repository` (a repository identity such as
    /// `git@github.com:org/infra.git`).
    ///
    /// # Errors
    ///
    /// Returns `RemoteQuery` if the listing cannot be obtained.
    async fn list_tags(&self, repository: &str) -> Result<String>;
}
