//! Terraform loading module.
//!
//! This module turns a directory of Terraform files into the list of
//! `module` calls it declares, and decomposes `git::` module sources into
//! a repository identity and a ref.
//!
//! # Supported Constructs
//!
//! - `module` blocks with a literal `source` attribute in `.tf` files
//! - `module` objects in `.tf.json` files
//!
//! # Example
//!
//! ```rust,no_run
//! use drdrei::parser::{HclModuleLoader, ModuleLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let loader = HclModuleLoader::new();
//!     let calls = loader.load_module("./terraform".as_ref()).await?;
//!     println!("Found {} module calls", calls.len());
//!     Ok(())
//! }
//! ```

mod hcl;
mod source;

pub use self::hcl::HclModuleLoader;
pub use source::GitSourceUrl;

use crate::types::ModuleCall;
use async_trait::async_trait;
use std::path::Path;

/// File extensions that hold Terraform configuration.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Trait for loading the module calls of a single Terraform directory.
///
/// This trait allows for different loading implementations
/// (e.g., for testing with canned module calls).
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load every module call declared directly in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or one of its
    /// Terraform files is invalid.
    async fn load_module(&self, dir: &Path) -> crate::Result<Vec<ModuleCall>>;
}
