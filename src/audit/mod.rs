//! Audit orchestration.
//!
//! Ties the pipeline together:
//!
//! 1. discover the directories to inspect
//! 2. load their module calls and keep the `git::` ones
//! 3. query every distinct repository for its tags, once
//! 4. join each call's pinned feature version with the latest one
//!
//! Nothing is printed here; the caller renders the returned
//! [`AuditReport`].

mod discovery;

pub use discovery::{dedup_paths, discover_directories};

use crate::config::Config;
use crate::error::Result;
use crate::git::{GitCliTagLister, TagLister, TagResolver};
use crate::parser::{GitSourceUrl, HclModuleLoader, ModuleLoader};
use crate::types::{AuditReport, AuditResult, LoadWarning, ModuleCall, RepositoryTagIndex};
use crate::version::{FeatureParser, PatternVariant};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A `git::` module call with its source decomposed.
#[derive(Debug, Clone)]
struct LocatedCall {
    call: ModuleCall,
    repository: String,
    git_ref: String,
}

/// Runs audits with a fixed configuration.
///
/// # Example
///
/// ```rust,no_run
/// use drdrei::{Auditor, Config};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let auditor = Auditor::new(Config::default());
///     let report = auditor.run(&["./terraform"]).await?;
///
///     for result in &report.results {
///         println!("{} {} -> {}", result.feature, result.current, result.latest);
///     }
///     Ok(())
/// }
/// ```
pub struct Auditor {
    config: Config,
    loader: Arc<dyn ModuleLoader>,
    resolver: TagResolver,
    parser: FeatureParser,
}

impl Auditor {
    /// Create an auditor that parses HCL and lists tags with `git`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let lister = Arc::new(GitCliTagLister::new(&config.git));
        Self::with_components(config, Arc::new(HclModuleLoader::new()), lister)
    }

    /// Create an auditor from explicit collaborators.
    #[must_use]
    pub fn with_components(
        config: Config,
        loader: Arc<dyn ModuleLoader>,
        lister: Arc<dyn TagLister>,
    ) -> Self {
        let parser = FeatureParser::new();
        let resolver = TagResolver::new(lister, parser.clone(), &config.git);
        Self {
            config,
            loader,
            resolver,
            parser,
        }
    }

    /// The configuration this auditor runs with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Audit the Terraform directories under `targets`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails, a `git::` source cannot
    /// be decomposed, or a repository's tags cannot be listed or parsed.
    /// Directories that fail to load are reported as warnings instead.
    pub async fn run<P: AsRef<Path> + Sync>(&self, targets: &[P]) -> Result<AuditReport> {
        let targets = dedup_paths(targets);
        let audit = &self.config.audit;

        tracing::info!(
            targets = targets.len(),
            recursive = audit.recursive,
            "Starting audit"
        );

        let directories = discover_directories(&targets, audit.recursive, &audit.ignore_paths)?;
        let (calls, warnings) = self.collect_git_module_calls(&directories).await?;
        let located = locate(calls)?;

        let repositories: BTreeSet<String> =
            located.iter().map(|l| l.repository.clone()).collect();
        let index = self.resolver.resolve_all(&repositories).await?;
        let results = self.join(&located, &index);

        tracing::info!(
            directories = directories.len(),
            git_module_calls = located.len(),
            repositories = repositories.len(),
            results = results.len(),
            warnings = warnings.len(),
            "Audit complete"
        );

        Ok(AuditReport {
            results,
            warnings,
            directories_scanned: directories.len(),
            git_module_calls: located.len(),
            repositories_queried: repositories.len(),
        })
    }

    /// Load every directory and keep the calls with a `git::` source.
    async fn collect_git_module_calls(
        &self,
        directories: &[PathBuf],
    ) -> Result<(Vec<ModuleCall>, Vec<LoadWarning>)> {
        let mut calls = Vec::new();
        let mut warnings = Vec::new();

        for dir in directories {
            match self.loader.load_module(dir).await {
                Ok(found) => {
                    tracing::debug!(dir = %dir.display(), modules = found.len(), "Loaded directory");
                    calls.extend(found.into_iter().filter(ModuleCall::is_git_source));
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping directory");
                    warnings.push(LoadWarning {
                        directory: dir.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok((calls, warnings))
    }

    /// Pair every call with the latest version of its pinned feature.
    fn join(&self, located: &[LocatedCall], index: &RepositoryTagIndex) -> Vec<AuditResult> {
        let report_all = self.config.audit.report_all;

        located
            .iter()
            .filter_map(|l| {
                let Some(feature) = self.parser.parse(&l.git_ref, PatternVariant::GenericRef)
                else {
                    tracing::debug!(
                        module = %l.call.name,
                        git_ref = %l.git_ref,
                        "Ref is not pinned to a feature version"
                    );
                    return None;
                };

                let latest = index
                    .latest(&l.repository, &feature.name)
                    .unwrap_or_default()
                    .to_string();
                if latest.is_empty() {
                    tracing::debug!(
                        feature = %feature.name,
                        repository = %l.repository,
                        "No tag found for feature"
                    );
                }

                Some(AuditResult {
                    feature: feature.name,
                    current: feature.version,
                    latest,
                    position: l.call.position.clone(),
                    module_name: l.call.name.clone(),
                    repository: l.repository.clone(),
                })
            })
            .filter(|result| report_all || !result.is_up_to_date())
            .collect()
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

fn locate(calls: Vec<ModuleCall>) -> Result<Vec<LocatedCall>> {
    calls
        .into_iter()
        .map(|call| {
            let source = GitSourceUrl::parse(&call.source)?;
            Ok(LocatedCall {
                repository: source.repository_identity()?,
                git_ref: source.git_ref(),
                call,
            })
        })
        .collect()
}
