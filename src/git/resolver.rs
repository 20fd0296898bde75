//! Resolution of the latest feature versions of many repositories.

use crate::config::GitConfig;
use crate::error::Result;
use crate::git::TagLister;
use crate::types::RepositoryTagIndex;
use crate::version::{latest_by_feature, FeatureParser};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Queries remote tags and builds the [`RepositoryTagIndex`].
#[derive(Clone)]
pub struct TagResolver {
    lister: Arc<dyn TagLister>,
    parser: FeatureParser,
    concurrency: usize,
}

impl TagResolver {
    /// Create a resolver over `lister`.
    #[must_use]
    pub fn new(lister: Arc<dyn TagLister>, parser: FeatureParser, config: &GitConfig) -> Self {
        Self {
            lister,
            parser,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Latest version of every feature tagged in `repository`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteQuery` if the tags cannot be listed, or
    /// `VersionParse` if a feature tag carries an invalid version.
    pub async fn resolve_latest_tags(&self, repository: &str) -> Result<HashMap<String, String>> {
        let output = self.lister.list_tags(repository).await?;
        let latest = latest_by_feature(&self.parser, &output)?;

        tracing::debug!(
            repository = %repository,
            features = latest.len(),
            "Resolved latest tags"
        );

        Ok(latest)
    }

    /// Resolve every repository exactly once, `concurrency` at a time.
    ///
    /// # Errors
    ///
    /// Returns the first failure; queries still in flight are dropped.
    pub async fn resolve_all(&self, repositories: &BTreeSet<String>) -> Result<RepositoryTagIndex> {
        tracing::info!(
            repositories = repositories.len(),
            concurrency = self.concurrency,
            "Querying remote tags"
        );

        let resolved: Vec<(String, HashMap<String, String>)> = stream::iter(repositories)
            .map(|repository| async move {
                let latest = self.resolve_latest_tags(repository).await?;
                Ok::<_, crate::error::DrdreiError>((repository.clone(), latest))
            })
            .buffer_unordered(self.concurrency)
            .boxed()
            .try_collect()
            .await?;

        Ok(resolved.into_iter().collect())
    }
}

impl std::fmt::Debug for TagResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagResolver")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrdreiError;
    use crate::git::MockTagLister;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INFRA: &str = "git@github.com:org/infra.git";
    const APPS: &str = "git@github.com:org/apps.git";

    fn resolver(lister: MockTagLister) -> TagResolver {
        TagResolver::new(Arc::new(lister), FeatureParser::new(), &GitConfig::default())
    }

    #[tokio::test]
    async fn test_resolve_all_queries_each_repository_once() {
        let mut lister = MockTagLister::new();
        lister
            .expect_list_tags()
            .with(eq(INFRA))
            .times(1)
            .returning(|_| {
                Ok("a\trefs/tags/network-1.0.0\nb\trefs/tags/network-1.10.0\n".to_string())
            });
        lister
            .expect_list_tags()
            .with(eq(APPS))
            .times(1)
            .returning(|_| Ok("c\trefs/tags/web-0.2.0\n".to_string()));

        let repositories = BTreeSet::from([INFRA.to_string(), APPS.to_string()]);
        let index = resolver(lister).resolve_all(&repositories).await.unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.latest(INFRA, "network"), Some("1.10.0"));
        assert_eq!(index.latest(APPS, "web"), Some("0.2.0"));
    }

    #[tokio::test]
    async fn test_repository_without_feature_tags_is_indexed_empty() {
        let mut lister = MockTagLister::new();
        lister
            .expect_list_tags()
            .returning(|_| Ok("a\trefs/tags/v1.0.0\n".to_string()));

        let repositories = BTreeSet::from([INFRA.to_string()]);
        let index = resolver(lister).resolve_all(&repositories).await.unwrap();

        assert!(index.features(INFRA).is_some_and(HashMap::is_empty));
    }

    #[tokio::test]
    async fn test_remote_failure_aborts_resolution() {
        let mut lister = MockTagLister::new();
        lister.expect_list_tags().returning(|repository| {
            Err(crate::err!(RemoteQuery {
                repository: repository.to_string(),
                message: "Permission denied (publickey)".to_string(),
            }))
        });

        let repositories = BTreeSet::from([INFRA.to_string()]);
        let err = resolver(lister).resolve_all(&repositories).await.unwrap_err();
        assert!(matches!(err, DrdreiError::RemoteQuery { .. }));
    }

    #[tokio::test]
    async fn test_invalid_version_aborts_resolution() {
        let mut lister = MockTagLister::new();
        lister
            .expect_list_tags()
            .returning(|_| Ok("a\trefs/tags/app-1.0.0_hotfix\n".to_string()));

        let err = resolver(lister)
            .resolve_latest_tags(INFRA)
            .await
            .unwrap_err();
        assert!(matches!(err, DrdreiError::VersionParse { .. }));
    }

    /// Records the highest number of overlapping `list_tags` calls.
    #[derive(Default)]
    struct InFlightLister {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TagLister for InFlightLister {
        async fn list_tags(&self, _repository: &str) -> Result<String> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok("a\trefs/tags/app-1.0.0\n".to_string())
        }
    }

    async fn peak_in_flight(concurrency: usize) -> usize {
        let lister = Arc::new(InFlightLister::default());
        let config = GitConfig {
            concurrency,
            ..GitConfig::default()
        };
        let resolver = TagResolver::new(
            Arc::clone(&lister) as Arc<dyn TagLister>,
            FeatureParser::new(),
            &config,
        );

        let repositories: BTreeSet<String> =
            (0..6).map(|i| format!("git@github.com:org/repo{i}.git")).collect();
        let index = resolver.resolve_all(&repositories).await.unwrap();
        assert_eq!(index.len(), 6);

        lister.peak.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_concurrency_one_queries_sequentially() {
        assert_eq!(peak_in_flight(1).await, 1);
    }

    #[tokio::test]
    async fn test_concurrency_bounds_parallel_queries() {
        assert_eq!(peak_in_flight(3).await, 3);
    }

    #[tokio::test]
    async fn test_empty_repository_set_makes_no_queries() {
        let mut lister = MockTagLister::new();
        lister.expect_list_tags().never();

        let index = resolver(lister).resolve_all(&BTreeSet::new()).await.unwrap();
        assert!(index.is_empty());
    }
}
