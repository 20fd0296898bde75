//! `git` command-line tag lister.

use crate::config::GitConfig;
use crate::error::Result;
use crate::git::TagLister;
use async_trait::async_trait;
use std::time::Duration;

/// Lists remote tags by running `git ls-remote --tags --refs`.
///
/// Authentication is whatever the local git setup provides (SSH agent,
/// credential helpers). Interactive prompts are disabled so a repository
/// that needs credentials fails instead of hanging.
#[derive(Debug, Clone)]
pub struct GitCliTagLister {
    program: String,
    timeout: Duration,
}

impl GitCliTagLister {
    /// Create a lister from the git configuration.
    #[must_use]
    pub fn new(config: &GitConfig) -> Self {
        Self {
            program: config.program.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn remote_error(repository: &str, message: String) -> crate::error::DrdreiError {
        crate::err!(RemoteQuery {
            repository: repository.to_string(),
            message,
        })
    }
}

#[async_trait]
impl TagLister for GitCliTagLister {
    async fn list_tags(&self, repository: &str) -> Result<String> {
        tracing::debug!(repository = %repository, program = %self.program, "Listing remote tags");

        let command = tokio::process::Command::new(&self.program)
            .args(["ls-remote", "--tags", "--refs", repository])
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, command)
            .await
            .map_err(|_| {
                Self::remote_error(
                    repository,
                    format!("timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| {
                Self::remote_error(repository, format!("failed to run '{}': {e}", self.program))
            })?;

        if !output.status.success() {
            return Err(Self::remote_error(
                repository,
                format!(
                    "git ls-remote failed ({}): {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::trace!(repository = %repository, lines = stdout.lines().count(), "Remote tags listed");
        Ok(stdout)
    }
}
