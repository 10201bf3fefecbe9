mod builds;
mod plans;

use std::time::Duration;

use log::info;

use crate::auth::Credentials;
use crate::error::Result;

use super::chain::{ChainAggregate, ChainResolver, DEFAULT_MAX_CHAIN_DEPTH};
use super::client::{BambooClient, Expansion};

/// Bamboo build-server provider.
///
/// Answers questions about plans and builds that span several result pages
/// or several dependent builds. Every operation fetches what it needs, one
/// request at a time, and keeps nothing between calls.
pub struct BambooProvider {
    client: BambooClient,
    max_chain_depth: usize,
}

impl BambooProvider {
    /// Creates a provider for the Bamboo server at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Bamboo base URL, including any context path (e.g., <https://ci.example.com/bamboo>)
    /// * `credentials` - Optional basic-auth credentials sent with every request
    /// * `timeout` - Optional per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = BambooClient::new(base_url, credentials, timeout)?;

        Ok(Self {
            client,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    /// Caps how many builds a chain walk visits before giving up.
    #[must_use]
    pub fn with_max_chain_depth(mut self, max_chain_depth: usize) -> Self {
        self.max_chain_depth = max_chain_depth;
        self
    }

    /// JIRA issue keys linked to `build_key` and every build it was triggered by.
    ///
    /// Keys of the requested build come first, followed by each ancestor's,
    /// nearest to farthest. An issue linked to several builds is listed once.
    pub async fn jira_issues_from_build(&self, build_key: &str) -> Result<ChainAggregate> {
        info!("Collecting JIRA issues for build chain of {build_key}");
        self.resolve_chain(build_key, Expansion::JiraIssues).await
    }

    /// Author names of the changes in `build_key` and every build it was triggered by.
    pub async fn changes_from_build(&self, build_key: &str) -> Result<ChainAggregate> {
        info!("Collecting changes for build chain of {build_key}");
        self.resolve_chain(build_key, Expansion::Changes).await
    }

    async fn resolve_chain(&self, build_key: &str, expansion: Expansion) -> Result<ChainAggregate> {
        let aggregate = ChainResolver::new(&self.client, self.max_chain_depth)
            .resolve(build_key, expansion)
            .await?;

        info!(
            "Collected {} {} across {} builds",
            aggregate.items.len(),
            expansion.as_str(),
            aggregate.chain.len()
        );

        Ok(aggregate)
    }

    /// Content of the shared artifact `artifact_name` of `build_key`.
    pub async fn artifact_content(&self, build_key: &str, artifact_name: &str) -> Result<String> {
        info!("Fetching artifact {artifact_name} of {build_key}");
        self.client.fetch_artifact(build_key, artifact_name).await
    }
}
