use indexmap::IndexSet;
use log::debug;
use serde::Serialize;

use crate::error::{BambooError, Result};

use super::client::{BambooClient, Expansion};
use super::reason::BuildReasonLink;
use super::types::BuildDetail;

pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 64;

/// Values of one field gathered across a chain of dependent builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainAggregate {
    /// Build keys visited, requested build first, root last
    pub chain: Vec<String>,
    /// Values in chain order
    pub items: Vec<String>,
}

impl Expansion {
    /// Issue keys name the issue itself, so an issue touched by several builds
    /// is reported once. Changes stay per build.
    fn merges_duplicates(self) -> bool {
        matches!(self, Self::JiraIssues)
    }

    fn values(self, detail: BuildDetail) -> Vec<String> {
        match self {
            Self::JiraIssues => detail
                .jira_issues
                .map(|issues| issues.issue.into_iter().map(|issue| issue.key).collect())
                .unwrap_or_default(),
            Self::Changes => detail
                .changes
                .map(|changes| {
                    changes
                        .change
                        .into_iter()
                        .map(|change| change.full_name)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Follows "Child of" references from a build up to the root of its chain.
pub struct ChainResolver<'a> {
    client: &'a BambooClient,
    max_depth: usize,
}

impl<'a> ChainResolver<'a> {
    /// A `max_depth` of 0 is treated as 1: the requested build is always fetched.
    pub fn new(client: &'a BambooClient, max_depth: usize) -> Self {
        Self {
            client,
            max_depth: max_depth.max(1),
        }
    }

    /// Collects `expansion` from `build_key` and every ancestor build.
    ///
    /// # Errors
    ///
    /// - `ChainFetchFailed` when any build of the chain cannot be fetched
    /// - `CyclicChain` when a build references a build already visited
    /// - `ChainTooDeep` when the chain has more than `max_depth` builds
    pub async fn resolve(&self, build_key: &str, expansion: Expansion) -> Result<ChainAggregate> {
        let mut visited = IndexSet::new();
        let mut items = Vec::new();
        let mut next = Some(build_key.to_string());

        while let Some(build) = next.take() {
            if visited.contains(&build) {
                return Err(BambooError::CyclicChain { build });
            }
            if visited.len() == self.max_depth {
                return Err(BambooError::ChainTooDeep {
                    limit: self.max_depth,
                });
            }

            let hop = visited.len();
            debug!("Fetching {} of {build} (chain hop {hop})", expansion.as_str());

            let detail = self
                .client
                .fetch_build_detail(&build, expansion)
                .await
                .map_err(|source| BambooError::ChainFetchFailed {
                    hop,
                    build: build.clone(),
                    source: Box::new(source),
                })?;

            next = detail
                .build_reason
                .as_deref()
                .and_then(BuildReasonLink::parse)
                .map(|link| link.parent_build_key);
            items.extend(expansion.values(detail));
            visited.insert(build);
        }

        if expansion.merges_duplicates() {
            items = items.into_iter().collect::<IndexSet<_>>().into_iter().collect();
        }

        Ok(ChainAggregate {
            chain: visited.into_iter().collect(),
            items,
        })
    }
}
