use std::fmt;

use thiserror::Error;

/// Paged listing a walk was run against, used to phrase empty-listing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Build results of a plan
    Results,
    /// Plans visible to the client
    Plans,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Results => f.write_str("The plan doesn't contain any result"),
            Self::Plans => f.write_str("No plans available"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BambooError {
    #[error("Unreachable endpoint: {url} ({reason})")]
    UnreachableEndpoint { url: String, reason: String },

    #[error("{0}")]
    EmptyCollection(Collection),

    #[error("The plan doesn't contain any successful build")]
    NoSuccessfulBuild,

    #[error("Failed to fetch build {build} at chain hop {hop}: {source}")]
    ChainFetchFailed {
        hop: usize,
        build: String,
        #[source]
        source: Box<BambooError>,
    },

    #[error("Build chain loops back to {build}")]
    CyclicChain { build: String },

    #[error("Build chain is deeper than {limit} builds")]
    ChainTooDeep { limit: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BambooError {
    /// Failure reported by the transport for this hop, with chain wrapping removed.
    pub fn root_cause(&self) -> &BambooError {
        match self {
            Self::ChainFetchFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BambooError>;
