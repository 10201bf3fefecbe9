mod chain;
mod client;
mod pagination;
mod provider;
mod reason;
mod types;

pub use chain::DEFAULT_MAX_CHAIN_DEPTH;
pub use provider::BambooProvider;
pub use types::{BuildState, PlanSummary};
