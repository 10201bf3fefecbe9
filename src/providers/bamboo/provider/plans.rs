use log::info;

use super::BambooProvider;
use crate::error::{BambooError, Collection, Result};
use crate::providers::bamboo::client::parse_query;
use crate::providers::bamboo::pagination::{Cursor, PageWalker};
use crate::providers::bamboo::types::PlanSummary;

impl BambooProvider {
    /// Every plan visible to the client, across all listing pages, in server order.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCollection(Plans)` if the listing holds no plans.
    pub async fn all_plans(&self, query: Option<&str>) -> Result<Vec<PlanSummary>> {
        info!("Fetching all plans");

        let client = &self.client;
        let query = parse_query(query);
        let query = query.as_slice();
        let plans = PageWalker::new(move |cursor: Cursor| client.fetch_plans_page(query, cursor))
            .collect()
            .await?;

        if plans.is_empty() {
            return Err(BambooError::EmptyCollection(Collection::Plans));
        }

        info!("Fetched {} plans", plans.len());
        Ok(plans)
    }
}
