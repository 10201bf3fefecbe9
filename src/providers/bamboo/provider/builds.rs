use log::{debug, info};

use super::BambooProvider;
use crate::error::{BambooError, Collection, Result};
use crate::providers::bamboo::client::parse_query;
use crate::providers::bamboo::pagination::{Cursor, PageWalker, Search};
use crate::providers::bamboo::types::{BuildResult, BuildState};

impl BambooProvider {
    /// Number of the most recent successful build of `plan_key`.
    ///
    /// Result pages are scanned in server order (newest first) and the walk
    /// stops at the page holding the first successful build.
    ///
    /// # Arguments
    ///
    /// * `plan_key` - Plan key (e.g., "PRJ-PLAN")
    /// * `query` - Extra query parameters sent with every page (e.g., "?includeAllStates=true")
    ///
    /// # Errors
    ///
    /// - `EmptyCollection(Results)` if the first page holds no results
    /// - `NoSuccessfulBuild` if no result of any page is successful
    /// - `UnreachableEndpoint` if the plan does not exist or the server cannot be reached
    pub async fn latest_successful_build_number(
        &self,
        plan_key: &str,
        query: Option<&str>,
    ) -> Result<String> {
        info!("Looking up latest successful build of {plan_key}");

        let client = &self.client;
        let query = parse_query(query);
        let query = query.as_slice();
        let walker = PageWalker::new(move |cursor: Cursor| {
            client.fetch_results_page(plan_key, query, cursor)
        });

        match walker
            .find(|build: &BuildResult| build.state == BuildState::Successful)
            .await?
        {
            Search::Found(build) => {
                debug!("Latest successful build of {plan_key} is #{}", build.number);
                Ok(build.number)
            }
            Search::Exhausted { scanned: 0 } => {
                Err(BambooError::EmptyCollection(Collection::Results))
            }
            Search::Exhausted { scanned } => {
                debug!("None of {scanned} results of {plan_key} is successful");
                Err(BambooError::NoSuccessfulBuild)
            }
        }
    }

    /// State and number of the most recent build of `plan_key`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCollection(Results)` if the plan has no results.
    pub async fn latest_build_status(&self, plan_key: &str) -> Result<(BuildState, String)> {
        info!("Fetching latest build status of {plan_key}");

        let page = self
            .client
            .fetch_results_page(plan_key, &[], Cursor::first())
            .await?;

        page.items
            .into_iter()
            .next()
            .map(|build| (build.state, build.number))
            .ok_or(BambooError::EmptyCollection(Collection::Results))
    }

    /// Lifecycle state (e.g., "InProgress", "Finished") of build `number` of `plan_key`.
    pub async fn build_status(&self, plan_key: &str, number: &str) -> Result<String> {
        info!("Fetching status of {plan_key} #{number}");

        let status = self.client.fetch_build_status(plan_key, number).await?;
        Ok(status.life_cycle_state)
    }
}
