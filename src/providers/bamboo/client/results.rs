use super::core::{BambooClient, Query, API_PREFIX};
use crate::error::Result;
use crate::providers::bamboo::pagination::Cursor;
use crate::providers::bamboo::types::{
    BuildDetail, BuildResult, BuildStatus, Page, PlanSummary, PlansResponse, ResultsResponse,
};

/// Field of a build result detail that can be expanded by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    JiraIssues,
    Changes,
}

impl Expansion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JiraIssues => "jiraIssues",
            Self::Changes => "changes",
        }
    }
}

/// `query` plus the `start-index` of `cursor`; the first page carries no offset.
///
/// The cursor owns `start-index`, so a caller-supplied one is dropped.
fn paged_query(query: &[(String, String)], cursor: Cursor) -> Query {
    let mut paged: Query = query
        .iter()
        .filter(|(name, _)| name != "start-index")
        .cloned()
        .collect();
    if !cursor.is_first() {
        paged.push(("start-index".to_string(), cursor.offset.to_string()));
    }
    paged
}

impl BambooClient {
    pub async fn fetch_results_page(
        &self,
        plan_key: &str,
        query: &[(String, String)],
        cursor: Cursor,
    ) -> Result<Page<BuildResult>> {
        let path = format!("{API_PREFIX}result/{plan_key}.json");
        let response: ResultsResponse = self.get_json(&path, &paged_query(query, cursor)).await?;
        Ok(response.results)
    }

    pub async fn fetch_plans_page(
        &self,
        query: &[(String, String)],
        cursor: Cursor,
    ) -> Result<Page<PlanSummary>> {
        let path = format!("{API_PREFIX}plan.json");
        let response: PlansResponse = self.get_json(&path, &paged_query(query, cursor)).await?;
        Ok(response.plans)
    }

    pub async fn fetch_build_status(&self, plan_key: &str, number: &str) -> Result<BuildStatus> {
        let path = format!("{API_PREFIX}result/{plan_key}/{number}.json");
        self.get_json(&path, &[]).await
    }

    pub async fn fetch_build_detail(
        &self,
        build_key: &str,
        expansion: Expansion,
    ) -> Result<BuildDetail> {
        let path = format!("{API_PREFIX}result/{build_key}.json");
        let query = [("expand".to_string(), expansion.as_str().to_string())];
        self.get_json(&path, &query).await
    }

    /// Raw content of an artifact shared by a build.
    pub async fn fetch_artifact(&self, build_key: &str, artifact_name: &str) -> Result<String> {
        let path = format!("browse/{build_key}/artifact/shared/{artifact_name}/{artifact_name}");
        self.get_text(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::bamboo::types::BuildState;

    #[test]
    fn test_first_page_has_no_start_index() {
        let query = vec![("expand".to_string(), "results".to_string())];
        assert_eq!(paged_query(&query, Cursor::first()), query);
    }

    #[test]
    fn test_later_pages_append_start_index() {
        let paged = paged_query(&[], Cursor { offset: 4 });
        assert_eq!(paged, vec![("start-index".to_string(), "4".to_string())]);
    }

    #[test]
    fn test_caller_start_index_is_replaced_by_cursor() {
        let query = vec![
            ("start-index".to_string(), "5".to_string()),
            ("includeAllStates".to_string(), "true".to_string()),
        ];

        assert_eq!(
            paged_query(&query, Cursor::first()),
            vec![("includeAllStates".to_string(), "true".to_string())]
        );
        assert_eq!(
            paged_query(&query, Cursor { offset: 2 }),
            vec![
                ("includeAllStates".to_string(), "true".to_string()),
                ("start-index".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_results_page_sends_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/result/PRJ-PLAN.json?start-index=2")
            .with_status(200)
            .with_body(
                r#"{"results": {"size": 3, "max-result": 1, "start-index": 2,
                    "result": [{"number": "21", "state": "Successful"}]}}"#,
            )
            .create_async()
            .await;

        let client = BambooClient::new(&server.url(), None, None).unwrap();
        let page = client
            .fetch_results_page("PRJ-PLAN", &[], Cursor { offset: 2 })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.start_index, Some(2));
        assert_eq!(page.items[0].state, BuildState::Successful);
    }

    #[tokio::test]
    async fn test_fetch_artifact_returns_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/browse/myPrj-myPlan-234/artifact/shared/name1/name1")
            .with_status(200)
            .with_body("AAA")
            .create_async()
            .await;

        let client = BambooClient::new(&server.url(), None, None).unwrap();
        let content = client
            .fetch_artifact("myPrj-myPlan-234", "name1")
            .await
            .unwrap();

        assert_eq!(content, "AAA");
    }
}
