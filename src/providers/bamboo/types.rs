use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One page of a Bamboo listing endpoint.
///
/// Bamboo wraps listing items in an object carrying the pagination metadata,
/// e.g. `{"size": 5, "max-result": 2, "start-index": 0, "plan": [...]}`. Item
/// arrays are named after the listing (`result` for build results, `plan` for
/// plans), so both names are accepted. Single unpaged responses omit the
/// metadata entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Total item count across all pages
    #[serde(default)]
    pub size: Option<usize>,
    /// Items per page
    #[serde(default, rename = "max-result")]
    pub max_result: Option<usize>,
    /// Offset of the first item in this page
    #[serde(default, rename = "start-index")]
    pub start_index: Option<usize>,
    /// Items of this page, in server order
    #[serde(default = "Vec::new", alias = "result", alias = "plan")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    #[cfg(test)]
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            size: None,
            max_result: None,
            start_index: None,
            items,
        }
    }

    /// Offset of the page that follows this one, if the server declares more items.
    pub fn next_offset(&self) -> Option<usize> {
        let (size, _, start_index) = match (self.size, self.max_result, self.start_index) {
            (Some(size), Some(max_result), Some(start_index)) => (size, max_result, start_index),
            _ => return None,
        };

        // An offset past usize::MAX cannot name a further page.
        let next = start_index.checked_add(self.items.len())?;
        (next < size).then_some(next)
    }
}

/// `{"results": {...}}` envelope of the result listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ResultsResponse {
    pub results: Page<BuildResult>,
}

/// `{"plans": {...}}` envelope of the plan listing endpoint.
#[derive(Debug, Deserialize)]
pub struct PlansResponse {
    pub plans: Page<PlanSummary>,
}

/// Outcome of a finished build as reported by Bamboo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildState {
    Successful,
    Failed,
    Unknown,
    /// Any state string this client has no dedicated variant for
    Other(String),
}

impl BuildState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Successful => "Successful",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(state) => state,
        }
    }
}

impl From<String> for BuildState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "Successful" => Self::Successful,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            _ => Self::Other(state),
        }
    }
}

impl From<BuildState> for String {
    fn from(state: BuildState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single build result of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// Build number within the plan (e.g., "416")
    pub number: String,
    /// Final state of the build
    pub state: BuildState,
    /// Lifecycle of the build (e.g., "Finished", "InProgress")
    #[serde(default)]
    pub life_cycle_state: Option<String>,
    /// Full build key (e.g., "PRJ-PLAN-416")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_completed_time: Option<DateTime<FixedOffset>>,
}

/// A build plan as listed by the plan endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub key: String,
    pub name: String,
}

/// Body of the single build status endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    pub life_cycle_state: String,
}

/// Build result detail with either issues or changes expanded.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDetail {
    /// Free-text reason, may embed an anchor to the parent build
    #[serde(default)]
    pub build_reason: Option<String>,
    #[serde(default)]
    pub jira_issues: Option<IssueList>,
    #[serde(default)]
    pub changes: Option<ChangeList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueList {
    #[serde(default)]
    pub issue: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
pub struct JiraIssue {
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeList {
    #[serde(default)]
    pub change: Vec<Change>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaged_results_have_no_next_offset() {
        let body = r#"{"results": {"result": [
            {"number": "23", "state": "Failed"},
            {"number": "22", "state": "Successful"}
        ]}}"#;

        let response: ResultsResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.results.items.len(), 2);
        assert_eq!(response.results.items[1].state, BuildState::Successful);
        assert_eq!(response.results.next_offset(), None);
    }

    #[test]
    fn test_paged_plans_report_next_offset() {
        let body = r#"{"plans": {"size": 5, "max-result": 2, "start-index": 2, "plan": [
            {"key": "EE-FF", "name": "Full name3"},
            {"key": "GG-HH", "name": "Full name4"}
        ]}}"#;

        let response: PlansResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.plans.next_offset(), Some(4));
    }

    #[test]
    fn test_last_page_has_no_next_offset() {
        let page = Page {
            size: Some(5),
            max_result: Some(1),
            start_index: Some(4),
            items: vec!["II-LL"],
        };

        assert_eq!(page.next_offset(), None);
    }

    #[test]
    fn test_overflowing_start_index_ends_walk() {
        let body = r#"{"results": {"size": 5, "max-result": 2,
            "start-index": 18446744073709551615,
            "result": [{"number": "1", "state": "Failed"}]}}"#;

        let response: ResultsResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.results.next_offset(), None);
    }

    #[test]
    fn test_missing_item_array_is_empty_page() {
        let response: ResultsResponse =
            serde_json::from_str(r#"{"results": {"size": 0}}"#).unwrap();
        assert!(response.results.items.is_empty());
    }

    #[test]
    fn test_unknown_state_is_preserved() {
        let state: BuildState = serde_json::from_str(r#""NotBuilt""#).unwrap();
        assert_eq!(state, BuildState::Other("NotBuilt".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), r#""NotBuilt""#);
    }

    #[test]
    fn test_build_result_with_completion_time() {
        let build: BuildResult = serde_json::from_str(
            r#"{"number": "7", "state": "Failed", "lifeCycleState": "Finished",
                "buildCompletedTime": "2016-03-10T11:40:32.000+01:00"}"#,
        )
        .unwrap();

        assert_eq!(build.life_cycle_state.as_deref(), Some("Finished"));
        assert!(build.build_completed_time.is_some());
    }
}
