use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::providers::bamboo::{BuildState, PlanSummary};

/// Answer to one command, as printed or exported.
#[derive(Debug, Serialize)]
pub struct Report {
    pub server: String,
    pub collected_at: DateTime<Utc>,
    #[serde(flatten)]
    pub answer: Answer,
}

impl Report {
    pub fn new(server: impl Into<String>, answer: Answer) -> Self {
        Self {
            server: server.into(),
            collected_at: Utc::now(),
            answer,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Answer {
    LatestSuccessfulBuild {
        plan: String,
        number: String,
    },
    BuildStatus {
        plan: String,
        number: String,
        life_cycle_state: String,
    },
    LatestBuildStatus {
        plan: String,
        number: String,
        state: BuildState,
    },
    Plans {
        plans: Vec<PlanSummary>,
    },
    Artifact {
        build: String,
        name: String,
        content: String,
    },
    JiraIssues {
        build: String,
        chain: Vec<String>,
        issues: Vec<String>,
    },
    Changes {
        build: String,
        chain: Vec<String>,
        changes: Vec<String>,
    },
}
