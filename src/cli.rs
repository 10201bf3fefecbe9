use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Credentials;
use crate::config::{Config, OutputFormat};
use crate::output::{export_json, render_summary, FetchProgress};
use crate::providers::BambooProvider;
use crate::report::{Answer, Report};

#[derive(Parser)]
#[command(name = "bamboolens")]
#[command(author, version, about = "Bamboo build chain explorer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./bamboolens.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bamboo base URL, including any context path
    #[arg(short, long, global = true, env = "BAMBOO_URL")]
    url: Option<String>,

    #[arg(long, global = true, env = "BAMBOO_USERNAME")]
    username: Option<String>,

    #[arg(long, global = true, env = "BAMBOO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Number of the latest successful build of a plan
    LatestSuccessful {
        plan: String,

        /// Extra query parameters, e.g. "includeAllStates=true"
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Lifecycle state of a single build
    Status { plan: String, number: String },
    /// State and number of the latest build of a plan
    LatestStatus { plan: String },
    /// Every plan visible to the configured user
    Plans {
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Content of a shared artifact of a build
    Artifact { build: String, name: String },
    /// JIRA issues of a build and every build it was triggered by
    Issues { build: String },
    /// Change authors of a build and every build it was triggered by
    Changes { build: String },
}

impl Commands {
    fn describe(&self) -> String {
        match self {
            Self::LatestSuccessful { plan, .. } => {
                format!("Searching result pages of {plan} for a successful build")
            }
            Self::Status { plan, number } => format!("Fetching status of {plan} #{number}"),
            Self::LatestStatus { plan } => format!("Fetching latest result of {plan}"),
            Self::Plans { .. } => "Fetching plan pages".to_string(),
            Self::Artifact { build, name } => format!("Fetching artifact {name} of {build}"),
            Self::Issues { build } => format!("Walking build chain of {build} for JIRA issues"),
            Self::Changes { build } => format!("Walking build chain of {build} for changes"),
        }
    }

    async fn run(&self, provider: &BambooProvider) -> crate::error::Result<Answer> {
        let answer = match self {
            Self::LatestSuccessful { plan, query } => Answer::LatestSuccessfulBuild {
                plan: plan.clone(),
                number: provider
                    .latest_successful_build_number(plan, query.as_deref())
                    .await?,
            },
            Self::Status { plan, number } => Answer::BuildStatus {
                plan: plan.clone(),
                number: number.clone(),
                life_cycle_state: provider.build_status(plan, number).await?,
            },
            Self::LatestStatus { plan } => {
                let (state, number) = provider.latest_build_status(plan).await?;
                Answer::LatestBuildStatus {
                    plan: plan.clone(),
                    number,
                    state,
                }
            }
            Self::Plans { query } => Answer::Plans {
                plans: provider.all_plans(query.as_deref()).await?,
            },
            Self::Artifact { build, name } => Answer::Artifact {
                build: build.clone(),
                name: name.clone(),
                content: provider.artifact_content(build, name).await?,
            },
            Self::Issues { build } => {
                let aggregate = provider.jira_issues_from_build(build).await?;
                Answer::JiraIssues {
                    build: build.clone(),
                    chain: aggregate.chain,
                    issues: aggregate.items,
                }
            }
            Self::Changes { build } => {
                let aggregate = provider.changes_from_build(build).await?;
                Answer::Changes {
                    build: build.clone(),
                    chain: aggregate.chain,
                    changes: aggregate.items,
                }
            }
        };

        Ok(answer)
    }
}

impl Cli {
    fn provider(&self, config: &Config) -> Result<BambooProvider> {
        let base_url = self
            .url
            .clone()
            .or_else(|| config.bamboo.base_url.clone())
            .context("No Bamboo URL configured; pass --url, set BAMBOO_URL or add base-url to the config file")?;

        let credentials = Credentials::from_parts(
            self.username.clone().or_else(|| config.bamboo.username.clone()),
            self.password.clone().or_else(|| config.bamboo.password.clone()),
        );
        let timeout = config.bamboo.timeout_seconds.map(Duration::from_secs);

        info!(
            "Using Bamboo server {base_url}{}",
            if credentials.is_some() { " (authenticated)" } else { "" }
        );

        let provider = BambooProvider::new(&base_url, credentials, timeout)?
            .with_max_chain_depth(config.bamboo.max_chain_depth);
        Ok(provider)
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let provider = self.provider(&config)?;

        let format = self.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        let description = self.command.describe();
        let progress = FetchProgress::start(&description);
        let answer = match self.command.run(&provider).await {
            Ok(answer) => {
                progress.finish_ok(&description);
                answer
            }
            Err(e) => {
                progress.finish_failed(&description);
                debug!("Underlying failure: {:?}", e.root_cause());
                return Err(e.into());
            }
        };

        let report = Report::new(provider.base_url(), answer);

        let mut rendered = Vec::new();
        match format {
            OutputFormat::Json => export_json(&report, pretty, &mut rendered)?,
            OutputFormat::Summary => rendered.extend_from_slice(render_summary(&report).as_bytes()),
        }

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, &rendered)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Report written to: {}", output_path.display());
        } else {
            print!("{}", String::from_utf8_lossy(&rendered));
        }

        Ok(())
    }
}
