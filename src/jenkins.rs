//! Jenkins JSON API client.
//!
//! Thin reqwest wrapper over the three queries herald needs: the set of
//! currently-building jobs, a job's final build metadata, and the failed
//! test cases of that build. Authenticates with basic auth (user + API
//! token), the standard Jenkins arrangement.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use color_eyre::Result;
use serde::Deserialize;

use crate::build::{BuildError, BuildInfo, BuildResult};
use crate::config::JenkinsConfig;
use crate::tracker::TrackedJobs;

/// The CI-side collaborator: everything the poll loop asks of Jenkins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CiClient: Send + Sync {
    /// Jobs currently building, with the metadata of their running build.
    /// May fail transiently; the caller skips the cycle, never crashes.
    async fn building_jobs(&self) -> Result<TrackedJobs>;

    /// Final metadata of the job's most recent build.
    async fn last_build(&self, job_name: &str) -> Result<BuildInfo>;

    /// Failed test cases of the job's most recent build.
    async fn last_build_errors(&self, job_name: &str) -> Result<Vec<BuildError>>;
}

/// Jenkins REST client.
pub struct JenkinsClient {
    config: JenkinsConfig,
    /// HTTP client, reused across polls for connection pooling.
    client: reqwest::Client,
}

// --- Jenkins API response types ---

#[derive(Debug, Deserialize)]
struct JobsResponse {
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    name: String,
    #[serde(rename = "lastBuild")]
    last_build: Option<LastBuild>,
}

#[derive(Debug, Deserialize)]
struct LastBuild {
    #[serde(default)]
    building: bool,
    result: Option<String>,
    duration: Option<u64>,
    #[serde(rename = "builtOn")]
    built_on: Option<String>,
    /// Build start time, milliseconds since the epoch.
    timestamp: Option<i64>,
    #[serde(default)]
    actions: Vec<BuildAction>,
}

#[derive(Debug, Deserialize)]
struct BuildAction {
    #[serde(default)]
    causes: Vec<BuildCause>,
}

#[derive(Debug, Deserialize)]
struct BuildCause {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TestReport {
    #[serde(default)]
    suites: Vec<TestSuite>,
}

#[derive(Debug, Deserialize)]
struct TestSuite {
    #[serde(default)]
    cases: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    #[serde(rename = "className")]
    class_name: Option<String>,
    #[serde(default)]
    status: String,
}

impl LastBuild {
    fn into_build_info(self) -> BuildInfo {
        let user_id = self
            .actions
            .into_iter()
            .flat_map(|action| action.causes)
            .find_map(|cause| cause.user_id);

        BuildInfo {
            result: self.result.as_deref().and_then(BuildResult::parse),
            // Jenkins reports duration 0 while a build is still running.
            duration_ms: self.duration.filter(|ms| *ms > 0),
            built_on: self.built_on.filter(|host| !host.is_empty()),
            started_at: self
                .timestamp
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            user_id,
        }
    }
}

impl TestCase {
    fn is_failed(&self) -> bool {
        matches!(self.status.as_str(), "FAILED" | "REGRESSION")
    }
}

/// Tree filter for build metadata, shared by both build queries.
const BUILD_TREE: &str = "building,result,duration,builtOn,timestamp,actions[causes[userId]]";

impl JenkinsClient {
    pub fn new(config: JenkinsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self { config, client }
    }

    /// GET a Jenkins API path and parse the JSON body. A 404 is surfaced
    /// separately so callers can treat "no such resource" as empty.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.api_token))
            .header("Accept", "application/json")
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            color_eyre::eyre::bail!("Jenkins returned {} for {path}", resp.status());
        }

        Ok(Some(resp.json().await?))
    }
}

#[async_trait]
impl CiClient for JenkinsClient {
    async fn building_jobs(&self) -> Result<TrackedJobs> {
        let path = format!("/api/json?tree=jobs[name,lastBuild[{BUILD_TREE}]]");
        let response: JobsResponse = self
            .get_json(&path)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("Jenkins job listing not found"))?;

        let mut building = TrackedJobs::new();
        for job in response.jobs {
            if let Some(last_build) = job.last_build {
                if last_build.building {
                    building.insert(job.name, last_build.into_build_info());
                }
            }
        }
        Ok(building)
    }

    async fn last_build(&self, job_name: &str) -> Result<BuildInfo> {
        let path = format!("/job/{job_name}/lastBuild/api/json?tree={BUILD_TREE}");
        let last_build: LastBuild = self
            .get_json(&path)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("no last build for {job_name}"))?;
        Ok(last_build.into_build_info())
    }

    async fn last_build_errors(&self, job_name: &str) -> Result<Vec<BuildError>> {
        let path = format!(
            "/job/{job_name}/lastBuild/testReport/api/json?tree=suites[cases[name,className,status]]"
        );
        // Jobs without a test report 404 here; that is "no errors", not a fault.
        let report: TestReport = match self.get_json(&path).await? {
            Some(report) => report,
            None => return Ok(Vec::new()),
        };

        let errors = report
            .suites
            .into_iter()
            .flat_map(|suite| suite.cases)
            .filter(TestCase::is_failed)
            .map(|case| BuildError {
                name: case.name,
                class_name: case.class_name,
            })
            .collect();
        Ok(errors)
    }
}
