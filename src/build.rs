//! Build metadata types shared between the Jenkins client and the renderer.

use chrono::{DateTime, Utc};

/// Terminal result of a Jenkins build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
}

impl BuildResult {
    /// Parse the `result` field of the Jenkins JSON API. Anything
    /// unrecognised (or the `null` of a still-running build) maps to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SUCCESS" => Some(Self::Success),
            "FAILURE" => Some(Self::Failure),
            "UNSTABLE" => Some(Self::Unstable),
            "ABORTED" => Some(Self::Aborted),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Unstable => write!(f, "UNSTABLE"),
            Self::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Metadata for one build, as reported by Jenkins.
///
/// Every field is optional: an in-progress build has no result or duration
/// yet, and Jenkins omits fields freely depending on version and job type.
/// An absent field simply produces no output line when rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildInfo {
    pub result: Option<BuildResult>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Node the build ran on.
    pub built_on: Option<String>,
    /// When the build started.
    pub started_at: Option<DateTime<Utc>>,
    /// Jenkins user ID of whoever triggered the build. Drives recipient
    /// lookup in the conversation directory.
    pub user_id: Option<String>,
}

/// A failed test case attached to a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildError {
    pub name: String,
    pub class_name: Option<String>,
}
