//! Notification text rendering — pure formatting, no I/O.
//!
//! The message shape is fixed: a divider, a `**{status}**: {job}` header,
//! then one detail line per present build field (in a fixed order), then the
//! error list when non-empty.

use std::fmt;

use crate::build::{BuildError, BuildInfo};

/// Lifecycle phase being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Started,
    Finished,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Started"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Render the detail block for a build.
///
/// Lines appear in fixed order — Result, Duration, Built on, Started — and
/// only when the corresponding field is present; an absent field is not an
/// error, it just produces no line. Errors append an `Errors: N` header,
/// one line per error name, and an indented class line when known.
pub fn render_build(info: &BuildInfo, errors: &[BuildError]) -> String {
    let mut out = String::new();

    if let Some(result) = info.result {
        out.push_str(&format!("* Result: **{result}**\n"));
    }
    if let Some(ms) = info.duration_ms {
        out.push_str(&format!("* Duration: **{}**\n", format_duration(ms)));
    }
    if let Some(ref host) = info.built_on {
        out.push_str(&format!("* Built on: **{host}**\n"));
    }
    if let Some(ts) = info.started_at {
        out.push_str(&format!(
            "* Started: **{}**\n",
            ts.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    if !errors.is_empty() {
        out.push_str(&format!("Errors: {}\n", errors.len()));
        for error in errors {
            out.push_str(&format!("{}\n", error.name));
            if let Some(ref class) = error.class_name {
                out.push_str(&format!("    {class}\n"));
            }
        }
    }

    out
}

/// Render a complete notification message for a build event.
pub fn render_notification(
    status: BuildStatus,
    job_name: &str,
    info: &BuildInfo,
    errors: &[BuildError],
) -> String {
    format!(
        "{}\n**{status}**: {job_name}\n{}",
        "-".repeat(80),
        render_build(info, errors)
    )
}

/// Format a millisecond duration the way Jenkins displays it.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
