//! Integration tests for the notification pipeline:
//! snapshot diffing, message rendering, and the combination of the two.

use herald::build::{BuildError, BuildInfo, BuildResult};
use herald::render::{render_notification, BuildStatus};
use herald::tracker::{diff, TrackedJobs};

fn snapshot(names: &[&str]) -> TrackedJobs {
    names
        .iter()
        .map(|name| (name.to_string(), BuildInfo::default()))
        .collect()
}

// ---- Diff set algebra ----

#[test]
fn started_is_current_minus_previous() {
    let previous = snapshot(&["a", "b"]);
    let current = snapshot(&["b", "c", "d"]);

    let delta = diff(&previous, &current);
    assert_eq!(delta.started, vec!["c", "d"]);
    assert_eq!(delta.finished, vec!["a"]);
}

#[test]
fn diff_of_snapshot_with_itself_is_empty() {
    for names in [&[][..], &["one"][..], &["x", "y", "z"][..]] {
        let snap = snapshot(names);
        let delta = diff(&snap, &snap);
        assert!(delta.is_empty(), "diff(A, A) must be empty for {names:?}");
    }
}

#[test]
fn first_poll_reports_everything_as_started() {
    let delta = diff(&TrackedJobs::new(), &snapshot(&["build-A"]));
    assert_eq!(delta.started, vec!["build-A"]);
    assert!(delta.finished.is_empty());
}

#[test]
fn emptied_building_set_reports_everything_as_finished() {
    let delta = diff(&snapshot(&["build-A"]), &TrackedJobs::new());
    assert!(delta.started.is_empty());
    assert_eq!(delta.finished, vec!["build-A"]);
}

#[test]
fn job_that_restarts_within_one_cycle_is_silent() {
    // A job building in both polls is one continuous "in progress" as far
    // as the diff can tell, even if it actually finished and restarted.
    let previous = snapshot(&["nightly"]);
    let current = snapshot(&["nightly"]);
    assert!(diff(&previous, &current).is_empty());
}

// ---- Rendered output shape ----

#[test]
fn finished_failure_message_has_fixed_order_sections() {
    let info = BuildInfo {
        result: Some(BuildResult::Failure),
        duration_ms: Some(300_000),
        built_on: Some("node1".into()),
        started_at: None,
        user_id: Some("tnobrega".into()),
    };
    let errors = [
        BuildError {
            name: "test_login_timeout".into(),
            class_name: Some("tests.auth.LoginTest".into()),
        },
        BuildError {
            name: "test_checkout".into(),
            class_name: None,
        },
    ];

    let text = render_notification(BuildStatus::Finished, "build-A", &info, &errors);

    let header_at = text.find("**Finished**: build-A").unwrap();
    let result_at = text.find("* Result: **FAILURE**").unwrap();
    let duration_at = text.find("* Duration: **5m 0s**").unwrap();
    let built_at = text.find("* Built on: **node1**").unwrap();
    let errors_at = text.find("Errors: 2").unwrap();

    assert!(header_at < result_at);
    assert!(result_at < duration_at);
    assert!(duration_at < built_at);
    assert!(built_at < errors_at);

    // Exactly one name line per error, in order.
    assert!(text.find("test_login_timeout").unwrap() < text.find("test_checkout").unwrap());
    assert_eq!(text.matches("test_login_timeout").count(), 1);
    assert_eq!(text.matches("test_checkout").count(), 1);
    assert!(text.contains("    tests.auth.LoginTest"));
}

#[test]
fn started_message_has_no_error_section() {
    let info = BuildInfo {
        built_on: Some("node2".into()),
        user_id: Some("fabioz".into()),
        ..Default::default()
    };
    let text = render_notification(BuildStatus::Started, "deploy", &info, &[]);
    assert!(text.contains("**Started**: deploy"));
    assert!(text.contains("* Built on: **node2**"));
    assert!(!text.contains("Errors:"));
    assert!(!text.contains("Result"));
}

#[test]
fn sparse_build_renders_header_only() {
    let text = render_notification(BuildStatus::Started, "bare", &BuildInfo::default(), &[]);
    let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
    // Divider + header, nothing else.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "**Started**: bare");
}

// ---- Diff feeding render (one simulated cycle, pure parts only) ----

#[test]
fn full_cycle_produces_one_message_per_transition() {
    let previous = snapshot(&["finished-job", "still-running"]);
    let mut current = snapshot(&["still-running"]);
    current.insert(
        "fresh-job".into(),
        BuildInfo {
            user_id: Some("damiani".into()),
            ..Default::default()
        },
    );

    let delta = diff(&previous, &current);

    let mut messages = Vec::new();
    for job in &delta.started {
        messages.push(render_notification(
            BuildStatus::Started,
            job,
            &current[job],
            &[],
        ));
    }
    for job in &delta.finished {
        messages.push(render_notification(
            BuildStatus::Finished,
            job,
            &BuildInfo {
                result: Some(BuildResult::Success),
                ..Default::default()
            },
            &[],
        ));
    }

    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("**Started**: fresh-job"));
    assert!(messages[1].contains("**Finished**: finished-job"));
    assert!(messages[1].contains("* Result: **SUCCESS**"));
}
