//! Tracked building jobs and the start/finish delta between two polls.
//!
//! The poller holds one [`TrackedJobs`] snapshot and replaces it wholesale
//! each cycle after diffing — no partial mutation, so a failed cycle leaves
//! the previous snapshot fully intact.

use std::collections::BTreeMap;

use crate::build::BuildInfo;

/// Jobs currently known to be building, keyed by job name.
///
/// A `BTreeMap` keeps iteration (and therefore notification order within a
/// cycle) stable by job name across runs.
pub type TrackedJobs = BTreeMap<String, BuildInfo>;

/// Jobs that appeared or disappeared between two building-set snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDelta {
    pub started: Vec<String>,
    pub finished: Vec<String>,
}

impl JobDelta {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.finished.is_empty()
    }
}

/// Compare two building-job snapshots.
///
/// A job is started if it is in `current` but not `previous`, finished if it
/// is in `previous` but not `current`. Jobs present in both are still
/// running and emit nothing. Pure — the caller owns state replacement.
///
/// A job that starts and finishes between two polls never appears in
/// `started`; it is only ever seen leaving the building set.
pub fn diff(previous: &TrackedJobs, current: &TrackedJobs) -> JobDelta {
    let started = current
        .keys()
        .filter(|name| !previous.contains_key(*name))
        .cloned()
        .collect();
    let finished = previous
        .keys()
        .filter(|name| !current.contains_key(*name))
        .cloned()
        .collect();
    JobDelta { started, finished }
}
