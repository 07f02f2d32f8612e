//! The poll loop — fetch building jobs, diff against the tracked set,
//! notify starts and finishes, replace the tracked set, sleep, repeat.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::build::{BuildError, BuildInfo};
use crate::dispatch::Dispatcher;
use crate::jenkins::CiClient;
use crate::render::BuildStatus;
use crate::tracker::{self, TrackedJobs};

pub struct Poller {
    ci: Arc<dyn CiClient>,
    dispatcher: Dispatcher,
    /// Jobs observed building in the most recent successful poll.
    /// Owned by this task alone; replaced wholesale after each diff.
    tracked: TrackedJobs,
}

impl Poller {
    pub fn new(ci: Arc<dyn CiClient>, dispatcher: Dispatcher) -> Self {
        Self {
            ci,
            dispatcher,
            tracked: TrackedJobs::new(),
        }
    }

    /// Run one poll cycle, returning the handles of any in-flight sends.
    ///
    /// A failed building-jobs fetch skips the whole cycle and leaves the
    /// tracked set untouched, so no start or finish is invented or lost —
    /// the next successful poll picks the diff back up.
    pub async fn cycle(&mut self) -> Vec<JoinHandle<()>> {
        let current = match self.ci.building_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => {
                eprintln!("[poller] building-jobs fetch failed, skipping cycle: {e}");
                return Vec::new();
            }
        };

        let delta = tracker::diff(&self.tracked, &current);
        let mut sends = Vec::new();

        for job_name in &delta.started {
            if let Some(info) = current.get(job_name) {
                eprintln!("[poller] started: {job_name}");
                sends.extend(self.dispatcher.dispatch(BuildStatus::Started, job_name, info, &[]));
            }
        }

        for job_name in &delta.finished {
            // The tracked snapshot is stale once the build ends; fetch the
            // final metadata and error list before notifying.
            match self.final_build(job_name).await {
                Ok((info, errors)) => {
                    eprintln!("[poller] finished: {job_name}");
                    sends.extend(self.dispatcher.dispatch(
                        BuildStatus::Finished,
                        job_name,
                        &info,
                        &errors,
                    ));
                }
                Err(e) => {
                    // Transient detail failure: drop this job's notification
                    // but stop tracking it — the build is over either way.
                    eprintln!("[poller] final build fetch failed for {job_name}: {e}");
                }
            }
        }

        self.tracked = current;
        sends
    }

    async fn final_build(&self, job_name: &str) -> color_eyre::Result<(BuildInfo, Vec<BuildError>)> {
        let info = self.ci.last_build(job_name).await?;
        let errors = self.ci.last_build_errors(job_name).await?;
        Ok((info, errors))
    }

    /// Poll until cancelled. Cycle N+1 never begins before cycle N's sleep
    /// completes; all tracked state lives on this one task, so no locking.
    pub async fn run(&mut self, interval: Duration, cancel: CancellationToken) {
        loop {
            // Sends are detached here — failures are logged by the send task.
            drop(self.cycle().await);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        eprintln!("[poller] stopped");
    }

    #[cfg(test)]
    fn tracked(&self) -> &TrackedJobs {
        &self.tracked
    }
}
