//! Notification dispatch — picks the recipient chat for a build and fires
//! the send without blocking the poll loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::build::{BuildError, BuildInfo};
use crate::channel::ChatChannel;
use crate::directory::ConversationDirectory;
use crate::render::{render_notification, BuildStatus};

pub struct Dispatcher {
    channel: Arc<dyn ChatChannel>,
    directory: ConversationDirectory,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn ChatChannel>, directory: ConversationDirectory) -> Self {
        Self { channel, directory }
    }

    /// Send a build notification to the chat of the build's owning user.
    ///
    /// A build with no owning user, or one whose user is not in the
    /// directory, is skipped without error — builds from unmapped users are
    /// simply not relayed. The send itself runs in a detached task: a
    /// delivery failure is logged and never reaches the poll loop. The
    /// handle is returned so callers that care (tests, `run --once`) can
    /// await completion.
    pub fn dispatch(
        &self,
        status: BuildStatus,
        job_name: &str,
        info: &BuildInfo,
        errors: &[BuildError],
    ) -> Option<JoinHandle<()>> {
        let user_id = info.user_id.as_deref()?;
        let chat_id = self.directory.chat_for(user_id)?;

        let text = render_notification(status, job_name, info, errors);
        let channel = Arc::clone(&self.channel);
        let job_name = job_name.to_owned();

        Some(tokio::spawn(async move {
            if let Err(e) = channel.send_message(chat_id, &text).await {
                eprintln!(
                    "[dispatch] {} send failed for {job_name}: {e}",
                    channel.name()
                );
            }
        }))
    }
}
