//! Command Sender
//!
//! Outbound requests on behalf of the session user: joining the room and
//! posting messages. Neither call is retried.

use std::sync::Arc;

use super::context::Session;
use crate::client::{ChatTransport, TransportResult};

#[derive(Clone)]
pub struct CommandSender {
    transport: Arc<dyn ChatTransport>,
    session: Arc<Session>,
}

impl CommandSender {
    pub fn new(transport: Arc<dyn ChatTransport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    /// Register the session user with the server
    ///
    /// Resolves once the server has acknowledged the join with a success
    /// status. The event poller must not start before this returns `Ok`.
    pub async fn join(&self) -> TransportResult<()> {
        self.transport
            .join(self.session.nick_name(), self.session.email())
            .await?;
        tracing::info!(nick = %self.session.nick_name(), "Joined chat");
        Ok(())
    }

    /// Post `text` to the room; the server broadcasts it back as a `message` event
    pub async fn send_message(&self, text: &str) -> TransportResult<()> {
        self.transport
            .send_message(self.session.nick_name(), self.session.email(), text)
            .await
    }

    /// Fire-and-forget variant of [`send_message`](Self::send_message)
    ///
    /// Failures are logged and otherwise dropped.
    pub fn post_message(&self, text: impl Into<String>) -> tokio::task::JoinHandle<()> {
        let sender = self.clone();
        let text = text.into();
        tokio::spawn(async move {
            if let Err(e) = sender.send_message(&text).await {
                tracing::warn!(error = %e, "Failed to send message");
            }
        })
    }
}
