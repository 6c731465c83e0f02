//! Connection
//!
//! Ties a session to a transport: join first, then start the long-poll
//! task. Dropping the connection stops the poll task.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::commands::CommandSender;
use super::context::Session;
use super::poller::EventPoller;
use super::reconnect::ReconnectPolicy;
use crate::client::{ChatTransport, TransportResult};

/// A joined chat session with its background poll task
pub struct Connection {
    session: Arc<Session>,
    commands: CommandSender,
    poll_task: JoinHandle<()>,
}

impl Connection {
    /// Join the chat and start listening for events
    ///
    /// The poll loop is only started after the join succeeded. When the
    /// join fails the error is returned and nothing is left running.
    pub async fn open(
        session: Arc<Session>,
        transport: Arc<dyn ChatTransport>,
        policy: ReconnectPolicy,
    ) -> TransportResult<Self> {
        let commands = CommandSender::new(Arc::clone(&transport), Arc::clone(&session));

        if let Err(e) = commands.join().await {
            tracing::error!(
                nick = %session.nick_name(),
                error = %e,
                "Join failed, not listening for events"
            );
            return Err(e);
        }

        let poller = EventPoller::new(transport, Arc::clone(&session), policy);
        let poll_task = tokio::spawn(poller.listen());

        Ok(Self {
            session,
            commands,
            poll_task,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send a chat message and wait for the server to accept it
    pub async fn send_message(&self, text: &str) -> TransportResult<()> {
        self.commands.send_message(text).await
    }

    /// Send a chat message without waiting; failures are only logged
    pub fn post_message(&self, text: impl Into<String>) -> JoinHandle<()> {
        self.commands.post_message(text)
    }

    /// Whether the poll task is still running
    pub fn is_listening(&self) -> bool {
        !self.poll_task.is_finished()
    }

    /// Stop polling. There is no leave request; the server notices on its own.
    pub fn shutdown(self) {
        tracing::info!(nick = %self.session.nick_name(), "Closing connection");
        // Drop aborts the poll task
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}
