//! Event Poller
//!
//! Long-poll loop: ask the server for events after the cursor, dispatch
//! whatever comes back, then poll again. Only one poll is ever in flight.

use std::sync::Arc;

use super::context::Session;
use super::dispatcher::{DispatchSummary, EventDispatcher};
use super::reconnect::ReconnectPolicy;
use crate::client::{ChatTransport, TransportResult};

/// Drives the poll / dispatch / reconnect cycle for one session
pub struct EventPoller {
    transport: Arc<dyn ChatTransport>,
    session: Arc<Session>,
    dispatcher: EventDispatcher,
    policy: ReconnectPolicy,
    /// Failed polls since the last successful one, owned by `listen`
    consecutive_failures: u32,
}

impl EventPoller {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        session: Arc<Session>,
        policy: ReconnectPolicy,
    ) -> Self {
        let dispatcher = EventDispatcher::new(Arc::clone(&session));
        Self {
            transport,
            session,
            dispatcher,
            policy,
            consecutive_failures: 0,
        }
    }

    /// Issue one poll from the current cursor and dispatch the result
    ///
    /// Dispatch completes before this returns, so the next poll always
    /// starts from the cursor the batch left behind.
    pub async fn poll_once(&self) -> TransportResult<DispatchSummary> {
        let since = self.session.last_sequence();
        let events = self
            .transport
            .poll(since, self.session.nick_name(), self.session.email())
            .await?;

        tracing::trace!(since, count = events.len(), "Poll returned");
        Ok(self.dispatcher.dispatch(&events))
    }

    /// Poll forever
    ///
    /// Every completion, success or failure, schedules the next poll; the
    /// policy only decides how long to wait first. The loop ends when the
    /// task running it is aborted.
    pub async fn listen(mut self) {
        tracing::info!(
            nick = %self.session.nick_name(),
            policy = ?self.policy,
            "Listening for events"
        );

        loop {
            match self.poll_once().await {
                Ok(summary) => {
                    self.consecutive_failures = 0;
                    if summary.total() > 0 {
                        tracing::debug!(
                            events = summary.total(),
                            cursor = self.session.last_sequence(),
                            "Dispatched events"
                        );
                    }
                }
                Err(e) => {
                    self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                    tracing::warn!(
                        error = %e,
                        failures = self.consecutive_failures,
                        "Event poll failed, reconnecting"
                    );
                }
            }

            let delay = self.policy.delay(self.consecutive_failures);
            if delay.is_zero() {
                // A dead server makes this loop spin; give other tasks a turn
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
