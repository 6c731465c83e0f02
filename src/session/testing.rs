//! Scripted in-memory transport for poll loop tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

use crate::client::{ChatTransport, TransportError, TransportResult};
use crate::model::Event;

/// A request the transport received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Join { nick_name: String, email: String },
    Poll { since: u64 },
    Message { text: String },
}

/// Answers polls from a queue; once the queue is empty a poll hangs forever,
/// like a long poll the server never answers.
pub struct ScriptedTransport {
    join_ok: bool,
    polls: Mutex<VecDeque<TransportResult<Vec<Event>>>>,
    calls: Mutex<Vec<Call>>,
    pub exhausted: Notify,
}

impl ScriptedTransport {
    pub fn new(polls: Vec<TransportResult<Vec<Event>>>) -> Self {
        Self {
            join_ok: true,
            polls: Mutex::new(polls.into()),
            calls: Mutex::new(Vec::new()),
            exhausted: Notify::new(),
        }
    }

    pub fn failing_join() -> Self {
        Self {
            join_ok: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn poll_sinces(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Poll { since } => Some(since),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn join(&self, nick_name: &str, email: &str) -> TransportResult<()> {
        self.calls.lock().unwrap().push(Call::Join {
            nick_name: nick_name.to_string(),
            email: email.to_string(),
        });
        if self.join_ok {
            Ok(())
        } else {
            Err(TransportError::Unavailable)
        }
    }

    async fn poll(&self, since: u64, _nick_name: &str, _email: &str) -> TransportResult<Vec<Event>> {
        self.calls.lock().unwrap().push(Call::Poll { since });
        let next = self.polls.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.exhausted.notify_one();
                std::future::pending().await
            }
        }
    }

    async fn send_message(&self, _nick_name: &str, _email: &str, message: &str) -> TransportResult<()> {
        self.calls.lock().unwrap().push(Call::Message {
            text: message.to_string(),
        });
        Ok(())
    }
}
