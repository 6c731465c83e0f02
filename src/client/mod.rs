//! Chat server transport
//!
//! The rest of the crate talks to the server only through [`ChatTransport`],
//! so the poll loop can be driven by a scripted transport in tests.
//!
//! ## Endpoints
//!
//! - `GET {base}join?nickName=&email=` - register the user, body ignored
//! - `GET {base}eventpoll?since=&nickName=&email=` - long poll, JSON event array
//! - `GET {base}message?nickName=&email=&message=` - post a chat message

mod error;
mod http;

pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, TransportConfig};

use async_trait::async_trait;

use crate::model::Event;

/// The three calls the chat server understands
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Register `nick_name` with the server
    async fn join(&self, nick_name: &str, email: &str) -> TransportResult<()>;

    /// Block until the server has events after `since` (or gives up) and return them
    async fn poll(&self, since: u64, nick_name: &str, email: &str) -> TransportResult<Vec<Event>>;

    /// Post a chat message to the room
    async fn send_message(&self, nick_name: &str, email: &str, message: &str) -> TransportResult<()>;
}
