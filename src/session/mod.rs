//! Chat session core
//!
//! ## Components
//!
//! - **Session**: nickname, email, sequence cursor, message and user stores
//! - **CommandSender**: `join` and `message` requests
//! - **EventPoller**: the long-poll loop and its reconnect policy
//! - **EventDispatcher**: applies polled events to the session
//! - **Connection**: join-then-listen orchestration
//!
//! ## Data Flow
//!
//! ```text
//! CommandSender → server
//! server → EventPoller → EventDispatcher → stores → subscribers
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatpoll::client::{HttpTransport, TransportConfig};
//! use chatpoll::session::{Connection, ReconnectPolicy, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(HttpTransport::new(TransportConfig::default())?);
//!     let session = Arc::new(Session::new("alice", "alice@example.com"));
//!
//!     session.messages().subscribe(|change, _| {
//!         println!("{}: {}", change.item().nick_name, change.item().message);
//!     });
//!
//!     let connection = Connection::open(session, transport, ReconnectPolicy::Immediate).await?;
//!     connection.send_message("hello").await?;
//!     Ok(())
//! }
//! ```

mod commands;
mod connection;
mod context;
mod dispatcher;
mod poller;
mod reconnect;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::CommandSender;
pub use connection::Connection;
pub use context::{Session, SessionCursor};
pub use dispatcher::{DispatchSummary, EventDispatcher};
pub use poller::EventPoller;
pub use reconnect::{ReconnectPolicy, ReconnectStrategy};
