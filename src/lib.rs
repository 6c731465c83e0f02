//! # Chatpoll
//!
//! Long-polling chat client. Joins a chat server, keeps a long poll open for
//! message and presence events, and applies them to observable stores that a
//! presentation layer subscribes to.
//!
//! ## Modules
//!
//! - [`model`]: wire events, messages, users, timestamp parsing
//! - [`store`]: observable stores with synchronous change notification
//! - [`client`]: the `ChatTransport` seam and its HTTP implementation
//! - [`session`]: session context, poll loop, dispatcher, commands
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatpoll::{Config, Connection, HttpTransport, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let transport = Arc::new(HttpTransport::new(config.transport())?);
//!
//!     let session = Arc::new(Session::new("alice", "alice@example.com"));
//!     session.users().subscribe(|_, users| {
//!         println!("{} users online", users.len());
//!     });
//!
//!     // Joins, then polls in the background until dropped
//!     let connection = Connection::open(session, transport, config.reconnect.policy()).await?;
//!     connection.send_message("hello everyone").await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     connection.shutdown();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod model;
pub mod session;
pub mod store;

// Re-export top-level types for convenience
pub use client::{ChatTransport, HttpTransport, TransportConfig, TransportError, TransportResult};

pub use config::{Config, ConfigError, HttpConfig, LoggingConfig, ReconnectConfig, ServerConfig};

pub use model::{parse_timestamp, Event, EventKind, Message, TimestampError, User};

pub use session::{
    CommandSender, Connection, DispatchSummary, EventDispatcher, EventPoller, ReconnectPolicy,
    ReconnectStrategy, Session, SessionCursor,
};

pub use store::{MessageStore, ObservableStore, StoreChange, SubscriptionId, UserStore};
