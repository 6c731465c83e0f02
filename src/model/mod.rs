//! Chat data model
//!
//! - **types**: wire `Event` plus the `Message` and `User` store entries
//! - **timestamp**: parser for the server's UTC timestamp profile

pub mod timestamp;
pub mod types;

pub use timestamp::{parse_timestamp, TimestampError};
pub use types::{Event, EventKind, Message, User};
