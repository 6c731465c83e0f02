//! Core data types for the chat client
//!
//! - `Event`: one entry of an `eventpoll` response, exactly as it arrives
//! - `EventKind`: the classified `type` field
//! - `Message` and `User`: the store entries built from events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp::parse_timestamp;

/// A server-pushed event as delivered by the long-poll endpoint
///
/// Optional fields are left absent when the server omits them. Nothing is
/// validated here; malformed events are handed on at face value. A missing
/// or null `type` reads as `""` (an unknown event), a missing or null
/// `nickName` as the empty nickname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Server-assigned position in the event stream
    pub sequence: u64,
    /// Event type: "message", "join", "part" or anything else
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// Nickname of the user the event is about
    #[serde(default, deserialize_with = "null_as_default")]
    pub nick_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Message body (`message` events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server timestamp, restricted ISO 8601 profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravatar: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Create an event of the given type with only the required fields set
    pub fn new(sequence: u64, kind: impl Into<String>, nick_name: impl Into<String>) -> Self {
        Self {
            sequence,
            kind: kind.into(),
            nick_name: nick_name.into(),
            email: None,
            message: None,
            date_time: None,
            gravatar: None,
        }
    }

    /// Builder method: set the message body
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Builder method: set the server timestamp text
    pub fn date_time(mut self, date_time: impl Into<String>) -> Self {
        self.date_time = Some(date_time.into());
        self
    }

    /// Builder method: set the avatar URL
    pub fn gravatar(mut self, gravatar: impl Into<String>) -> Self {
        self.gravatar = Some(gravatar.into());
        self
    }

    /// Classify the `type` field
    pub fn event_kind(&self) -> EventKind {
        EventKind::from(self.kind.as_str())
    }
}

/// Event types the client reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    Join,
    Part,
    /// Any type the client has no handling for
    Unknown,
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "message" => EventKind::Message,
            "join" => EventKind::Join,
            "part" => EventKind::Part,
            _ => EventKind::Unknown,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::Message => "message",
            EventKind::Join => "join",
            EventKind::Part => "part",
            EventKind::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A chat message in the message store
///
/// Immutable once created; the store only ever appends them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub nick_name: String,
    pub gravatar: String,
    pub message: String,
    /// `None` when the server sent no timestamp or one outside the profile
    pub date_time: Option<DateTime<Utc>>,
}

impl Message {
    /// Build a message entry from a `message` event
    pub fn from_event(event: &Event) -> Self {
        let date_time = match event.date_time.as_deref() {
            Some(raw) => match parse_timestamp(raw) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::warn!(
                        sequence = event.sequence,
                        error = %e,
                        "Message timestamp not understood"
                    );
                    None
                }
            },
            None => None,
        };

        Self {
            nick_name: event.nick_name.clone(),
            gravatar: event.gravatar.clone().unwrap_or_default(),
            message: event.message.clone().unwrap_or_default(),
            date_time,
        }
    }
}

/// An online user in the user store, keyed by nickname
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub nick_name: String,
    pub gravatar: String,
}

impl User {
    pub fn new(nick_name: impl Into<String>, gravatar: impl Into<String>) -> Self {
        Self {
            nick_name: nick_name.into(),
            gravatar: gravatar.into(),
        }
    }

    /// Build a user entry from a `join` event
    pub fn from_event(event: &Event) -> Self {
        Self::new(
            event.nick_name.clone(),
            event.gravatar.clone().unwrap_or_default(),
        )
    }
}
