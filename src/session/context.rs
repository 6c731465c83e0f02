//! Session context
//!
//! One `Session` exists per chat session. It is built once the user has
//! picked a nickname and is handed by `Arc` to the dispatcher, the poller
//! and the command sender.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::store::{MessageStore, UserStore};

/// Sequence watermark used as `since` for the next poll
#[derive(Debug, Default)]
pub struct SessionCursor(AtomicU64);

impl SessionCursor {
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    /// Current value
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Move the cursor to `sequence`, returning the previous value
    pub fn advance_to(&self, sequence: u64) -> u64 {
        self.0.swap(sequence, Ordering::AcqRel)
    }
}

/// Identity, cursor and stores of one chat session
#[derive(Debug)]
pub struct Session {
    nick_name: String,
    email: String,
    cursor: SessionCursor,
    messages: MessageStore,
    users: UserStore,
}

impl Session {
    /// Create a session with empty stores and the cursor at 0
    pub fn new(nick_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            nick_name: nick_name.into(),
            email: email.into(),
            cursor: SessionCursor::default(),
            messages: MessageStore::new(),
            users: UserStore::new(),
        }
    }

    pub fn nick_name(&self) -> &str {
        &self.nick_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    /// Shorthand for `cursor().get()`
    pub fn last_sequence(&self) -> u64 {
        self.cursor.get()
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new("alice", "a@x.com");
        assert_eq!(session.nick_name(), "alice");
        assert_eq!(session.email(), "a@x.com");
        assert_eq!(session.last_sequence(), 0);
        assert!(session.messages().is_empty());
        assert!(session.users().is_empty());
    }

    #[test]
    fn test_cursor_advance_returns_previous() {
        let cursor = SessionCursor::new(3);
        assert_eq!(cursor.advance_to(7), 3);
        assert_eq!(cursor.get(), 7);
    }
}
