//! Event Dispatcher
//!
//! Applies a poll response to the session: every event moves the cursor,
//! known event types update the message or user store.

use std::sync::Arc;

use super::context::Session;
use crate::model::{Event, EventKind, Message, User};

/// Counts of what one `dispatch` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub messages: usize,
    pub joins: usize,
    /// `part` events that removed a user
    pub parts: usize,
    /// `part` events for a nickname that was not in the user store
    pub missed_parts: usize,
    pub unknown: usize,
    /// Cursor after the last event, `None` for an empty batch
    pub last_sequence: Option<u64>,
}

impl DispatchSummary {
    /// Total events processed
    pub fn total(&self) -> usize {
        self.messages + self.joins + self.parts + self.missed_parts + self.unknown
    }
}

/// Routes events into the session stores
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    session: Arc<Session>,
}

impl EventDispatcher {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Process `events` strictly in the order given
    ///
    /// The cursor is set to each event's sequence before the event is
    /// handled, whatever its type. Array order is trusted as sequence order.
    pub fn dispatch(&self, events: &[Event]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for event in events {
            let previous = self.session.cursor().advance_to(event.sequence);
            if event.sequence < previous {
                tracing::warn!(
                    previous,
                    sequence = event.sequence,
                    "Event sequence went backwards"
                );
            }
            summary.last_sequence = Some(event.sequence);

            match event.event_kind() {
                EventKind::Message => {
                    tracing::debug!(nick = %event.nick_name, sequence = event.sequence, "MESSAGE");
                    self.session.messages().push(Message::from_event(event));
                    summary.messages += 1;
                }
                EventKind::Join => {
                    tracing::info!(nick = %event.nick_name, sequence = event.sequence, "JOIN");
                    self.session.users().push(User::from_event(event));
                    summary.joins += 1;
                }
                EventKind::Part => {
                    tracing::info!(nick = %event.nick_name, sequence = event.sequence, "PART");
                    let removed = self
                        .session
                        .users()
                        .remove_first(|user| user.nick_name == event.nick_name);
                    if removed.is_some() {
                        summary.parts += 1;
                    } else {
                        summary.missed_parts += 1;
                    }
                }
                EventKind::Unknown => {
                    tracing::warn!(kind = %event.kind, sequence = event.sequence, "Unknown event");
                    summary.unknown += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreChange;
    use std::sync::Mutex;

    fn setup() -> (Arc<Session>, EventDispatcher) {
        let session = Arc::new(Session::new("alice", "a@x.com"));
        let dispatcher = EventDispatcher::new(Arc::clone(&session));
        (session, dispatcher)
    }

    fn join(seq: u64, nick: &str, gravatar: &str) -> Event {
        Event::new(seq, "join", nick).gravatar(gravatar)
    }

    #[test]
    fn test_cursor_follows_last_event_of_any_type() {
        let (session, dispatcher) = setup();

        let summary = dispatcher.dispatch(&[
            join(1, "alice", "g1"),
            Event::new(2, "message", "alice").message("hi"),
            Event::new(3, "typing", "alice"),
        ]);

        assert_eq!(session.last_sequence(), 3);
        assert_eq!(summary.last_sequence, Some(3));
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_event_without_type_counts_as_unknown() {
        let (session, dispatcher) = setup();
        let events: Vec<Event> = serde_json::from_str(
            r#"[{"sequence":1,"type":"join","nickName":"alice"},{"sequence":2,"nickName":"bob"}]"#,
        )
        .unwrap();

        let summary = dispatcher.dispatch(&events);

        assert_eq!(summary.joins, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(session.users().len(), 1);
        assert_eq!(session.last_sequence(), 2);
    }

    #[test]
    fn test_cursor_is_set_not_maxed() {
        let (session, dispatcher) = setup();
        dispatcher.dispatch(&[Event::new(9, "join", "a"), Event::new(4, "join", "b")]);
        assert_eq!(session.last_sequence(), 4);
    }

    #[test]
    fn test_empty_batch_leaves_cursor() {
        let (session, dispatcher) = setup();
        session.cursor().advance_to(12);

        let summary = dispatcher.dispatch(&[]);
        assert_eq!(session.last_sequence(), 12);
        assert_eq!(summary, DispatchSummary::default());
    }

    #[test]
    fn test_join_then_part_removes_user() {
        let (session, dispatcher) = setup();

        dispatcher.dispatch(&[join(1, "bob", "g2")]);
        assert_eq!(session.users().len(), 1);

        let summary = dispatcher.dispatch(&[Event::new(2, "part", "bob")]);
        assert_eq!(summary.parts, 1);
        assert!(session.users().find(|u| u.nick_name == "bob").is_none());
    }

    #[test]
    fn test_part_for_unknown_nick_is_noop() {
        let (session, dispatcher) = setup();
        dispatcher.dispatch(&[join(1, "alice", "g1")]);

        let changes = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&changes);
        session.users().subscribe(move |_, _| *sink.lock().unwrap() += 1);

        let summary = dispatcher.dispatch(&[Event::new(2, "part", "mallory")]);

        assert_eq!(summary.missed_parts, 1);
        assert_eq!(session.users().snapshot(), vec![User::new("alice", "g1")]);
        assert_eq!(*changes.lock().unwrap(), 0);
        assert_eq!(session.last_sequence(), 2);
    }

    #[test]
    fn test_duplicate_join_is_not_deduplicated() {
        let (session, dispatcher) = setup();
        let event = join(1, "alice", "g1");

        dispatcher.dispatch(&[event.clone()]);
        dispatcher.dispatch(&[event]);

        assert_eq!(session.users().len(), 2);
    }

    #[test]
    fn test_part_removes_only_first_duplicate() {
        let (session, dispatcher) = setup();
        dispatcher.dispatch(&[
            join(1, "alice", "first"),
            join(2, "alice", "second"),
            Event::new(3, "part", "alice"),
        ]);

        assert_eq!(session.users().snapshot(), vec![User::new("alice", "second")]);
    }

    #[test]
    fn test_message_event_appends_message() {
        let (session, dispatcher) = setup();

        dispatcher.dispatch(&[Event::new(5, "message", "bob")
            .message("hi")
            .date_time("2013-01-01T00:00:00Z")
            .gravatar("g2")]);

        let messages = session.messages().snapshot();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "hi");
        assert_eq!(messages[0].nick_name, "bob");
        assert_eq!(messages[0].gravatar, "g2");
        assert!(messages[0].date_time.is_some());
        assert_eq!(session.last_sequence(), 5);
    }

    #[test]
    fn test_store_notifications_fire_per_event() {
        let (session, dispatcher) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.users().subscribe(move |change, users| {
            let tag = match change {
                StoreChange::Added { .. } => "added",
                StoreChange::Removed { .. } => "removed",
            };
            sink.lock().unwrap().push((tag, users.len()));
        });

        dispatcher.dispatch(&[join(1, "a", "g"), join(2, "b", "g"), Event::new(3, "part", "a")]);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("added", 1), ("added", 2), ("removed", 1)]
        );
    }
}
