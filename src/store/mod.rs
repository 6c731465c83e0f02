//! Observable stores backing the message list and the user list
//!
//! Presentation code subscribes to a store and re-renders from the snapshot
//! it is handed; the connection core only ever appends and removes.

mod observable;

pub use observable::{MessageStore, ObservableStore, StoreChange, SubscriptionId, UserStore};
