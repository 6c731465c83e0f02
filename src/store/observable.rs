//! Observable store
//!
//! An ordered container with a subscriber list. Every mutation notifies all
//! subscribers synchronously, in subscription order, after the mutation has
//! been applied.
//!
//! Contents live behind an `Arc` that listeners borrow while they run. A
//! mutation only copies the contents if a listener call still holds the
//! previous version, so appending does not get slower as the store grows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{Message, User};

/// Identifier returned by [`ObservableStore::subscribe`]
pub type SubscriptionId = u64;

/// A mutation that was applied to a store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange<T> {
    /// `item` was appended at `index`
    Added { index: usize, item: T },
    /// `item` was removed from `index`
    Removed { index: usize, item: T },
}

impl<T> StoreChange<T> {
    /// The item that was added or removed
    pub fn item(&self) -> &T {
        match self {
            StoreChange::Added { item, .. } | StoreChange::Removed { item, .. } => item,
        }
    }
}

/// Subscriber callback: the change and the store contents after it
type Listener<T> = Arc<dyn Fn(&StoreChange<T>, &[T]) + Send + Sync>;

/// Ordered store with synchronous change notification
pub struct ObservableStore<T> {
    items: RwLock<Arc<Vec<T>>>,
    listeners: RwLock<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
}

/// Store of chat messages, append-only
pub type MessageStore = ObservableStore<Message>;

/// Store of online users
pub type UserStore = ObservableStore<User>;

impl<T: Clone> ObservableStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Arc::new(Vec::new())),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append an item and notify subscribers
    pub fn push(&self, item: T) {
        let (index, snapshot) = {
            let mut items = self.write_items();
            let contents = Arc::make_mut(&mut items);
            contents.push(item.clone());
            (contents.len() - 1, Arc::clone(&items))
        };

        self.notify(&StoreChange::Added { index, item }, &snapshot);
    }

    /// Remove the first item matching `predicate`
    ///
    /// Returns the removed item. When nothing matches the store is left
    /// untouched and no subscriber is called.
    pub fn remove_first<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let (index, item, snapshot) = {
            let mut items = self.write_items();
            let index = items.iter().position(|item| predicate(item))?;
            let item = Arc::make_mut(&mut items).remove(index);
            (index, item, Arc::clone(&items))
        };

        self.notify(
            &StoreChange::Removed {
                index,
                item: item.clone(),
            },
            &snapshot,
        );
        Some(item)
    }

    /// Find the first item matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read_items().iter().find(|item| predicate(item)).cloned()
    }

    /// Copy of the current contents, in insertion order
    pub fn snapshot(&self) -> Vec<T> {
        self.read_items().as_ref().clone()
    }

    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    /// Register a change listener
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreChange<T>, &[T]) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, change: &StoreChange<T>, snapshot: &[T]) {
        // Copy the list out so listeners may (un)subscribe while being called
        let listeners: Vec<Listener<T>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(change, snapshot);
        }
    }

    fn read_items(&self) -> RwLockReadGuard<'_, Arc<Vec<T>>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_items(&self) -> RwLockWriteGuard<'_, Arc<Vec<T>>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for ObservableStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for ObservableStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableStore")
            .field("items", self.read_items().as_ref())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
