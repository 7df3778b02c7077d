use serde::{Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// An immutable, ordered snapshot of an event history.
///
/// `History` is what [`EventStore::get`](crate::EventStore::get) hands out.
/// Cloning is cheap (the events are shared), and a snapshot never changes
/// once created: the store copies on write when it appends to a history that
/// is still shared with readers.
///
/// A `History` dereferences to `[E]`, so it can be passed anywhere a slice
/// of events is expected, including projections and decision functions.
///
/// # Examples
///
/// ```
/// use foldstore::History;
///
/// let history = History::from(vec!["opened", "closed"]);
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.last(), Some(&"closed"));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct History<E> {
    events: Arc<Vec<E>>,
}

impl<E> History<E> {
    /// Create an empty history.
    pub fn new() -> Self {
        History {
            events: Arc::new(Vec::new()),
        }
    }

    /// Borrow the events as a slice, oldest first.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Consume the snapshot and return its events.
    ///
    /// Clones the events only if the snapshot is still shared.
    pub fn into_vec(self) -> Vec<E>
    where
        E: Clone,
    {
        Arc::try_unwrap(self.events).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Append events at the tail, preserving their order.
    ///
    /// Only the store's worker extends a history; snapshots already handed
    /// out keep their contents.
    pub(crate) fn extend<I>(&mut self, events: I) -> usize
    where
        E: Clone,
        I: IntoIterator<Item = E>,
    {
        let events_vec = Arc::make_mut(&mut self.events);
        let before = events_vec.len();
        events_vec.extend(events);
        events_vec.len() - before
    }
}

impl<E> Clone for History<E> {
    fn clone(&self) -> Self {
        History {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for History<E> {
    fn default() -> Self {
        History::new()
    }
}

impl<E> Deref for History<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.events
    }
}

impl<E> AsRef<[E]> for History<E> {
    fn as_ref(&self) -> &[E] {
        &self.events
    }
}

impl<E> From<Vec<E>> for History<E> {
    fn from(events: Vec<E>) -> Self {
        History {
            events: Arc::new(events),
        }
    }
}

impl<E> FromIterator<E> for History<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        History::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, E> IntoIterator for &'a History<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl<E: Serialize> Serialize for History<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.events.iter())
    }
}
