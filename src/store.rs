//! The serialized event store.
//!
//! An [`EventStore`] is a cheap, cloneable handle to a single worker thread
//! that exclusively owns the canonical history. Every operation is a message
//! on one ordered inbox, so mutations never interleave and every read sees
//! exactly the operations enqueued before it.

use crate::error::{panic_message, StoreError};
use crate::history::History;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;

type Producer<E> = Box<dyn FnOnce(&[E]) -> Vec<E> + Send>;

enum Command<E> {
    Get(Sender<History<E>>),
    Append(Vec<E>),
    Evolve {
        producer: Producer<E>,
        reply: Option<Sender<Result<Vec<E>, String>>>,
    },
    Shutdown(Sender<()>),
}

/// What a bounded store does when its inbox is full.
///
/// Only applies to [`append`](EventStore::append) and
/// [`evolve`](EventStore::evolve). Request/response calls always wait for a
/// free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Block the caller until the worker frees a slot.
    #[default]
    Block,
    /// Fail immediately with [`StoreError::AppendRejected`].
    Reject,
}

enum Inbox<E> {
    Unbounded(Sender<Command<E>>),
    Bounded {
        tx: SyncSender<Command<E>>,
        capacity: usize,
        overflow: OverflowPolicy,
    },
}

impl<E> Clone for Inbox<E> {
    fn clone(&self) -> Self {
        match self {
            Inbox::Unbounded(tx) => Inbox::Unbounded(tx.clone()),
            Inbox::Bounded {
                tx,
                capacity,
                overflow,
            } => Inbox::Bounded {
                tx: tx.clone(),
                capacity: *capacity,
                overflow: *overflow,
            },
        }
    }
}

impl<E> Inbox<E> {
    /// Enqueue, waiting for a slot if the inbox is bounded and full.
    fn send(&self, command: Command<E>) -> Result<(), StoreError> {
        let sent = match self {
            Inbox::Unbounded(tx) => tx.send(command).is_ok(),
            Inbox::Bounded { tx, .. } => tx.send(command).is_ok(),
        };
        if sent { Ok(()) } else { Err(StoreError::Unavailable) }
    }

    /// Enqueue a fire-and-forget mutation, honouring the overflow policy.
    fn submit(&self, command: Command<E>) -> Result<(), StoreError> {
        match self {
            Inbox::Bounded {
                tx,
                capacity,
                overflow: OverflowPolicy::Reject,
            } => match tx.try_send(command) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(StoreError::AppendRejected {
                    capacity: *capacity,
                }),
                Err(TrySendError::Disconnected(_)) => Err(StoreError::Unavailable),
            },
            _ => self.send(command),
        }
    }

    fn capacity(&self) -> Option<usize> {
        match self {
            Inbox::Unbounded(_) => None,
            Inbox::Bounded { capacity, .. } => Some(*capacity),
        }
    }

    fn overflow(&self) -> OverflowPolicy {
        match self {
            Inbox::Unbounded(_) => OverflowPolicy::Block,
            Inbox::Bounded { overflow, .. } => *overflow,
        }
    }
}

struct Shared {
    name: String,
    closed: AtomicBool,
}

/// Builder for configuring an [`EventStore`].
///
/// # Examples
///
/// ```
/// use foldstore::{EventStore, OverflowPolicy};
///
/// let store: EventStore<String> = EventStore::builder()
///     .name("orders")
///     .capacity(128)
///     .overflow(OverflowPolicy::Reject)
///     .open()
///     .unwrap();
///
/// assert_eq!(store.name(), "orders");
/// assert_eq!(store.capacity(), Some(128));
/// ```
#[derive(Debug)]
pub struct EventStoreBuilder<E> {
    name: String,
    capacity: Option<usize>,
    overflow: OverflowPolicy,
    _events: PhantomData<fn() -> E>,
}

impl<E> Default for EventStoreBuilder<E> {
    fn default() -> Self {
        EventStoreBuilder {
            name: "default".to_string(),
            capacity: None,
            overflow: OverflowPolicy::default(),
            _events: PhantomData,
        }
    }
}

impl<E> EventStoreBuilder<E> {
    /// Name the store. Used for the worker thread name and in log records.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bound the inbox to `capacity` pending operations.
    ///
    /// A capacity of zero is treated as one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    /// Remove any inbox bound (the default).
    pub fn unbounded(mut self) -> Self {
        self.capacity = None;
        self
    }

    /// Set what happens when a bounded inbox is full. Ignored when unbounded.
    pub fn overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

impl<E> EventStoreBuilder<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Spawn the worker and return a handle to the new, empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Spawn`] if the worker thread cannot be started.
    pub fn open(self) -> Result<EventStore<E>, StoreError> {
        let (inbox, rx) = match self.capacity {
            None => {
                let (tx, rx) = mpsc::channel();
                (Inbox::Unbounded(tx), rx)
            }
            Some(capacity) => {
                let (tx, rx) = mpsc::sync_channel(capacity);
                let inbox = Inbox::Bounded {
                    tx,
                    capacity,
                    overflow: self.overflow,
                };
                (inbox, rx)
            }
        };

        let name = self.name;
        let worker_name = name.clone();
        thread::Builder::new()
            .name(format!("foldstore-{name}"))
            .spawn(move || run_worker(&worker_name, rx))?;

        Ok(EventStore {
            inbox,
            shared: Arc::new(Shared {
                name,
                closed: AtomicBool::new(false),
            }),
        })
    }
}

/// An append-only, in-memory event store with a single serialized writer.
///
/// Handles are cheap to clone and can be shared freely across threads; all
/// clones talk to the same worker. Operations are served strictly in the
/// order they were enqueued:
///
/// - [`get`](EventStore::get) returns a snapshot of the history produced by
///   every earlier operation, and none of the later ones.
/// - [`append`](EventStore::append) adds events at the tail, in order.
/// - [`evolve`](EventStore::evolve) runs a decision function against the
///   history as it stands when the request is served, and appends its output
///   atomically. Nothing can slip in between the read and the append.
///
/// The worker stops when [`close`](EventStore::close) is called or when the
/// last handle is dropped.
///
/// # Examples
///
/// ```
/// use foldstore::EventStore;
///
/// let store = EventStore::new().unwrap();
/// store.append(["opened", "deposited"]).unwrap();
/// store
///     .evolve(|history| if history.len() >= 2 { vec!["audited"] } else { vec![] })
///     .unwrap();
///
/// let history = store.get().unwrap();
/// assert_eq!(history.as_slice(), &["opened", "deposited", "audited"]);
/// ```
pub struct EventStore<E> {
    inbox: Inbox<E>,
    shared: Arc<Shared>,
}

impl<E> Clone for EventStore<E> {
    fn clone(&self) -> Self {
        EventStore {
            inbox: self.inbox.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> std::fmt::Debug for EventStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("name", &self.shared.name)
            .field("capacity", &self.inbox.capacity())
            .field("overflow", &self.inbox.overflow())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<E> EventStore<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Start a store with an empty history and an unbounded inbox.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Spawn`] if the worker thread cannot be started.
    pub fn new() -> Result<Self, StoreError> {
        EventStoreBuilder::default().open()
    }

    /// Create a builder for configuring a store.
    pub fn builder() -> EventStoreBuilder<E> {
        EventStoreBuilder::default()
    }
}

impl<E> EventStore<E> {
    /// Return a snapshot of the current history.
    ///
    /// Waits for every previously enqueued operation to be served. The
    /// snapshot is a point-in-time copy and never changes afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been closed.
    pub fn get(&self) -> Result<History<E>, StoreError> {
        self.ensure_open()?;
        let (reply, response) = mpsc::channel();
        self.inbox.send(Command::Get(reply))?;
        response.recv().map_err(|_| StoreError::Unavailable)
    }

    /// Number of events in the history, read in queue order like [`get`](EventStore::get).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been closed.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.get().map(|history| history.len())
    }

    /// Whether the history is empty, read in queue order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been closed.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }

    /// Enqueue `events` to be appended at the tail, in the given order.
    ///
    /// Returns as soon as the request is enqueued. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been closed, or
    /// [`StoreError::AppendRejected`] if the inbox is bounded, full, and the
    /// store uses [`OverflowPolicy::Reject`].
    pub fn append<I>(&self, events: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = E>,
    {
        self.ensure_open()?;
        let events: Vec<E> = events.into_iter().collect();
        self.inbox
            .submit(Command::Append(events))
            .inspect_err(|e| self.log_refused("append", e))
    }

    /// Enqueue a decision to run against the latest history.
    ///
    /// `producer` runs on the worker, after every earlier operation and before
    /// any later one; whatever it returns is appended in the same step. A
    /// producer that panics appends nothing and leaves the store running.
    ///
    /// The producer must not call back into the same store: the worker is
    /// busy running it, so a nested `get` would never be served.
    ///
    /// # Errors
    ///
    /// Same as [`append`](EventStore::append).
    pub fn evolve<F>(&self, producer: F) -> Result<(), StoreError>
    where
        F: FnOnce(&[E]) -> Vec<E> + Send + 'static,
    {
        self.ensure_open()?;
        let command = Command::Evolve {
            producer: Box::new(producer),
            reply: None,
        };
        self.inbox
            .submit(command)
            .inspect_err(|e| self.log_refused("evolve", e))
    }

    /// Like [`evolve`](EventStore::evolve), but wait until the decision has
    /// been served and return the events it appended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been closed, or
    /// [`StoreError::ProducerPanicked`] if `producer` panicked (in which case
    /// nothing was appended).
    pub fn evolve_and_wait<F>(&self, producer: F) -> Result<Vec<E>, StoreError>
    where
        F: FnOnce(&[E]) -> Vec<E> + Send + 'static,
    {
        self.ensure_open()?;
        let (reply, response) = mpsc::channel();
        self.inbox.send(Command::Evolve {
            producer: Box::new(producer),
            reply: Some(reply),
        })?;
        match response.recv() {
            Ok(Ok(events)) => Ok(events),
            Ok(Err(message)) => Err(StoreError::ProducerPanicked { message }),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    /// Stop the worker once every previously enqueued operation is served.
    ///
    /// Blocks until the worker has drained up to the shutdown request. Every
    /// later call on any handle fails with [`StoreError::Unavailable`];
    /// submissions racing with `close` on other threads may be discarded
    /// whole. Closing twice is a no-op.
    pub fn close(&self) {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let (ack, done) = mpsc::channel();
        if self.inbox.send(Command::Shutdown(ack)).is_ok() {
            let _ = done.recv();
        }
    }

    /// Whether [`close`](EventStore::close) has been called on any handle.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// The store's name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// The inbox bound, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.inbox.capacity()
    }

    /// The overflow policy for a bounded inbox.
    pub fn overflow(&self) -> OverflowPolicy {
        self.inbox.overflow()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn log_refused(&self, operation: &str, err: &StoreError) {
        log::warn!(
            "event store '{}': {operation} refused: {err}",
            self.shared.name
        );
    }
}

fn run_worker<E: Clone>(name: &str, inbox: Receiver<Command<E>>) {
    log::info!("event store '{name}': worker started");
    let mut history: History<E> = History::new();

    while let Ok(command) = inbox.recv() {
        match command {
            Command::Get(reply) => {
                log::trace!("event store '{name}': get ({} events)", history.len());
                let _ = reply.send(history.clone());
            }
            Command::Append(events) => {
                let added = history.extend(events);
                log::debug!(
                    "event store '{name}': appended {added} events, history length {}",
                    history.len()
                );
            }
            Command::Evolve { producer, reply } => {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| producer(history.as_slice())));
                match outcome {
                    Ok(events) => {
                        let added = match reply {
                            Some(reply) => {
                                let added = history.extend(events.iter().cloned());
                                let _ = reply.send(Ok(events));
                                added
                            }
                            None => history.extend(events),
                        };
                        log::debug!(
                            "event store '{name}': evolve appended {added} events, history length {}",
                            history.len()
                        );
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::error!(
                            "event store '{name}': evolve producer panicked, nothing appended: {message}"
                        );
                        if let Some(reply) = reply {
                            let _ = reply.send(Err(message));
                        }
                    }
                }
            }
            Command::Shutdown(ack) => {
                let _ = ack.send(());
                break;
            }
        }
    }

    log::info!(
        "event store '{name}': worker stopped with {} events",
        history.len()
    );
}
