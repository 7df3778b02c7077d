use std::any::Any;
use std::io;
use thiserror::Error;

/// Errors returned by [`EventStore`](crate::EventStore) operations.
///
/// The in-memory store itself cannot fail while its worker is running; these
/// variants cover the worker going away, a full bounded inbox, and a
/// producer that panicked while the caller was waiting on it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The serialized worker is not running (store closed or worker gone).
    #[error("event store is unavailable: worker is not running")]
    Unavailable,

    /// The bounded inbox is full and the store uses [`OverflowPolicy::Reject`](crate::OverflowPolicy::Reject).
    #[error("event store rejected submission: inbox full ({capacity} pending operations)")]
    AppendRejected {
        /// Configured inbox capacity.
        capacity: usize,
    },

    /// An `evolve_and_wait` producer panicked. Nothing was appended.
    #[error("event producer panicked: {message}")]
    ProducerPanicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The worker thread could not be spawned.
    #[error("failed to spawn event store worker: {0}")]
    Spawn(#[from] io::Error),
}

/// Error returned by [`try_project`](crate::try_project).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectionError {
    /// The update function panicked part-way through the fold.
    #[error("projection update panicked at event {position}: {message}")]
    Panicked {
        /// Index of the event being folded when the panic happened.
        position: usize,
        /// Panic payload rendered as text.
        message: String,
    },
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
