use crate::error::{panic_message, ProjectionError};
use std::panic::{self, AssertUnwindSafe};

/// A pure function that folds an event into state.
///
/// Update functions receive owned state and return owned state. They should
/// be pure (no I/O, no side effects) and leave the state unchanged for
/// events they don't care about, usually with a `_ => state` arm.
///
/// # Examples
///
/// ```
/// use foldstore::UpdateFn;
///
/// fn counter(state: u64, _event: &String) -> u64 {
///     state + 1
/// }
///
/// let update: UpdateFn<u64, String> = counter;
/// ```
pub type UpdateFn<S, E> = fn(S, &E) -> S;

/// A recipe for deriving read-side state from a history.
///
/// A projection is just an initial state and an update function. It holds no
/// derived state itself: every call to [`project`](Projection::project)
/// folds the given history from scratch, so the same history always yields
/// the same state.
pub struct Projection<S, E> {
    init: S,
    update: UpdateFn<S, E>,
}

impl<S: std::fmt::Debug, E> std::fmt::Debug for Projection<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("init", &self.init)
            .finish_non_exhaustive()
    }
}

impl<S: Clone, E> Clone for Projection<S, E> {
    fn clone(&self) -> Self {
        Projection {
            init: self.init.clone(),
            update: self.update,
        }
    }
}

impl<S: Default, E> Projection<S, E> {
    /// Create a projection starting from `S::default()`.
    pub fn from_update(update: UpdateFn<S, E>) -> Self {
        Projection::new(S::default(), update)
    }
}

impl<S, E> Projection<S, E> {
    /// Create a projection from an initial state and an update function.
    pub fn new(init: S, update: UpdateFn<S, E>) -> Self {
        Projection { init, update }
    }

    /// The state the fold starts from.
    pub fn init(&self) -> &S {
        &self.init
    }

    /// Apply a single event to `state`.
    pub fn apply(&self, state: S, event: &E) -> S {
        (self.update)(state, event)
    }
}

impl<S: Clone, E> Projection<S, E> {
    /// Fold `history` into a derived state, oldest event first.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldstore::Projection;
    ///
    /// fn total(state: u32, amount: &u32) -> u32 {
    ///     state + amount
    /// }
    ///
    /// let sum = Projection::new(0, total);
    /// assert_eq!(sum.project(&[1, 2, 3]), 6);
    /// assert_eq!(sum.project(&[]), 0);
    /// ```
    pub fn project(&self, history: &[E]) -> S {
        history
            .iter()
            .fold(self.init.clone(), |state, event| (self.update)(state, event))
    }
}

/// Fold `history` through `projection`.
///
/// Free-function form of [`Projection::project`], convenient next to a store:
/// `project(&stock, &store.get()?)`.
pub fn project<S: Clone, E>(projection: &Projection<S, E>, history: &[E]) -> S {
    projection.project(history)
}

/// Fold `history` through `projection`, recovering from a panicking update.
///
/// The history is only ever borrowed immutably, so a panic part-way through
/// the fold leaves it intact; the partially folded state is discarded.
///
/// # Errors
///
/// Returns [`ProjectionError::Panicked`] with the index of the offending
/// event if the update function panics.
pub fn try_project<S: Clone, E>(
    projection: &Projection<S, E>,
    history: &[E],
) -> Result<S, ProjectionError> {
    let mut position = 0;
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut state = projection.init.clone();
        for (i, event) in history.iter().enumerate() {
            position = i;
            state = (projection.update)(state, event);
        }
        state
    }));

    result.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        log::warn!("projection update panicked at event {position}: {message}");
        ProjectionError::Panicked { position, message }
    })
}
