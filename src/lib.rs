mod error;
mod history;
pub mod inventory;
mod projection;
mod store;

pub use error::{ProjectionError, StoreError};
pub use history::History;
pub use projection::{project, try_project, Projection, UpdateFn};
pub use store::{EventStore, EventStoreBuilder, OverflowPolicy};
