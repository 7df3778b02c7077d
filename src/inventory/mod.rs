//! A small ice-cream inventory built on the store.
//!
//! Shows the full pattern: domain events, projections that fold them into
//! read-side state, and decision functions that turn intent into new events.
//!
//! ```
//! use foldstore::inventory::{sell_flavour, sold_flavours, stock_of, Flavour, InventoryEvent};
//! use foldstore::{project, EventStore};
//!
//! let store = EventStore::new().unwrap();
//! store
//!     .append([InventoryEvent::Restocked { flavour: Flavour::Vanilla, quantity: 2 }])
//!     .unwrap();
//! store.evolve(|history| sell_flavour(Flavour::Vanilla, history)).unwrap();
//!
//! let history = store.get().unwrap();
//! assert_eq!(stock_of(Flavour::Vanilla, &history), 1);
//! assert_eq!(project(&sold_flavours(), &history).get(Flavour::Vanilla), 1);
//! ```

mod behaviour;
mod events;
mod projections;

pub use behaviour::{restock_flavour, sell_flavour};
pub use events::{Flavour, InventoryEvent};
pub use projections::{flavours_in_stock, sold_count_of, sold_flavours, stock_of, Tally};
