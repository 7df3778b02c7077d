use serde::{Deserialize, Serialize};
use std::fmt;

/// An ice-cream flavour: the item identity the sample inventory tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Flavour {
    Vanilla,
    Strawberry,
    Chocolate,
}

impl Flavour {
    /// Every flavour, in declaration order.
    pub const ALL: [Flavour; 3] = [Flavour::Vanilla, Flavour::Strawberry, Flavour::Chocolate];
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flavour::Vanilla => "vanilla",
            Flavour::Strawberry => "strawberry",
            Flavour::Chocolate => "chocolate",
        };
        f.write_str(name)
    }
}

/// A fact recorded by the inventory.
///
/// Events are immutable once appended. A refused sale is recorded as
/// [`WasNotInStock`](InventoryEvent::WasNotInStock) rather than reported as
/// an error, and running out of stock is a fact of its own
/// ([`WentOutOfStock`](InventoryEvent::WentOutOfStock)), not something
/// projections have to infer.
///
/// Serialized with a `"type"` field naming the variant, e.g.
/// `{"type":"sold","flavour":"Vanilla"}`.
///
/// ```
/// use foldstore::inventory::{Flavour, InventoryEvent};
///
/// let event = InventoryEvent::Restocked {
///     flavour: Flavour::Vanilla,
///     quantity: 3,
/// };
/// assert_eq!(event.flavour(), Flavour::Vanilla);
/// assert_eq!(event.to_string(), "restocked 3 x vanilla");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    /// One unit was sold.
    Sold { flavour: Flavour },

    /// `quantity` units were added to stock.
    Restocked { flavour: Flavour, quantity: u32 },

    /// The last unit was sold; stock is now zero.
    WentOutOfStock { flavour: Flavour },

    /// A sale was requested while stock was zero and did not happen.
    WasNotInStock { flavour: Flavour },
}

impl InventoryEvent {
    /// The flavour this event is about.
    pub fn flavour(&self) -> Flavour {
        match *self {
            InventoryEvent::Sold { flavour }
            | InventoryEvent::Restocked { flavour, .. }
            | InventoryEvent::WentOutOfStock { flavour }
            | InventoryEvent::WasNotInStock { flavour } => flavour,
        }
    }
}

impl fmt::Display for InventoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryEvent::Sold { flavour } => write!(f, "sold {flavour}"),
            InventoryEvent::Restocked { flavour, quantity } => {
                write!(f, "restocked {quantity} x {flavour}")
            }
            InventoryEvent::WentOutOfStock { flavour } => write!(f, "{flavour} went out of stock"),
            InventoryEvent::WasNotInStock { flavour } => write!(f, "{flavour} was not in stock"),
        }
    }
}
