use super::events::{Flavour, InventoryEvent};
use super::projections::stock_of;

/// Decide what selling one unit of `flavour` means given `history`.
///
/// - no stock: `[WasNotInStock]`; the refusal is recorded, not raised
/// - last unit: `[Sold, WentOutOfStock]`
/// - otherwise: `[Sold]`
///
/// Pure: pass it to [`EventStore::evolve`](crate::EventStore::evolve) to
/// decide against the latest history without racing other writers.
///
/// # Examples
///
/// ```
/// use foldstore::inventory::{sell_flavour, Flavour, InventoryEvent};
///
/// let history = [InventoryEvent::Restocked { flavour: Flavour::Vanilla, quantity: 1 }];
/// assert_eq!(
///     sell_flavour(Flavour::Vanilla, &history),
///     vec![
///         InventoryEvent::Sold { flavour: Flavour::Vanilla },
///         InventoryEvent::WentOutOfStock { flavour: Flavour::Vanilla },
///     ]
/// );
/// ```
pub fn sell_flavour(flavour: Flavour, history: &[InventoryEvent]) -> Vec<InventoryEvent> {
    match stock_of(flavour, history) {
        0 => vec![InventoryEvent::WasNotInStock { flavour }],
        1 => vec![
            InventoryEvent::Sold { flavour },
            InventoryEvent::WentOutOfStock { flavour },
        ],
        _ => vec![InventoryEvent::Sold { flavour }],
    }
}

/// Decide what restocking `quantity` units of `flavour` means.
///
/// Always a single `Restocked` event. `history` is not consulted; it is
/// taken so the function has the same shape as [`sell_flavour`].
pub fn restock_flavour(
    flavour: Flavour,
    quantity: u32,
    _history: &[InventoryEvent],
) -> Vec<InventoryEvent> {
    vec![InventoryEvent::Restocked { flavour, quantity }]
}
