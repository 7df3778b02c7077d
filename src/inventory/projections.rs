use super::events::{Flavour, InventoryEvent};
use crate::projection::Projection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A per-flavour count where an absent flavour reads as zero.
///
/// Zero entries are never stored, so two tallies that read the same for
/// every flavour also compare equal.
///
/// # Examples
///
/// ```
/// use foldstore::inventory::{Flavour, Tally};
///
/// let mut tally = Tally::default();
/// tally.increment(Flavour::Vanilla, 2);
/// tally.decrement(Flavour::Vanilla, 5);
///
/// assert_eq!(tally.get(Flavour::Vanilla), 0);
/// assert_eq!(tally.get(Flavour::Chocolate), 0);
/// assert_eq!(tally, Tally::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<Flavour, u32>,
}

impl Tally {
    /// The count for `flavour`, zero if never recorded.
    pub fn get(&self, flavour: Flavour) -> u32 {
        self.counts.get(&flavour).copied().unwrap_or(0)
    }

    /// Add `by` to the count for `flavour`.
    pub fn increment(&mut self, flavour: Flavour, by: u32) {
        if by == 0 {
            return;
        }
        let count = self.counts.entry(flavour).or_insert(0);
        *count = count.saturating_add(by);
    }

    /// Subtract `by` from the count for `flavour`, stopping at zero.
    pub fn decrement(&mut self, flavour: Flavour, by: u32) {
        let remaining = self.get(flavour).saturating_sub(by);
        if remaining == 0 {
            self.counts.remove(&flavour);
        } else {
            self.counts.insert(flavour, remaining);
        }
    }

    /// Flavours with a non-zero count, in flavour order.
    pub fn iter(&self) -> impl Iterator<Item = (Flavour, u32)> + '_ {
        self.counts.iter().map(|(flavour, count)| (*flavour, *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }
}

fn count_sold(mut state: Tally, event: &InventoryEvent) -> Tally {
    if let InventoryEvent::Sold { flavour } = *event {
        state.increment(flavour, 1);
    }
    state
}

fn track_stock(mut state: Tally, event: &InventoryEvent) -> Tally {
    match *event {
        InventoryEvent::Sold { flavour } => state.decrement(flavour, 1),
        InventoryEvent::Restocked { flavour, quantity } => state.increment(flavour, quantity),
        _ => {}
    }
    state
}

/// How many units of each flavour have been sold.
pub fn sold_flavours() -> Projection<Tally, InventoryEvent> {
    Projection::from_update(count_sold)
}

/// How many units of each flavour are in stock.
///
/// Restocks add, sales subtract. Stock never drops below zero: a `Sold`
/// appended against an empty shelf (bypassing [`sell_flavour`](super::sell_flavour))
/// leaves the stock at zero.
pub fn flavours_in_stock() -> Projection<Tally, InventoryEvent> {
    Projection::from_update(track_stock)
}

/// Current stock of `flavour` after folding `history`.
pub fn stock_of(flavour: Flavour, history: &[InventoryEvent]) -> u32 {
    flavours_in_stock().project(history).get(flavour)
}

/// Units of `flavour` sold over `history`.
pub fn sold_count_of(flavour: Flavour, history: &[InventoryEvent]) -> u32 {
    sold_flavours().project(history).get(flavour)
}
