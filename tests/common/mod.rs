#![allow(dead_code)]

use foldstore::inventory::{Flavour, InventoryEvent};
use foldstore::{EventStore, Projection};

pub fn sold(flavour: Flavour) -> InventoryEvent {
    InventoryEvent::Sold { flavour }
}

pub fn restocked(flavour: Flavour, quantity: u32) -> InventoryEvent {
    InventoryEvent::Restocked { flavour, quantity }
}

pub fn went_out_of_stock(flavour: Flavour) -> InventoryEvent {
    InventoryEvent::WentOutOfStock { flavour }
}

pub fn was_not_in_stock(flavour: Flavour) -> InventoryEvent {
    InventoryEvent::WasNotInStock { flavour }
}

pub fn inventory_store() -> EventStore<InventoryEvent> {
    EventStore::builder().name("test").open().unwrap()
}

pub fn append_n(store: &EventStore<u64>, n: u64) {
    for i in 0..n {
        store.append([i]).unwrap();
    }
}

pub fn counter_reducer(state: u64, _event: &u64) -> u64 {
    state + 1
}

pub fn sum_reducer(state: u64, event: &u64) -> u64 {
    state + event
}

pub fn counter() -> Projection<u64, u64> {
    Projection::new(0, counter_reducer)
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct StatsState {
    pub event_count: u64,
    pub last_event: Option<u64>,
}

pub fn stats_reducer(mut state: StatsState, event: &u64) -> StatsState {
    state.event_count += 1;
    state.last_event = Some(*event);
    state
}
