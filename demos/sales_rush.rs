//! Many counters selling from one shelf at once.
//!
//! Runs the same rush twice: once deciding against a `get()` snapshot and
//! appending afterwards (racy), once handing the decision to `evolve`
//! (serialized). Only the second never sells more than was stocked.

use foldstore::inventory::{sell_flavour, sold_flavours, Flavour, InventoryEvent};
use foldstore::{project, EventStore, StoreError};
use std::thread;

const COUNTERS: usize = 8;
const SALES_PER_COUNTER: usize = 25;
const STOCK: u32 = 50;

fn rush(store: &EventStore<InventoryEvent>, atomic: bool) -> Result<(), StoreError> {
    store.append([InventoryEvent::Restocked {
        flavour: Flavour::Chocolate,
        quantity: STOCK,
    }])?;

    let counters: Vec<_> = (0..COUNTERS)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || -> Result<(), StoreError> {
                for _ in 0..SALES_PER_COUNTER {
                    if atomic {
                        store.evolve(|history| sell_flavour(Flavour::Chocolate, history))?;
                    } else {
                        let snapshot = store.get()?;
                        thread::yield_now();
                        store.append(sell_flavour(Flavour::Chocolate, &snapshot))?;
                    }
                }
                Ok(())
            })
        })
        .collect();

    for counter in counters {
        counter.join().expect("counter thread panicked")?;
    }
    Ok(())
}

fn report(label: &str, store: &EventStore<InventoryEvent>) -> Result<(), StoreError> {
    let history = store.get()?;
    let sold = project(&sold_flavours(), &history).get(Flavour::Chocolate);
    let refused = history
        .iter()
        .filter(|e| matches!(e, InventoryEvent::WasNotInStock { .. }))
        .count();
    println!(
        "{label:<10} stocked {STOCK}, sold {sold}, refused {refused}{}",
        if sold > STOCK { "  <- oversold" } else { "" }
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let racy = EventStore::builder().name("racy").open()?;
    rush(&racy, false)?;
    report("racy", &racy)?;

    let atomic = EventStore::builder().name("atomic").capacity(16).open()?;
    rush(&atomic, true)?;
    report("atomic", &atomic)?;

    Ok(())
}
