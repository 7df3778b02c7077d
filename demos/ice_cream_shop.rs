//! A single-counter ice-cream shop: the "hello world" of foldstore.
//!
//! Restocks vanilla, sells until it runs out, then prints the history and
//! the two standard projections.

use foldstore::inventory::{
    flavours_in_stock, restock_flavour, sell_flavour, sold_flavours, Flavour, InventoryEvent,
};
use foldstore::{project, EventStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = EventStore::<InventoryEvent>::builder().name("shop").open()?;

    store.evolve(|history| restock_flavour(Flavour::Vanilla, 3, history))?;
    store.evolve(|history| restock_flavour(Flavour::Chocolate, 1, history))?;
    println!("Restocked: 3 x vanilla, 1 x chocolate");

    for flavour in [Flavour::Vanilla; 4].into_iter().chain([Flavour::Strawberry]) {
        let outcome = store.evolve_and_wait(move |history| sell_flavour(flavour, history))?;
        let facts: Vec<String> = outcome.iter().map(ToString::to_string).collect();
        println!("Sell {flavour}: {}", facts.join(", "));
    }

    let history = store.get()?;
    println!("\nHistory:");
    for (i, event) in history.iter().enumerate() {
        println!("  {i:>2} {}", serde_json::to_string(event)?);
    }

    let stock = project(&flavours_in_stock(), &history);
    let sold = project(&sold_flavours(), &history);
    println!("\n{:<12} {:>5} {:>5}", "flavour", "stock", "sold");
    for flavour in Flavour::ALL {
        println!(
            "{:<12} {:>5} {:>5}",
            flavour.to_string(),
            stock.get(flavour),
            sold.get(flavour)
        );
    }

    store.close();
    Ok(())
}
