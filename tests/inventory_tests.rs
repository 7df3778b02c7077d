mod common;

use common::{restocked, sold, was_not_in_stock, went_out_of_stock};
use foldstore::inventory::{
    flavours_in_stock, restock_flavour, sell_flavour, sold_count_of, sold_flavours, stock_of,
    Flavour, InventoryEvent, Tally,
};
use foldstore::project;
use serde_json::json;

#[test]
fn test_sell_with_no_stock_is_recorded_refusal() {
    assert_eq!(
        sell_flavour(Flavour::Vanilla, &[]),
        vec![was_not_in_stock(Flavour::Vanilla)]
    );
}

#[test]
fn test_sell_last_unit_goes_out_of_stock() {
    let history = [restocked(Flavour::Vanilla, 1)];
    assert_eq!(
        sell_flavour(Flavour::Vanilla, &history),
        vec![sold(Flavour::Vanilla), went_out_of_stock(Flavour::Vanilla)]
    );
}

#[test]
fn test_sell_with_plenty_of_stock() {
    let history = [restocked(Flavour::Vanilla, 2)];
    assert_eq!(
        sell_flavour(Flavour::Vanilla, &history),
        vec![sold(Flavour::Vanilla)]
    );
}

#[test]
fn test_sell_only_looks_at_its_own_flavour() {
    let history = [restocked(Flavour::Chocolate, 5)];
    assert_eq!(
        sell_flavour(Flavour::Strawberry, &history),
        vec![was_not_in_stock(Flavour::Strawberry)]
    );
}

#[test]
fn test_sell_after_stock_sold_out() {
    let history = [
        restocked(Flavour::Vanilla, 1),
        sold(Flavour::Vanilla),
        went_out_of_stock(Flavour::Vanilla),
    ];
    assert_eq!(
        sell_flavour(Flavour::Vanilla, &history),
        vec![was_not_in_stock(Flavour::Vanilla)]
    );
}

#[test]
fn test_restock_ignores_history() {
    let busy = [
        restocked(Flavour::Vanilla, 10),
        sold(Flavour::Vanilla),
        was_not_in_stock(Flavour::Strawberry),
    ];
    assert_eq!(
        restock_flavour(Flavour::Strawberry, 4, &[]),
        vec![restocked(Flavour::Strawberry, 4)]
    );
    assert_eq!(
        restock_flavour(Flavour::Strawberry, 4, &busy),
        vec![restocked(Flavour::Strawberry, 4)]
    );
}

#[test]
fn test_stock_projection() {
    let history = [
        restocked(Flavour::Vanilla, 3),
        restocked(Flavour::Chocolate, 1),
        sold(Flavour::Vanilla),
        restocked(Flavour::Vanilla, 2),
        sold(Flavour::Chocolate),
        went_out_of_stock(Flavour::Chocolate),
    ];
    let stock = project(&flavours_in_stock(), &history);
    assert_eq!(stock.get(Flavour::Vanilla), 4);
    assert_eq!(stock.get(Flavour::Chocolate), 0);
    assert_eq!(stock.get(Flavour::Strawberry), 0);
    assert_eq!(stock.iter().collect::<Vec<_>>(), vec![(Flavour::Vanilla, 4)]);
}

#[test]
fn test_stock_is_clamped_at_zero_when_sale_bypasses_decision() {
    let history = [
        sold(Flavour::Vanilla),
        sold(Flavour::Vanilla),
        restocked(Flavour::Vanilla, 1),
    ];
    assert_eq!(stock_of(Flavour::Vanilla, &history), 1);
}

#[test]
fn test_sold_projection_counts_only_sales() {
    let history = [
        restocked(Flavour::Vanilla, 3),
        sold(Flavour::Vanilla),
        sold(Flavour::Vanilla),
        was_not_in_stock(Flavour::Strawberry),
        went_out_of_stock(Flavour::Vanilla),
    ];
    let tally = sold_flavours().project(&history);
    assert_eq!(tally.get(Flavour::Vanilla), 2);
    assert_eq!(tally.get(Flavour::Strawberry), 0);
    assert_eq!(tally.total(), 2);
    assert_eq!(sold_count_of(Flavour::Vanilla, &history), 2);
}

#[test]
fn test_tally_absent_equals_zero() {
    let mut tally = Tally::default();
    tally.increment(Flavour::Chocolate, 0);
    assert_eq!(tally, Tally::default());

    tally.increment(Flavour::Chocolate, 2);
    tally.decrement(Flavour::Chocolate, 2);
    assert_eq!(tally, Tally::default());
    assert_eq!(tally.get(Flavour::Chocolate), 0);
}

#[test]
fn test_tally_serializes_as_map() {
    let mut tally = Tally::default();
    tally.increment(Flavour::Vanilla, 3);
    tally.increment(Flavour::Strawberry, 1);
    let value = serde_json::to_value(&tally).unwrap();
    assert_eq!(value, json!({"Vanilla": 3, "Strawberry": 1}));
}

#[test]
fn test_event_json_shape() {
    let value = serde_json::to_value(restocked(Flavour::Vanilla, 3)).unwrap();
    assert_eq!(
        value,
        json!({"type": "restocked", "flavour": "Vanilla", "quantity": 3})
    );

    let value = serde_json::to_value(was_not_in_stock(Flavour::Chocolate)).unwrap();
    assert_eq!(value, json!({"type": "was_not_in_stock", "flavour": "Chocolate"}));

    let parsed: InventoryEvent =
        serde_json::from_str(r#"{"type":"went_out_of_stock","flavour":"Strawberry"}"#).unwrap();
    assert_eq!(parsed, went_out_of_stock(Flavour::Strawberry));
}

#[test]
fn test_event_display() {
    assert_eq!(sold(Flavour::Vanilla).to_string(), "sold vanilla");
    assert_eq!(
        went_out_of_stock(Flavour::Chocolate).to_string(),
        "chocolate went out of stock"
    );
    assert_eq!(
        was_not_in_stock(Flavour::Strawberry).to_string(),
        "strawberry was not in stock"
    );
}

#[test]
fn test_event_flavour() {
    for flavour in Flavour::ALL {
        assert_eq!(sold(flavour).flavour(), flavour);
        assert_eq!(restocked(flavour, 9).flavour(), flavour);
        assert_eq!(went_out_of_stock(flavour).flavour(), flavour);
        assert_eq!(was_not_in_stock(flavour).flavour(), flavour);
    }
}
