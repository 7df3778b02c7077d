mod common;

use common::{restocked, sold};
use foldstore::inventory::Flavour;
use foldstore::{EventStore, History};
use serde_json::json;

#[test]
fn test_default_history_is_empty() {
    let history: History<u64> = History::default();
    assert!(history.is_empty());
    assert_eq!(history, History::new());
}

#[test]
fn test_from_iterator_keeps_order() {
    let history: History<u64> = (1..=4).collect();
    assert_eq!(history.as_slice(), &[1, 2, 3, 4]);
    let collected: Vec<u64> = history.iter().copied().collect();
    assert_eq!(collected, vec![1, 2, 3, 4]);
}

#[test]
fn test_iterate_by_reference() {
    let history = History::from(vec![1u64, 2, 3]);
    let mut total = 0;
    for event in &history {
        total += event;
    }
    assert_eq!(total, 6);
}

#[test]
fn test_into_vec_unshared_and_shared() {
    let history = History::from(vec![1u64, 2]);
    let shared = history.clone();
    assert_eq!(history.into_vec(), vec![1, 2]);
    assert_eq!(shared.into_vec(), vec![1, 2]);
}

#[test]
fn test_snapshot_survives_later_store_writes() {
    let store = EventStore::new().unwrap();
    store.append([restocked(Flavour::Vanilla, 2)]).unwrap();
    let snapshot = store.get().unwrap();

    store.append([sold(Flavour::Vanilla)]).unwrap();
    let latest = store.get().unwrap();

    assert_eq!(snapshot.as_slice(), &[restocked(Flavour::Vanilla, 2)]);
    assert_eq!(
        latest.as_slice(),
        &[restocked(Flavour::Vanilla, 2), sold(Flavour::Vanilla)]
    );
}

#[test]
fn test_history_serializes_as_sequence() {
    let history = History::from(vec![restocked(Flavour::Vanilla, 1), sold(Flavour::Vanilla)]);
    let value = serde_json::to_value(&history).unwrap();
    assert_eq!(
        value,
        json!([
            {"type": "restocked", "flavour": "Vanilla", "quantity": 1},
            {"type": "sold", "flavour": "Vanilla"}
        ])
    );
}

#[test]
fn test_history_as_ref_slice() {
    fn count(events: impl AsRef<[char]>) -> usize {
        events.as_ref().len()
    }
    assert_eq!(count(History::from(vec!['a', 'b'])), 2);
}
