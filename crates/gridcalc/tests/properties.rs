//! Property tests over randomly generated sheets

use gridcalc::prelude::*;
use proptest::prelude::*;

/// Comma-free raw values: literals and formulas over a 3x3 block, cycles included
fn raw_value() -> impl Strategy<Value = String> {
    prop_oneof![
        (-100i32..100).prop_map(|n| n.to_string()),
        Just("text".to_string()),
        (0u32..3, 0u16..3).prop_map(|(r, c)| format!("={}+1", CellAddress::new(r, c))),
        Just("=SUM(A1:C3)".to_string()),
        Just("=MAX(A1:C3)-B2".to_string()),
        Just("=AVERAGE(A1:A3)*2".to_string()),
    ]
}

fn sheet() -> impl Strategy<Value = CellStore> {
    prop::collection::vec(((0u32..3, 0u16..3), raw_value()), 0..9).prop_map(|cells| {
        let mut store = CellStore::new();
        for ((row, col), raw) in cells {
            store.set(row, col, raw).unwrap();
        }
        store
    })
}

proptest! {
    #[test]
    fn recompute_is_deterministic(store in sheet()) {
        prop_assert_eq!(recompute(&store), recompute(&store));
    }

    #[test]
    fn snapshot_keys_match_store(store in sheet()) {
        let snapshot = recompute(&store);
        let keys: Vec<_> = snapshot.keys().copied().collect();
        let stored: Vec<_> = store.addresses().collect();
        prop_assert_eq!(keys, stored);
    }

    #[test]
    fn csv_round_trip(store in sheet()) {
        let text = CsvWriter::write_string(&store, &CsvWriteOptions::default());
        let import = CsvReader::read_str(&text, &CsvReadOptions::default()).unwrap();
        prop_assert_eq!(import.store, store);
    }
}
