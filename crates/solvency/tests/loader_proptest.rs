//! Property-based tests for the loader and the runner's alignment.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

use solvency::testing::{gz_json_bytes, FixedLabels};
use solvency::{predict_table, Loader, LoaderConfig, RowId};

/// Quarter-steps survive a JSON text round trip exactly.
fn arb_value() -> impl Strategy<Value = f64> {
    (-4_000_000i32..4_000_000).prop_map(|v| f64::from(v) / 4.0)
}

/// Records with unique integer ids and an optional numeric feature.
fn arb_records() -> impl Strategy<Value = Vec<(i64, Option<f64>)>> {
    prop_vec((any::<i64>(), prop::option::of(arb_value())), 0..40).prop_map(|mut rows| {
        let mut seen = std::collections::HashSet::new();
        rows.retain(|(id, _)| seen.insert(*id));
        rows
    })
}

fn document(rows: &[(i64, Option<f64>)]) -> Value {
    let records: Vec<Value> = rows
        .iter()
        .map(|(id, x)| {
            let mut record = Map::new();
            record.insert("id".into(), json!(id));
            if let Some(x) = x {
                record.insert("x".into(), json!(x));
            }
            Value::Object(record)
        })
        .collect();
    json!({ "observations": records })
}

proptest! {
    #[test]
    fn n_records_give_n_rows_in_file_order(rows in arb_records()) {
        let bytes = gz_json_bytes(&document(&rows)).unwrap();
        let table = Loader::new(LoaderConfig::observations()).read(bytes.as_slice()).unwrap();

        prop_assert_eq!(table.n_rows(), rows.len());
        let expected: Vec<RowId> = rows.iter().map(|(id, _)| RowId::Int(*id)).collect();
        prop_assert_eq!(table.index(), expected.as_slice());

        if let Some(column) = table.column("x") {
            let x = column.as_numeric().unwrap();
            for (i, (_, value)) in rows.iter().enumerate() {
                match value {
                    Some(v) => prop_assert_eq!(x[i], *v),
                    None => prop_assert!(x[i].is_nan()),
                }
            }
        } else {
            prop_assert!(rows.iter().all(|(_, x)| x.is_none()));
        }
    }

    #[test]
    fn series_pairs_each_id_with_its_label(rows in arb_records()) {
        let bytes = gz_json_bytes(&document(&rows)).unwrap();
        let table = Loader::new(LoaderConfig::observations()).read(bytes.as_slice()).unwrap();
        let labels: Vec<i64> = (0..rows.len() as i64).map(|i| i % 2).collect();

        let series = predict_table(&FixedLabels(labels.clone()), &table).unwrap();
        for (i, (id, label)) in series.iter().enumerate() {
            prop_assert_eq!(id, &RowId::Int(rows[i].0));
            prop_assert_eq!(label, labels[i]);
        }
    }
}
