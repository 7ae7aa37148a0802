//! Property tests for filter merging

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use vizdock_core::Filter;
use vizdock_core::propagation::merge_filters;

const COLUMNS: [&str; 5] = ["region", "year", "product", "channel", "sku"];

fn column_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(COLUMNS.to_vec()).prop_map(str::to_string)
}

fn filter_strategy() -> impl Strategy<Value = Filter> {
    (column_strategy(), 0i64..10).prop_map(|(column, value)| Filter::new(column, "==", value))
}

fn filters_strategy() -> impl Strategy<Value = Vec<Filter>> {
    proptest::collection::vec(filter_strategy(), 0..6)
}

fn columns_strategy() -> impl Strategy<Value = HashSet<String>> {
    proptest::collection::hash_set(column_strategy(), 0..5)
}

proptest! {
    #[test]
    fn merged_filters_are_unique_per_column(
        candidates in columns_strategy(),
        incoming in filters_strategy(),
        current in filters_strategy(),
        schema_columns in columns_strategy(),
    ) {
        let schema: BTreeMap<String, String> = schema_columns
            .iter()
            .map(|column| (column.clone(), "string".to_string()))
            .collect();
        let merged = merge_filters(&candidates, &incoming, &current, &schema);
        let columns: HashSet<&str> = merged.iter().map(Filter::column).collect();
        prop_assert_eq!(columns.len(), merged.len());
    }

    #[test]
    fn incoming_filters_win_and_unrelated_filters_survive(
        candidates in columns_strategy(),
        incoming in filters_strategy(),
        current in filters_strategy(),
        schema_columns in columns_strategy(),
    ) {
        let schema: BTreeMap<String, String> = schema_columns
            .iter()
            .map(|column| (column.clone(), "string".to_string()))
            .collect();
        let merged = merge_filters(&candidates, &incoming, &current, &schema);

        for filter in &merged {
            let from_incoming = incoming.contains(filter) && schema.contains_key(filter.column());
            let from_current = current.contains(filter) && !candidates.contains(filter.column());
            prop_assert!(from_incoming || from_current);
        }
        // The first valid incoming filter per column always lands.
        for filter in incoming.iter().filter(|f| schema.contains_key(f.column())) {
            let landed = merged.iter().find(|m| m.column() == filter.column());
            let first = incoming
                .iter()
                .find(|f| f.column() == filter.column())
                .cloned();
            prop_assert_eq!(landed.cloned(), first);
        }
        // Retained filters never touch a candidate column unless re-sent.
        for filter in &merged {
            if candidates.contains(filter.column()) {
                prop_assert!(incoming.contains(filter));
            }
        }
    }
}
