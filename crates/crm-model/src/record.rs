//! Transformed output rows.

use std::collections::BTreeMap;

/// One transformed record: target column name to string value.
pub type RowRecord = BTreeMap<String, String>;

/// Values of `record` in the given column order, blank when absent.
pub fn ordered_values<'a>(record: &'a RowRecord, columns: &[&str]) -> Vec<&'a str> {
    columns
        .iter()
        .map(|column| record.get(*column).map(String::as_str).unwrap_or_default())
        .collect()
}
