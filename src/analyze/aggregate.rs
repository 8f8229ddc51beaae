// src/analyze/aggregate.rs

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::table::Table;

/// Sum `value` per distinct value of `group_by`, ascending by group key.
///
/// Rows with an empty group cell are skipped; non-numeric value cells
/// contribute zero. Missing columns are a schema precondition the caller
/// should have caught at upload, reported the same way.
pub fn group_sum(
    table: &Table,
    group_by: &str,
    value: &str,
) -> Result<Vec<(String, f64)>, SchemaError> {
    let mut missing = Vec::new();
    let group_idx = table.column_index(group_by);
    let value_idx = table.column_index(value);
    if group_idx.is_none() {
        missing.push(group_by.to_string());
    }
    if value_idx.is_none() {
        missing.push(value.to_string());
    }
    if !missing.is_empty() {
        return Err(SchemaError::new(missing));
    }
    let (group_idx, value_idx) = (group_idx.unwrap(), value_idx.unwrap());

    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in table.rows() {
        let key = &row[group_idx];
        if key.is_empty() {
            continue;
        }
        let amount = row[value_idx].as_number().unwrap_or(0.0);
        *totals.entry(key.to_string()).or_insert(0.0) += amount;
    }
    Ok(totals.into_iter().collect())
}
