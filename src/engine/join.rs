// The join engine: enrich a target table with one column looked up from a
// source table by string identifier.
//
// The lookup map is built once up front (O(n) build, O(1) per target row)
// instead of rescanning the source per row. Duplicate identifiers in the
// source resolve to the first occurrence in source row order, which keeps
// the result deterministic for messy inputs.

use std::collections::HashMap;

use thiserror::Error;

use crate::table::{Table, Value};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("join source table has no column `{0}`")]
    MissingInSource(String),

    #[error("join target table has no column `{0}`")]
    MissingInTarget(String),
}

// ---------------------------------------------------------------------------
// JoinSpec
// ---------------------------------------------------------------------------

/// One join operation: where to look values up and what to call the result.
///
/// Constructed per join, consumed once. `match_column_in_target` defaults to
/// the target's first column when `None` (the primary identifier by
/// convention, e.g. the player name).
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub source: Table,
    pub match_column_in_source: String,
    pub value_column_in_source: String,
    pub output_column: String,
    pub match_column_in_target: Option<String>,
}

// ---------------------------------------------------------------------------
// join
// ---------------------------------------------------------------------------

/// Merge one looked-up column into `target`.
///
/// For each target row, the value of its match column is looked up among the
/// source's match-column values; the corresponding source value lands in a
/// new trailing column named `spec.output_column`. Rows with no match get
/// `Value::Absent` — a missing match is normal domain data, not an error.
///
/// Guarantees: row count and row order are unchanged; the column set grows
/// by exactly one.
pub fn join(target: &Table, spec: &JoinSpec) -> Result<Table, SchemaError> {
    let src_match = spec
        .source
        .column_index(&spec.match_column_in_source)
        .ok_or_else(|| SchemaError::MissingInSource(spec.match_column_in_source.clone()))?;
    let src_value = spec
        .source
        .column_index(&spec.value_column_in_source)
        .ok_or_else(|| SchemaError::MissingInSource(spec.value_column_in_source.clone()))?;

    let target_match_name = match &spec.match_column_in_target {
        Some(name) => name.clone(),
        None => target.columns().first().cloned().unwrap_or_default(),
    };
    let tgt_match = target
        .column_index(&target_match_name)
        .ok_or(SchemaError::MissingInTarget(target_match_name))?;

    // First occurrence in source row order wins on duplicate identifiers.
    let mut lookup: HashMap<String, &Value> = HashMap::with_capacity(spec.source.n_rows());
    for row in spec.source.rows() {
        if let Some(key) = row[src_match].match_key() {
            lookup.entry(key).or_insert(&row[src_value]);
        }
    }

    let mut columns = target.columns().to_vec();
    columns.push(spec.output_column.clone());
    let mut out = Table::new(columns);
    for row in target.rows() {
        let looked_up = row[tgt_match]
            .match_key()
            .and_then(|key| lookup.get(&key).map(|v| (*v).clone()))
            .unwrap_or(Value::Absent);
        let mut new_row = row.clone();
        new_row.push(looked_up);
        out.push_row(new_row);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
