// The table combiner: horizontal concatenation of tables whose rows are
// already aligned by position.
//
// Some source tables share no reliable identifier column, only an implicit
// alphabetical-sort alignment. Callers must pre-sort every input by the same
// logical key (e.g. player display name) before combining; the only check
// performed here is a row-count match.

use thiserror::Error;

use crate::table::Table;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("table {index} has {actual} rows, expected {expected} to align with the primary table")]
pub struct AlignmentError {
    /// Position of the offending table within `others`.
    pub index: usize,
    pub expected: usize,
    pub actual: usize,
}

// ---------------------------------------------------------------------------
// combine_aligned
// ---------------------------------------------------------------------------

/// Append every column of each table in `others` to `primary`, aligned
/// purely by row position.
///
/// Column names are not deduplicated: a later column with a name already in
/// the schema shadows the earlier one for name lookups (legacy contract).
pub fn combine_aligned(primary: &Table, others: &[Table]) -> Result<Table, AlignmentError> {
    for (index, other) in others.iter().enumerate() {
        if other.n_rows() != primary.n_rows() {
            return Err(AlignmentError {
                index,
                expected: primary.n_rows(),
                actual: other.n_rows(),
            });
        }
    }

    let mut columns = primary.columns().to_vec();
    for other in others {
        columns.extend(other.columns().iter().cloned());
    }

    let mut out = Table::new(columns);
    for (i, row) in primary.rows().iter().enumerate() {
        let mut combined = row.clone();
        for other in others {
            combined.extend(other.rows()[i].iter().cloned());
        }
        out.push_row(combined);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
