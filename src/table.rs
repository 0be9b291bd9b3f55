// The tabular value type shared by the join, combine, and classify engines.
//
// A Table is a plain value: ordered named columns, ordered rows, every cell a
// string, a number, or an explicit absent marker. Every transform in this
// crate returns a new Table; nothing mutates shared row storage.

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single cell in a table.
///
/// `Absent` is the explicit missing-value marker. It is never conflated with
/// zero or the empty string, so downstream filtering can always tell "no
/// match found" apart from real data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Absent,
}

impl Value {
    /// Parse a raw CSV field into a Value.
    ///
    /// Empty and NA-style cells become `Absent`. Anything that parses as a
    /// finite f64 becomes `Num`; non-finite numerics (NaN, inf) are treated
    /// as missing data. Everything else stays a string.
    pub fn from_csv_field(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
        {
            return Value::Absent;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Num(n),
            Ok(_) => Value::Absent,
            Err(_) => Value::Str(trimmed.to_string()),
        }
    }

    /// Numeric view of this value, if it has one.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Canonical join-key form of this value.
    ///
    /// Strings are trimmed; numbers use their canonical display form so that
    /// an identifier read as `17` from one file matches `17.0` from another.
    /// Absent values never match anything.
    pub fn match_key(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.trim().to_string()),
            Value::Num(n) => Some(fmt_num(*n)),
            Value::Absent => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Num(n) => f.write_str(&fmt_num(*n)),
            Value::Absent => Ok(()),
        }
    }
}

/// Format a number without a trailing `.0` when it is integral.
fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory table: ordered columns, ordered rows.
///
/// Invariant: every row holds exactly `columns.len()` values. Column names
/// are unique within a freshly loaded table; the combiner may introduce
/// duplicates by contract, in which case lookups resolve to the first
/// occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given schema.
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row. The row must match the declared schema width.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width != schema width");
        self.rows.push(row);
    }

    /// Append a column. `values` must hold one entry per existing row.
    pub fn push_column(&mut self, name: String, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len(), "column height != row count");
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// A copy of this table with rows stably sorted by the given column.
    ///
    /// Numbers sort ascending and before strings; strings sort
    /// lexicographically; absent values sort last.
    pub fn sorted_by_column(&self, index: usize) -> Table {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| value_sort_cmp(&a[index], &b[index]));
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}

fn value_sort_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Num(_), Value::Str(_)) => Ordering::Less,
        (Value::Str(_), Value::Num(_)) => Ordering::Greater,
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Absent, Value::Absent) => Ordering::Equal,
        (Value::Absent, _) => Ordering::Greater,
        (_, Value::Absent) => Ordering::Less,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
