// CSV reading and writing for Table values.
//
// All file I/O in the crate lives here and in the pipeline; the core engines
// never touch the filesystem. Cells are parsed as numbers where possible,
// empty/NA cells become the absent marker, and everything else stays a
// string.

use std::io::{Read, Write};
use std::path::Path;

use tracing::warn;

use crate::table::{Table, Value};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path}: {message}")]
    Malformed { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Reader-based implementations (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn read_table_from_reader<R: Read>(rdr: R) -> Result<Table, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for result in reader.records() {
        match result {
            Ok(record) => {
                if record.len() != table.n_cols() {
                    warn!(
                        "skipping row with {} fields (expected {})",
                        record.len(),
                        table.n_cols()
                    );
                    continue;
                }
                table.push_row(record.iter().map(Value::from_csv_field).collect());
            }
            Err(e) => {
                warn!("skipping malformed CSV row: {}", e);
            }
        }
    }
    Ok(table)
}

fn write_table_to_writer<W: Write>(table: &Table, wtr: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Public path-based API
// ---------------------------------------------------------------------------

/// Read a delimited file into a Table. The first row names the columns.
pub fn read_table(path: &Path) -> Result<Table, CsvError> {
    let file = std::fs::File::open(path).map_err(|e| CsvError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let table = read_table_from_reader(file).map_err(|e| CsvError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if table.n_cols() == 0 {
        return Err(CsvError::Malformed {
            path: path.display().to_string(),
            message: "file has no header row".into(),
        });
    }
    Ok(table)
}

/// Write a Table to a delimited file with a header row. Absent cells are
/// written as empty fields.
pub fn write_table(table: &Table, path: &Path) -> Result<(), CsvError> {
    let file = std::fs::File::create(path).map_err(|e| CsvError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_table_to_writer(table, file).map_err(|e| CsvError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
