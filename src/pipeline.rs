// Pipeline orchestration: compile per-position tables, run archetype rules,
// persist the results.
//
// All I/O happens here. The flow per position: read the base stats file,
// keep the planned columns, sort by player name, combine any positionally
// aligned companions, run the enrichment joins, then sort by ADP and drop
// players without one (no draft value, no archetype). Each archetype then
// classifies the compiled table and its survivors are written out.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::archetypes::{self, AlignedPlan, Archetype, PositionPlan};
use crate::config::Config;
use crate::engine::classify::{classify, UnknownColumnError};
use crate::engine::combine::{combine_aligned, AlignmentError};
use crate::engine::join::{join, JoinSpec, SchemaError};
use crate::io::{read_table, write_table, CsvError};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumnError),

    #[error("{position} table has no column `{column}`")]
    MissingColumn { position: String, column: String },

    #[error("unknown archetype `{0}` in configuration")]
    UnknownArchetype(String),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("archetypes failed: {0}")]
    ArchetypesFailed(String),
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run the full pipeline for the configured season.
///
/// A classification failure is logged, skips that one archetype, and is
/// reported at the end; compile failures abort the run (every archetype for
/// that position would fail the same way).
pub fn run(config: &Config) -> Result<(), PipelineError> {
    let selected = select_archetypes(config)?;
    info!(
        "running {} archetype(s) for the {} season",
        selected.len(),
        config.year
    );

    fs::create_dir_all(&config.output_dir).map_err(|e| PipelineError::CreateDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let mut failed: Vec<&str> = Vec::new();
    for plan in archetypes::position_plans() {
        let wanted: Vec<&Archetype> = selected
            .iter()
            .filter(|a| a.position == plan.position)
            .collect();
        if wanted.is_empty() {
            continue;
        }

        let compiled = load_or_compile(config, plan)?;
        info!(
            "compiled {} table ready: {} players, {} columns",
            plan.position,
            compiled.n_rows(),
            compiled.n_cols()
        );

        for archetype in wanted {
            match classify(&compiled, &archetype.rule) {
                Ok(result) => {
                    let path = config.output_dir.join(archetype.output_file);
                    write_table(&result, &path)?;
                    info!(
                        "{}: {} player(s) -> {}",
                        archetype.name,
                        result.n_rows(),
                        path.display()
                    );
                }
                Err(e) => {
                    error!("{} failed: {}", archetype.name, e);
                    failed.push(archetype.name);
                }
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::ArchetypesFailed(failed.join(", ")))
    }
}

/// Resolve the configured archetype names against the registry. An empty
/// selection means everything.
fn select_archetypes(config: &Config) -> Result<Vec<Archetype>, PipelineError> {
    let all = archetypes::all_archetypes();
    if config.archetypes.is_empty() {
        return Ok(all);
    }
    let mut selected = Vec::with_capacity(config.archetypes.len());
    for name in &config.archetypes {
        let found = all
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| PipelineError::UnknownArchetype(name.clone()))?;
        selected.push(found.clone());
    }
    Ok(selected)
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Reuse an existing compiled table from the data directory, or build and
/// cache it.
fn load_or_compile(config: &Config, plan: &PositionPlan) -> Result<Table, PipelineError> {
    let compiled_path = config.data_dir.join(plan.compiled_file);
    if compiled_path.exists() {
        info!("reusing compiled table {}", compiled_path.display());
        return Ok(read_table(&compiled_path)?);
    }

    let table = compile_position(config, plan)?;
    write_table(&table, &compiled_path)?;
    info!("wrote compiled table {}", compiled_path.display());
    Ok(table)
}

/// Build one position's compiled table from the raw season files.
fn compile_position(config: &Config, plan: &PositionPlan) -> Result<Table, PipelineError> {
    let base = read_table(&config.data_dir.join(plan.stats_file))?;
    let mut table = select_columns(&base, plan.base_columns, plan.position)?;

    // Joins key off identifiers, but the combine path relies on every input
    // being sorted by the same display name.
    table = table.sorted_by_column(0);

    if !plan.aligned.is_empty() {
        let mut others = Vec::with_capacity(plan.aligned.len());
        for aligned in plan.aligned {
            others.push(load_aligned(config, aligned)?);
        }
        table = combine_aligned(&table, &others)?;
    }

    for plan_join in plan.joins {
        let source = read_table(&config.data_dir.join(plan_join.file))?;
        let spec = JoinSpec {
            source,
            match_column_in_source: plan_join.match_column_in_source.to_string(),
            value_column_in_source: plan_join.value_column_in_source.to_string(),
            output_column: plan_join.output_column.to_string(),
            match_column_in_target: plan_join.match_column_in_target.map(str::to_string),
        };
        table = join(&table, &spec)?;
    }

    // Players without an ADP have no draft value to analyze.
    let adp = table
        .column_index("ADP")
        .ok_or_else(|| PipelineError::MissingColumn {
            position: plan.position.to_string(),
            column: "ADP".to_string(),
        })?;
    table = table.sorted_by_column(adp);
    let dropped = table.rows().iter().filter(|r| r[adp].is_absent()).count();
    if dropped > 0 {
        warn!(
            "{}: dropping {} player(s) without an ADP",
            plan.position, dropped
        );
    }
    Ok(drop_absent_rows(&table, adp))
}

/// Read a positionally aligned companion file: sort it by its own name
/// column, then drop the identifier columns so only data columns are
/// appended.
fn load_aligned(config: &Config, plan: &AlignedPlan) -> Result<Table, PipelineError> {
    let table = read_table(&config.data_dir.join(plan.file))?;
    let sort_index =
        table
            .column_index(plan.sort_column)
            .ok_or_else(|| PipelineError::MissingColumn {
                position: plan.file.to_string(),
                column: plan.sort_column.to_string(),
            })?;
    Ok(drop_columns(&table.sorted_by_column(sort_index), plan.drop_columns))
}

// ---------------------------------------------------------------------------
// Table helpers
// ---------------------------------------------------------------------------

fn select_columns(
    table: &Table,
    names: &[&str],
    position: &str,
) -> Result<Table, PipelineError> {
    let mut indices = Vec::with_capacity(names.len());
    for name in names {
        let index = table
            .column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                position: position.to_string(),
                column: name.to_string(),
            })?;
        indices.push(index);
    }
    let mut out = Table::new(names.iter().map(|n| n.to_string()).collect());
    for row in table.rows() {
        out.push_row(indices.iter().map(|&i| row[i].clone()).collect());
    }
    Ok(out)
}

fn drop_columns(table: &Table, names: &[&str]) -> Table {
    let kept: Vec<usize> = (0..table.n_cols())
        .filter(|&i| !names.contains(&table.columns()[i].as_str()))
        .collect();
    let mut out = Table::new(kept.iter().map(|&i| table.columns()[i].clone()).collect());
    for row in table.rows() {
        out.push_row(kept.iter().map(|&i| row[i].clone()).collect());
    }
    out
}

fn drop_absent_rows(table: &Table, column: usize) -> Table {
    let mut out = Table::new(table.columns().to_vec());
    for row in table.rows() {
        if !row[column].is_absent() {
            out.push_row(row.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
