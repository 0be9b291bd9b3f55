// The classification engine: declarative filter pipelines over a table.
//
// A ClassificationRule is pure data — derived-column expressions, an
// AND-chain of (possibly disjunctive) predicates, and an output projection.
// Applying one never mutates the input and never does I/O, so every
// archetype is just a value handed to `classify`.

use thiserror::Error;

use crate::table::{Table, Value};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("unknown column `{column}` referenced by {phase}")]
pub struct UnknownColumnError {
    pub column: String,
    /// Which phase referenced the column: "expression", "predicate", or
    /// "projection".
    pub phase: &'static str,
}

// ---------------------------------------------------------------------------
// Arithmetic expressions
// ---------------------------------------------------------------------------

/// Arithmetic over column references and literals.
///
/// Division by zero evaluates to NaN rather than erroring: a row with
/// incomplete source data silently fails any numeric predicate instead of
/// crashing the pipeline. Non-numeric and absent cells evaluate to NaN for
/// the same reason.
#[derive(Debug, Clone)]
pub enum Expr {
    Col(String),
    Lit(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

/// Column reference.
pub fn col(name: &str) -> Expr {
    Expr::Col(name.to_string())
}

/// Numeric literal.
pub fn lit(value: f64) -> Expr {
    Expr::Lit(value)
}

impl Expr {
    fn eval(&self, table: &Table, row: usize) -> f64 {
        match self {
            // Column existence is validated before evaluation, so a miss
            // here only means a non-numeric cell.
            Expr::Col(name) => table
                .column_index(name)
                .and_then(|i| table.rows()[row][i].as_num())
                .unwrap_or(f64::NAN),
            Expr::Lit(v) => *v,
            Expr::Add(a, b) => a.eval(table, row) + b.eval(table, row),
            Expr::Sub(a, b) => a.eval(table, row) - b.eval(table, row),
            Expr::Mul(a, b) => a.eval(table, row) * b.eval(table, row),
            Expr::Div(a, b) => {
                let denom = b.eval(table, row);
                if denom == 0.0 {
                    f64::NAN
                } else {
                    a.eval(table, row) / denom
                }
            }
        }
    }

    fn referenced_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Col(name) => out.push(name),
            Expr::Lit(_) => {}
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.referenced_columns(out);
                b.referenced_columns(out);
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

/// A named derived column computed from an expression.
#[derive(Debug, Clone)]
pub struct DerivedColumn {
    pub name: String,
    pub expr: Expr,
}

impl DerivedColumn {
    pub fn new(name: &str, expr: Expr) -> DerivedColumn {
        DerivedColumn {
            name: name.to_string(),
            expr,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Le,
    Ge,
    Eq,
}

/// One column-vs-literal comparison. Absent, non-numeric, and NaN cells
/// fail every comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub column: String,
    pub cmp: Cmp,
    pub value: f64,
}

/// `column <= value`
pub fn le(column: &str, value: f64) -> Comparison {
    Comparison {
        column: column.to_string(),
        cmp: Cmp::Le,
        value,
    }
}

/// `column >= value`
pub fn ge(column: &str, value: f64) -> Comparison {
    Comparison {
        column: column.to_string(),
        cmp: Cmp::Ge,
        value,
    }
}

/// `column == value`
pub fn eq(column: &str, value: f64) -> Comparison {
    Comparison {
        column: column.to_string(),
        cmp: Cmp::Eq,
        value,
    }
}

/// One predicate in a rule's filter chain: an OR over AND-clauses of
/// comparisons. Predicates in a chain compose as logical AND; OR exists
/// only within a single predicate's clause list.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub any_of: Vec<Vec<Comparison>>,
}

impl Predicate {
    /// A single comparison.
    pub fn single(comparison: Comparison) -> Predicate {
        Predicate {
            any_of: vec![vec![comparison]],
        }
    }

    /// A conjunction: every comparison must hold.
    pub fn all_of(clause: Vec<Comparison>) -> Predicate {
        Predicate {
            any_of: vec![clause],
        }
    }

    /// A disjunction of conjunctions: at least one clause must hold.
    pub fn any_of(clauses: Vec<Vec<Comparison>>) -> Predicate {
        Predicate { any_of: clauses }
    }
}

// ---------------------------------------------------------------------------
// ClassificationRule
// ---------------------------------------------------------------------------

/// A complete archetype definition: derived metrics, filter chain, and
/// output projection. Defined statically per archetype, applied once per
/// pipeline run, never mutated.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub name: String,
    pub derived: Vec<DerivedColumn>,
    pub predicates: Vec<Predicate>,
    pub projection: Vec<String>,
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Apply a classification rule to a table.
///
/// Derived columns evaluate left-to-right and may reference earlier derived
/// columns from the same rule. Rows failing any predicate in the chain are
/// dropped; survivors keep their original relative order. The result holds
/// exactly the projected columns, in projection order — derived columns
/// used only for filtering do not leak into the output.
///
/// An empty result (zero surviving rows) is valid and still carries the
/// projected schema.
pub fn classify(table: &Table, rule: &ClassificationRule) -> Result<Table, UnknownColumnError> {
    // Step 1: derived columns.
    let mut working = table.clone();
    for derived in &rule.derived {
        let mut referenced = Vec::new();
        derived.expr.referenced_columns(&mut referenced);
        for name in referenced {
            if working.column_index(name).is_none() {
                return Err(UnknownColumnError {
                    column: name.to_string(),
                    phase: "expression",
                });
            }
        }
        let values: Vec<Value> = (0..working.n_rows())
            .map(|row| Value::Num(derived.expr.eval(&working, row)))
            .collect();
        working.push_column(derived.name.clone(), values);
    }

    // Step 2: filtering. Column references are resolved per predicate before
    // any row is tested, so an unknown column fails fast even on an empty
    // table.
    let mut keep = vec![true; working.n_rows()];
    for predicate in &rule.predicates {
        let resolved = resolve_predicate(&working, predicate)?;
        for (row, kept) in keep.iter_mut().enumerate() {
            if *kept {
                *kept = eval_resolved(&working, row, &resolved);
            }
        }
    }

    // Step 3: projection.
    let mut indices = Vec::with_capacity(rule.projection.len());
    for name in &rule.projection {
        let index = working.column_index(name).ok_or_else(|| UnknownColumnError {
            column: name.clone(),
            phase: "projection",
        })?;
        indices.push(index);
    }

    let mut out = Table::new(rule.projection.clone());
    for (row, kept) in working.rows().iter().zip(&keep) {
        if *kept {
            out.push_row(indices.iter().map(|&i| row[i].clone()).collect());
        }
    }
    Ok(out)
}

/// A predicate with column names resolved to indices.
type ResolvedPredicate = Vec<Vec<(usize, Cmp, f64)>>;

fn resolve_predicate(
    table: &Table,
    predicate: &Predicate,
) -> Result<ResolvedPredicate, UnknownColumnError> {
    predicate
        .any_of
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|c| {
                    let index =
                        table
                            .column_index(&c.column)
                            .ok_or_else(|| UnknownColumnError {
                                column: c.column.clone(),
                                phase: "predicate",
                            })?;
                    Ok((index, c.cmp, c.value))
                })
                .collect()
        })
        .collect()
}

fn eval_resolved(table: &Table, row: usize, resolved: &ResolvedPredicate) -> bool {
    resolved.iter().any(|clause| {
        clause.iter().all(|&(index, cmp, threshold)| {
            match table.rows()[row][index].as_num() {
                // NaN comparisons are false, which is exactly the
                // disqualify-on-incomplete-data rule.
                Some(v) => match cmp {
                    Cmp::Le => v <= threshold,
                    Cmp::Ge => v >= threshold,
                    Cmp::Eq => v == threshold,
                },
                None => false,
            }
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
