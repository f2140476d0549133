//! Pareto derivation: descending-amount sort plus cumulative percentage.

use std::cmp::Ordering;

use crate::error::Result;
use crate::ingest::{COL_DEPARTMENT, COL_SALES};
use crate::table::Table;

/// One row of the Pareto chart after sorting and accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoRow {
    pub category: String,
    pub amount: f64,
    /// Running share of the total, as a percentage rounded to 2 decimals.
    pub cumulative_pct: f64,
}

/// Sorts the Pareto table descending by amount and computes the cumulative
/// percentage column.
///
/// The sort is stable, so equal amounts keep their original row order and the
/// output is deterministic for identical input. When the amounts sum to zero
/// the share is undefined; every row then reports 0 instead of dividing by
/// zero.
pub fn derive(table: &Table) -> Result<Vec<ParetoRow>> {
    let cat_idx = table.require_column(COL_DEPARTMENT)?;
    let amount_idx = table.require_column(COL_SALES)?;

    let mut rows: Vec<(String, f64)> = table
        .rows
        .iter()
        .map(|row| {
            (
                row[cat_idx].display(),
                row[amount_idx].as_number().unwrap_or(0.0),
            )
        })
        .collect();

    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let total: f64 = rows.iter().map(|(_, amount)| amount).sum();
    let mut running = 0.0;

    Ok(rows
        .into_iter()
        .map(|(category, amount)| {
            running += amount;
            let cumulative_pct = if total == 0.0 {
                0.0
            } else {
                round2(running / total * 100.0)
            };
            ParetoRow {
                category,
                amount,
                cumulative_pct,
            }
        })
        .collect())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
