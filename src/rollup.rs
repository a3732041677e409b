use crate::billing::compute_monthly_billing;
use crate::periods::{billing_month_of, cycle_window, default_actuals};
use crate::schema::{BillingPeriod, Contract};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One column of the rollup table: a billing month, or the quarter summary
/// emitted after March, June, September and December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollupColumn {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
}

impl RollupColumn {
    pub fn label(&self) -> String {
        match self {
            RollupColumn::Month { year, month } => format!("{:04}-{:02}", year, month),
            RollupColumn::Quarter { year, quarter } => format!("Q{} {:04}", quarter, year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub manager: String,
    /// One cell per column, aligned with `RollupTable::columns`.
    pub cells: Vec<f64>,
}

/// Portfolio-level billing table: one row per owning (client-side) manager,
/// month and quarter columns across the union of all contract spans, and a
/// grand-total row summed over managers. Amounts are in source currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupTable {
    pub columns: Vec<RollupColumn>,
    pub rows: Vec<RollupRow>,
    pub grand_total: Vec<f64>,
}

impl RollupTable {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            grand_total: Vec::new(),
        }
    }
}

/// Sums expected monthly billing across contracts, grouped by client-side
/// manager. A contract contributes to a month when its span overlaps that
/// month's 26th-to-25th window; the contribution uses default actuals (no
/// holidays, nominal resources, no leave) since portfolio reporting runs
/// ahead of per-period data entry. Quarter columns are running sums of the
/// months since the last quarter boundary, reset after each emission.
pub fn aggregate_by_manager(contracts: &[Contract]) -> RollupTable {
    let Some(first) = contracts.first() else {
        return RollupTable::empty();
    };

    let overall_start = contracts.iter().map(|c| c.start).min().unwrap_or(first.start);
    let overall_end = contracts.iter().map(|c| c.end).max().unwrap_or(first.end);

    // Columns span billing months, not calendar months: days on or after the
    // 26th fall in the next month's window, so the end date's billing month
    // can be one past its calendar month.
    let (first_year, first_month) = billing_month_of(overall_start);
    let (last_year, last_month) = billing_month_of(overall_end);
    let first_index = first_year * 12 + first_month as i32 - 1;
    let last_index = last_year * 12 + last_month as i32 - 1;
    let month_count = (last_index - first_index).max(0) as usize + 1;

    let months: Vec<(i32, u32)> = (0..month_count)
        .map(|i| {
            let absolute = first_index + i as i32;
            (absolute.div_euclid(12), absolute.rem_euclid(12) as u32 + 1)
        })
        .collect();

    // manager -> amount per month column
    let mut monthly: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for contract in contracts {
        let row = monthly
            .entry(contract.client_manager.clone())
            .or_insert_with(|| vec![0.0; months.len()]);
        let actuals = default_actuals(contract);

        for (idx, &(year, month)) in months.iter().enumerate() {
            let window = cycle_window(year, month);
            if window.overlap(&contract.span()).is_none() {
                continue;
            }

            let period = BillingPeriod {
                id: format!("{:04}-{:02}", year, month),
                start: window.start,
                end: window.end,
            };
            row[idx] += compute_monthly_billing(contract, &period, &actuals, None).expected_source;
        }
    }

    // Interleave quarter columns and build the final rows
    let mut columns = Vec::new();
    let mut quarter_positions = Vec::new();
    for (idx, &(year, month)) in months.iter().enumerate() {
        columns.push(RollupColumn::Month { year, month });
        if month % 3 == 0 {
            columns.push(RollupColumn::Quarter {
                year,
                quarter: month / 3,
            });
            quarter_positions.push(idx);
        }
    }

    let rows: Vec<RollupRow> = monthly
        .into_iter()
        .map(|(manager, cells)| RollupRow {
            manager,
            cells: interleave_quarters(&cells, &quarter_positions),
        })
        .collect();

    let mut grand_total = vec![0.0; columns.len()];
    for row in &rows {
        for (total, cell) in grand_total.iter_mut().zip(&row.cells) {
            *total += cell;
        }
    }

    RollupTable {
        columns,
        rows,
        grand_total,
    }
}

/// Expands a per-month series with quarter cells: each quarter cell is the
/// running sum of the months since the previous quarter boundary (or the
/// series start, for a leading partial quarter).
fn interleave_quarters(monthly: &[f64], quarter_positions: &[usize]) -> Vec<f64> {
    let mut cells = Vec::with_capacity(monthly.len() + quarter_positions.len());
    let mut running = 0.0;

    for (idx, &amount) in monthly.iter().enumerate() {
        cells.push(amount);
        running += amount;

        if quarter_positions.contains(&idx) {
            cells.push(running);
            running = 0.0;
        }
    }

    cells
}
