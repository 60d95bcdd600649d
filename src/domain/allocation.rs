//! Freshness-ranked portfolio allocation.
//!
//! On each rebalance date, eligible assets (entered on or before the date)
//! are ranked by age in whole weeks since their signal entry, youngest
//! first. At most `max_positions` are kept, raw-weighted 1/(age+1) and
//! normalized to sum to one. An empty selection yields an all-zero row.

use crate::domain::entry::EntryDates;
use chrono::NaiveDate;

pub const DEFAULT_MAX_POSITIONS: usize = 10;

/// Rebalance-date-by-asset weight matrix, one row per rebalance date.
///
/// Assembled append-only: rows are pushed in schedule order and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct WeightTable {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    // row-major: rows[rebalance index][asset index]
    rows: Vec<Vec<f64>>,
}

impl WeightTable {
    pub fn new(assets: Vec<String>) -> Self {
        Self {
            dates: Vec::new(),
            assets,
            rows: Vec::new(),
        }
    }

    /// Append one rebalance row. Dates must arrive in ascending order and
    /// the row must cover every asset.
    pub fn push_row(&mut self, date: NaiveDate, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.assets.len());
        debug_assert!(self.dates.last().is_none_or(|last| *last < date));
        self.dates.push(date);
        self.rows.push(row);
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> &[f64] {
        &self.rows[idx]
    }

    pub fn latest(&self) -> Option<(NaiveDate, &[f64])> {
        let row = self.rows.last()?;
        Some((*self.dates.last()?, row.as_slice()))
    }
}

/// One normalized weight row for `as_of`, aligned with `entry_dates` order.
///
/// Assets with no entry date, or an entry date after `as_of`, are not yet
/// eligible and get weight zero. Ties in age keep the entry-list order, so
/// output is deterministic for a fixed universe ordering.
pub fn allocate(entry_dates: &EntryDates, as_of: NaiveDate, max_positions: usize) -> Vec<f64> {
    let mut eligible: Vec<(usize, i64)> = entry_dates
        .iter()
        .enumerate()
        .filter_map(|(idx, (_, entry))| match entry {
            Some(e) if *e <= as_of => {
                // whole weeks, floored like Python's integer division
                Some((idx, (as_of - *e).num_days().div_euclid(7)))
            }
            _ => None,
        })
        .collect();

    eligible.sort_by_key(|&(_, age)| age);
    eligible.truncate(max_positions);

    let mut weights = vec![0.0; entry_dates.len()];
    let total: f64 = eligible
        .iter()
        .map(|&(_, age)| 1.0 / (age as f64 + 1.0))
        .sum();
    if total > 0.0 {
        for &(idx, age) in &eligible {
            weights[idx] = 1.0 / (age as f64 + 1.0) / total;
        }
    }
    weights
}
