//! Adjusted-close price table: ascending unique dates by asset codes.
//!
//! The table is gap-free by construction: [`PriceTable::from_columns`] keeps
//! only dates present in every asset's series, so downstream stages never
//! see a missing (date, asset) cell. Immutable once built.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    // column-major: columns[asset][date index]
    columns: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Build a table from per-asset (date, close) series.
    ///
    /// Dates missing from any asset are dropped wholesale (row-wise dropna),
    /// duplicates within one series keep the last observation, and the
    /// surviving dates are sorted ascending. Asset order is preserved as
    /// given; it is the tie-break order used by the allocator.
    pub fn from_columns(series: Vec<(String, Vec<(NaiveDate, f64)>)>) -> Self {
        if series.is_empty() {
            return Self {
                dates: Vec::new(),
                assets: Vec::new(),
                columns: Vec::new(),
            };
        }

        let maps: Vec<std::collections::BTreeMap<NaiveDate, f64>> = series
            .iter()
            .map(|(_, points)| points.iter().copied().collect())
            .collect();

        let dates: Vec<NaiveDate> = maps[0]
            .keys()
            .filter(|d| maps[1..].iter().all(|m| m.contains_key(*d)))
            .copied()
            .collect();

        let assets: Vec<String> = series.into_iter().map(|(code, _)| code).collect();
        let columns: Vec<Vec<f64>> = maps
            .iter()
            .map(|m| dates.iter().map(|d| m[d]).collect())
            .collect();

        Self {
            dates,
            assets,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.assets.is_empty()
    }

    pub fn close(&self, date_idx: usize, asset_idx: usize) -> f64 {
        self.columns[asset_idx][date_idx]
    }

    pub fn column(&self, asset_idx: usize) -> &[f64] {
        &self.columns[asset_idx]
    }

    /// Simple return close[t]/close[t-1] - 1. Requires `date_idx >= 1`.
    pub fn simple_return(&self, date_idx: usize, asset_idx: usize) -> f64 {
        let col = &self.columns[asset_idx];
        col[date_idx] / col[date_idx - 1] - 1.0
    }
}
