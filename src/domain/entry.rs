//! Signal entry-date tracking.
//!
//! For each asset, the entry date is the earliest date at which the buy
//! signal is true anywhere in the observed window; assets that never signal
//! get `None` and are excluded from allocation. The batch variant scans the
//! whole history once; the causal variant only looks at rows up to a cutoff,
//! for backtests that must not see future signal information.

use crate::domain::ewmac::SignalTable;
use chrono::NaiveDate;

/// Asset code paired with its first-signal date, in price-table column order.
pub type EntryDates = Vec<(String, Option<NaiveDate>)>;

pub fn compute_entry_dates(signal: &SignalTable) -> EntryDates {
    compute_entry_dates_impl(signal, None)
}

/// Causal variant: ignores signal rows after `cutoff`.
pub fn compute_entry_dates_through(signal: &SignalTable, cutoff: NaiveDate) -> EntryDates {
    compute_entry_dates_impl(signal, Some(cutoff))
}

fn compute_entry_dates_impl(signal: &SignalTable, cutoff: Option<NaiveDate>) -> EntryDates {
    let dates = signal.dates();
    let limit = match cutoff {
        Some(c) => dates.partition_point(|d| *d <= c),
        None => dates.len(),
    };

    signal
        .assets()
        .iter()
        .enumerate()
        .map(|(asset_idx, code)| {
            let first = signal.column(asset_idx)[..limit]
                .iter()
                .position(|&buy| buy)
                .map(|i| dates[i]);
            (code.clone(), first)
        })
        .collect()
}
