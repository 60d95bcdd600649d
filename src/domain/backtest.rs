//! Backtest engine: weight application and the full pipeline driver.
//!
//! [`simulate`] forward-fills rebalance rows onto trading dates, lags the
//! effective weight vector by one trading date, and dots it with realized
//! simple returns. The first trading date has no prior weight and is
//! excluded from the return series rather than reported as zero.

use crate::domain::allocation::{allocate, WeightTable, DEFAULT_MAX_POSITIONS};
use crate::domain::entry::{compute_entry_dates, compute_entry_dates_through, EntryDates};
use crate::domain::ewmac::{compute_ewmac, compute_signal, SignalTable, DEFAULT_PAIRS};
use crate::domain::metrics::{Metrics, DEFAULT_RISK_FREE_RATE, DEFAULT_VAR_CONFIDENCE};
use crate::domain::price_table::PriceTable;
use crate::domain::schedule::rebalance_schedule;
use chrono::{NaiveDate, Weekday};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// (short, long) EWMAC parameterizations, all AND-ed into one signal.
    pub oscillator_pairs: Vec<(usize, usize)>,
    pub max_positions: usize,
    pub risk_free_rate: f64,
    pub var_confidence: f64,
    pub rebalance_weekday: Weekday,
    /// Recompute entry dates per rebalance date instead of once over the
    /// whole window, eliminating the batch mode's look-ahead.
    pub causal_entries: bool,
}

impl BacktestConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            oscillator_pairs: DEFAULT_PAIRS.to_vec(),
            max_positions: DEFAULT_MAX_POSITIONS,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            rebalance_weekday: Weekday::Mon,
            causal_entries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub entry_dates: EntryDates,
    pub weights: WeightTable,
    pub returns: Vec<ReturnPoint>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: Metrics,
}

/// Apply lagged, forward-filled weights to realized returns.
///
/// The weight table's asset order must match the price table's. Trading
/// dates before the first rebalance row carry a zero weight vector.
pub fn simulate(
    weights: &WeightTable,
    prices: &PriceTable,
) -> (Vec<ReturnPoint>, Vec<EquityPoint>) {
    let dates = prices.dates();
    let n_assets = prices.n_assets();
    let zero_row = vec![0.0; n_assets];

    let mut returns = Vec::new();
    let mut equity_curve = Vec::new();
    let mut equity = 1.0;
    // rows with rebalance date <= the date being looked back at
    let mut applied = 0usize;

    for t in 1..dates.len() {
        let prior_date = dates[t - 1];
        while applied < weights.n_rows() && weights.dates()[applied] <= prior_date {
            applied += 1;
        }
        let row = if applied == 0 {
            zero_row.as_slice()
        } else {
            weights.row(applied - 1)
        };

        let mut value = 0.0;
        for asset_idx in 0..n_assets {
            value += row[asset_idx] * prices.simple_return(t, asset_idx);
        }

        equity *= 1.0 + value;
        returns.push(ReturnPoint {
            date: dates[t],
            value,
        });
        equity_curve.push(EquityPoint {
            date: dates[t],
            equity,
        });
    }

    (returns, equity_curve)
}

/// One allocation row per schedule date, assembled append-only.
pub fn build_weight_table(
    signal: &SignalTable,
    schedule: &[NaiveDate],
    config: &BacktestConfig,
) -> (EntryDates, WeightTable) {
    let entry_dates = compute_entry_dates(signal);
    let mut table = WeightTable::new(signal.assets().to_vec());

    for &rebalance_date in schedule {
        let row = if config.causal_entries {
            let causal = compute_entry_dates_through(signal, rebalance_date);
            allocate(&causal, rebalance_date, config.max_positions)
        } else {
            allocate(&entry_dates, rebalance_date, config.max_positions)
        };
        table.push_row(rebalance_date, row);
    }

    (entry_dates, table)
}

/// Run the whole pipeline: oscillators, signal, entries, weekly weights,
/// simulation, metrics.
pub fn run_backtest(prices: &PriceTable, config: &BacktestConfig) -> BacktestResult {
    let oscillators: Vec<_> = config
        .oscillator_pairs
        .iter()
        .map(|&(short, long)| compute_ewmac(prices, short, long))
        .collect();
    let signal = compute_signal(&oscillators);

    let schedule = rebalance_schedule(
        config.start_date,
        config.end_date,
        config.rebalance_weekday,
    );
    let (entry_dates, weights) = build_weight_table(&signal, &schedule, config);

    let (returns, equity_curve) = simulate(&weights, prices);
    let metrics = Metrics::compute(
        &returns,
        &equity_curve,
        config.risk_free_rate,
        config.var_confidence,
        config.start_date,
        config.end_date,
    );

    BacktestResult {
        entry_dates,
        weights,
        returns,
        equity_curve,
        metrics,
    }
}
