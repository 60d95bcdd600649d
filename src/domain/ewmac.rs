//! EWMAC momentum oscillator and buy-signal derivation.
//!
//! EWMAC(s,l) = (EMA(s) - EMA(l)) / rolling sample stddev over s closes,
//! evaluated causally. EMA uses k = 2/(n+1) seeded at the first close (plain
//! recursive smoothing, no adjust correction). Cells are `None` until the
//! stddev window fills, and wherever the stddev is zero.
//!
//! The buy signal is the conjunction of "oscillator defined and > 0" across
//! every configured (short, long) pair.

use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;

/// Default oscillator parameterizations: EWMAC(4,16) and EWMAC(8,32).
pub const DEFAULT_PAIRS: [(usize, usize); 2] = [(4, 16), (8, 32)];

#[derive(Debug, Clone)]
pub struct OscillatorTable {
    pub short_period: usize,
    pub long_period: usize,
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    // column-major: columns[asset][date index]
    columns: Vec<Vec<Option<f64>>>,
}

impl OscillatorTable {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn value(&self, date_idx: usize, asset_idx: usize) -> Option<f64> {
        self.columns[asset_idx][date_idx]
    }
}

#[derive(Debug, Clone)]
pub struct SignalTable {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    columns: Vec<Vec<bool>>,
}

impl SignalTable {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn is_buy(&self, date_idx: usize, asset_idx: usize) -> bool {
        self.columns[asset_idx][date_idx]
    }

    pub fn column(&self, asset_idx: usize) -> &[bool] {
        &self.columns[asset_idx]
    }
}

/// Recursive EMA seeded at the first observation.
fn recursive_ema(closes: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len());
    let mut ema = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        ema = if i == 0 {
            close
        } else {
            close * k + ema * (1.0 - k)
        };
        out.push(ema);
    }

    out
}

/// Trailing sample standard deviation (ddof = 1), min_periods = window.
///
/// `None` for the first window-1 observations and for windows shorter than
/// two observations, where the sample estimator is undefined.
fn rolling_sample_std(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window < 2 {
        return out;
    }

    for i in (window - 1)..closes.len() {
        let slice = &closes[i + 1 - window..=i];
        let mean: f64 = slice.iter().sum::<f64>() / window as f64;
        let variance: f64 = slice
            .iter()
            .map(|c| {
                let diff = c - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;
        out[i] = Some(variance.sqrt());
    }

    out
}

pub fn compute_ewmac(prices: &PriceTable, short_period: usize, long_period: usize) -> OscillatorTable {
    let mut columns = Vec::with_capacity(prices.n_assets());

    for asset_idx in 0..prices.n_assets() {
        let closes = prices.column(asset_idx);
        let short_ema = recursive_ema(closes, short_period);
        let long_ema = recursive_ema(closes, long_period);
        let std = rolling_sample_std(closes, short_period);

        let column: Vec<Option<f64>> = (0..closes.len())
            .map(|i| match std[i] {
                Some(s) if s > 0.0 => Some((short_ema[i] - long_ema[i]) / s),
                // zero dispersion: division is undefined, not zero
                _ => None,
            })
            .collect();
        columns.push(column);
    }

    OscillatorTable {
        short_period,
        long_period,
        dates: prices.dates().to_vec(),
        assets: prices.assets().to_vec(),
        columns,
    }
}

/// AND over all oscillators of "defined and strictly positive".
///
/// An undefined oscillator cell makes the signal false at that cell. All
/// tables must share the shape of the price table they were computed from.
pub fn compute_signal(oscillators: &[OscillatorTable]) -> SignalTable {
    let Some(first) = oscillators.first() else {
        return SignalTable {
            dates: Vec::new(),
            assets: Vec::new(),
            columns: Vec::new(),
        };
    };

    let n_dates = first.dates.len();
    let n_assets = first.assets.len();
    let mut columns = Vec::with_capacity(n_assets);

    for asset_idx in 0..n_assets {
        let column: Vec<bool> = (0..n_dates)
            .map(|date_idx| {
                oscillators
                    .iter()
                    .all(|osc| matches!(osc.value(date_idx, asset_idx), Some(v) if v > 0.0))
            })
            .collect();
        columns.push(column);
    }

    SignalTable {
        dates: first.dates.clone(),
        assets: first.assets.clone(),
        columns,
    }
}
