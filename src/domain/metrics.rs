//! Risk and performance metrics.
//!
//! All functions are pure. Metrics whose formula can degenerate (zero
//! return variance, zero elapsed days) come back as `None` rather than
//! infinity, NaN, or a silent zero.

use crate::domain::backtest::{EquityPoint, ReturnPoint};
use chrono::NaiveDate;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.25;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub value_at_risk: Option<f64>,
    pub cagr: Option<f64>,
}

impl Metrics {
    pub fn compute(
        returns: &[ReturnPoint],
        equity_curve: &[EquityPoint],
        annual_risk_free: f64,
        confidence: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let values: Vec<f64> = returns.iter().map(|p| p.value).collect();
        let final_equity = equity_curve.last().map(|p| p.equity);

        Metrics {
            sharpe_ratio: sharpe_ratio(&values, annual_risk_free),
            max_drawdown: max_drawdown(equity_curve),
            value_at_risk: value_at_risk(&values, confidence),
            cagr: final_equity.and_then(|e| cagr(e, start_date, end_date)),
        }
    }
}

/// Annualized Sharpe ratio against a daily-scaled risk-free rate.
///
/// `None` with fewer than two observations or zero sample variance.
pub fn sharpe_ratio(returns: &[f64], annual_risk_free: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return None;
    }

    let excess = mean - annual_risk_free / TRADING_DAYS_PER_YEAR;
    Some(excess / stddev * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Worst peak-to-trough decline relative to the running maximum. Always <= 0.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (point.equity - peak) / peak;
            if dd < worst {
                worst = dd;
            }
        }
    }

    worst
}

/// (1 - confidence) quantile of the return distribution, linearly
/// interpolated between order statistics. `None` for an empty series.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (1.0 - confidence) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Compound annual growth rate from the final equity multiple.
///
/// `None` when the window spans zero days.
pub fn cagr(final_equity: f64, start_date: NaiveDate, end_date: NaiveDate) -> Option<f64> {
    let days = (end_date - start_date).num_days();
    if days == 0 {
        return None;
    }

    Some(final_equity.powf(CALENDAR_DAYS_PER_YEAR / days as f64) - 1.0)
}
