//! Console report adapter.
//!
//! Renders the metrics block and the latest allocation the way the
//! strategy's research notebooks print them: Sharpe as a 2-decimal fixed
//! number, drawdown/VaR/CAGR as 2-decimal percentages, and one
//! `CODE  xx.xx%` line per asset in the latest row. Undefined metrics print as
//! "undefined". Optionally exports the equity curve as CSV for charting.

use crate::domain::backtest::{BacktestConfig, BacktestResult, EquityPoint};
use crate::domain::error::TrendTraderError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn format_report(result: &BacktestResult, config: &BacktestConfig) -> String {
        let metrics = &result.metrics;
        let mut out = String::new();

        out.push_str(&format!(
            "Sharpe Ratio: {}\n",
            format_scalar(metrics.sharpe_ratio)
        ));
        out.push_str(&format!(
            "Maximum Drawdown: {}\n",
            format_pct(Some(metrics.max_drawdown))
        ));
        out.push_str(&format!(
            "Value at Risk ({:.0}%): {}\n",
            config.var_confidence * 100.0,
            format_pct(metrics.value_at_risk)
        ));
        out.push_str(&format!("CAGR: {}\n", format_pct(metrics.cagr)));

        match result.weights.latest() {
            Some((date, row)) => {
                out.push_str(&format!("\nPortfolio Allocation on {}\n", date));
                for (code, weight) in result.weights.assets().iter().zip(row) {
                    out.push_str(&format!("  {:<12} {:>6.2}%\n", code, weight * 100.0));
                }
            }
            None => out.push_str("\nNo rebalance dates in the backtest window\n"),
        }

        out
    }

    /// Write the equity curve as `date,equity` rows for charting.
    pub fn export_equity_csv(
        path: &Path,
        equity_curve: &[EquityPoint],
    ) -> Result<(), TrendTraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| TrendTraderError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;

        wtr.write_record(["date", "equity"])
            .map_err(csv_write_error)?;
        for point in equity_curve {
            wtr.write_record([point.date.to_string(), format!("{:.6}", point.equity)])
                .map_err(csv_write_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
    ) -> Result<(), TrendTraderError> {
        print!("{}", Self::format_report(result, config));
        Ok(())
    }
}

fn csv_write_error(e: csv::Error) -> TrendTraderError {
    TrendTraderError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

fn format_scalar(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "undefined".to_string(),
    }
}

fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "undefined".to_string(),
    }
}
