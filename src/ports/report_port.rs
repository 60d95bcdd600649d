//! Report generation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TrendTraderError;

/// Port for rendering a finished backtest.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
    ) -> Result<(), TrendTraderError>;
}
