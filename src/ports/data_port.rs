//! Price data access port trait.

use crate::domain::error::TrendTraderError;
use chrono::NaiveDate;

/// Supplier of adjusted-close series, one asset at a time.
///
/// Returned points need not be sorted or gap-free; the universe loader
/// aligns and cleans them when assembling the price table.
pub trait PricePort {
    fn fetch_closes(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, TrendTraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, TrendTraderError>;
}
