#![allow(dead_code)]

use chrono::NaiveDate;
use trendtrader::domain::error::TrendTraderError;
use trendtrader::domain::price_table::PriceTable;
use trendtrader::ports::data_port::PricePort;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, code: &str, closes: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(code.to_string(), closes);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_closes(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, TrendTraderError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(TrendTraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|closes| {
                closes
                    .iter()
                    .filter(|(date, _)| *date >= start_date && *date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendTraderError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily closes starting at `start_date`, one per element of `closes`.
pub fn daily_closes(start_date: &str, closes: &[f64]) -> Vec<(NaiveDate, f64)> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| (start + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Accelerating uptrend: signals once the slow oscillator warms up.
pub fn trending_closes(count: usize, base: f64) -> Vec<f64> {
    (0..count).map(|i| base + (i * i) as f64 * 0.05).collect()
}

/// Steady decline with a small wobble: never signals.
pub fn falling_closes(count: usize, base: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base - i as f64 + ((i % 3) as f64) * 0.4)
        .collect()
}

pub fn make_prices(series: Vec<(&str, Vec<(NaiveDate, f64)>)>) -> PriceTable {
    PriceTable::from_columns(
        series
            .into_iter()
            .map(|(code, points)| (code.to_string(), points))
            .collect(),
    )
}
