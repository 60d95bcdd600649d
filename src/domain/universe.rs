//! Universe loading for multi-asset backtests.
//!
//! Parses asset code lists from configuration, fetches each asset's close
//! series through the data port, and assembles the gap-free [`PriceTable`].
//! Assets with no data or too little history are skipped with a warning.

use crate::domain::error::TrendTraderError;
use crate::domain::price_table::PriceTable;
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Longest default EWMAC lookback (32) plus one return observation.
pub const MIN_PRICE_ROWS: usize = 33;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if seen.contains(&code) {
            return Err(UniverseError::DuplicateCode(code));
        }
        seen.insert(code.clone());
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientRows { rows: usize },
}

pub struct UniverseResult {
    pub prices: PriceTable,
    pub skipped: Vec<SkippedCode>,
}

/// Fetch closes for every code and build the active price table.
///
/// Errors only when no code survives validation; individual failures are
/// downgraded to skips so a partial universe can still run.
pub fn load_universe(
    data_port: &dyn PricePort,
    codes: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<UniverseResult, TrendTraderError> {
    let mut columns = Vec::new();
    let mut skipped = Vec::new();

    for code in codes {
        let closes = match data_port.fetch_closes(&code, start_date, end_date) {
            Ok(points) => points,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", code, e);
                skipped.push(SkippedCode {
                    code,
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if closes.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", code);
            skipped.push(SkippedCode {
                code,
                reason: SkipReason::NoData,
            });
            continue;
        }

        if closes.len() < MIN_PRICE_ROWS {
            eprintln!(
                "Warning: skipping {} (only {} rows, minimum {} required)",
                code,
                closes.len(),
                MIN_PRICE_ROWS
            );
            skipped.push(SkippedCode {
                code,
                reason: SkipReason::InsufficientRows { rows: closes.len() },
            });
            continue;
        }

        eprintln!("  {}: {} rows [OK]", code, closes.len());
        columns.push((code, closes));
    }

    if columns.is_empty() {
        return Err(TrendTraderError::InsufficientData {
            code: "all".to_string(),
            rows: 0,
            minimum: MIN_PRICE_ROWS,
        });
    }

    if !skipped.is_empty() {
        eprintln!(
            "Backtesting {} of {} codes",
            columns.len(),
            columns.len() + skipped.len()
        );
    }

    Ok(UniverseResult {
        prices: PriceTable::from_columns(columns),
        skipped,
    })
}
