//! Configuration parsing and validation.
//!
//! Every field is checked before a run starts so a bad config fails fast
//! with a `ConfigMissing`/`ConfigInvalid` error instead of partway through
//! the pipeline.

use crate::domain::allocation::DEFAULT_MAX_POSITIONS;
use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TrendTraderError;
use crate::domain::ewmac::DEFAULT_PAIRS;
use crate::domain::metrics::{DEFAULT_RISK_FREE_RATE, DEFAULT_VAR_CONFIDENCE};
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, Weekday};
use std::path::PathBuf;

/// `[data]` section: where prices come from and which codes to load.
#[derive(Debug, Clone)]
pub struct DataSettings {
    pub csv_dir: PathBuf,
    pub codes: String,
}

pub fn load_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, TrendTraderError> {
    let csv_dir = require_string(config, "data", "csv_dir")?;
    let codes = require_string(config, "data", "codes")?;
    Ok(DataSettings {
        csv_dir: PathBuf::from(csv_dir),
        codes,
    })
}

/// Build a validated [`BacktestConfig`] from the `[backtest]` and
/// `[strategy]` sections. `end_date` defaults to today when omitted.
pub fn load_backtest_config(
    config: &dyn ConfigPort,
) -> Result<BacktestConfig, TrendTraderError> {
    let start_date = parse_date(
        require_string(config, "backtest", "start_date")?.as_str(),
        "start_date",
    )?;
    let end_date = match config.get_string("backtest", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => chrono::Local::now().date_naive(),
    };
    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }

    let risk_free_rate = config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE);
    if !(0.0..1.0).contains(&risk_free_rate) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }

    let var_confidence = config.get_double("backtest", "var_confidence", DEFAULT_VAR_CONFIDENCE);
    if !(0.0..1.0).contains(&var_confidence) || var_confidence == 0.0 {
        return Err(invalid(
            "backtest",
            "var_confidence",
            "var_confidence must be in (0, 1)",
        ));
    }

    let max_positions = config.get_int("strategy", "max_positions", DEFAULT_MAX_POSITIONS as i64);
    if max_positions < 1 {
        return Err(invalid(
            "strategy",
            "max_positions",
            "max_positions must be at least 1",
        ));
    }

    let oscillator_pairs = match config.get_string("strategy", "oscillator_pairs") {
        Some(s) => parse_oscillator_pairs(&s)?,
        None => DEFAULT_PAIRS.to_vec(),
    };

    let rebalance_weekday = match config.get_string("strategy", "rebalance_weekday") {
        Some(s) => s.parse::<Weekday>().map_err(|_| {
            invalid(
                "strategy",
                "rebalance_weekday",
                "expected a weekday name such as monday",
            )
        })?,
        None => Weekday::Mon,
    };

    Ok(BacktestConfig {
        start_date,
        end_date,
        oscillator_pairs,
        max_positions: max_positions as usize,
        risk_free_rate,
        var_confidence,
        rebalance_weekday,
        causal_entries: config.get_bool("strategy", "causal_entries", false),
    })
}

/// Parse `"4:16,8:32"` into (short, long) pairs.
///
/// Each short period needs at least two observations for the sample
/// stddev, and must be below its long period.
pub fn parse_oscillator_pairs(input: &str) -> Result<Vec<(usize, usize)>, TrendTraderError> {
    let mut pairs = Vec::new();

    for token in input.split(',') {
        let token = token.trim();
        let (short, long) = token.split_once(':').ok_or_else(|| {
            invalid(
                "strategy",
                "oscillator_pairs",
                &format!("expected short:long, got '{}'", token),
            )
        })?;
        let short: usize = short.trim().parse().map_err(|_| {
            invalid(
                "strategy",
                "oscillator_pairs",
                &format!("invalid short period '{}'", short),
            )
        })?;
        let long: usize = long.trim().parse().map_err(|_| {
            invalid(
                "strategy",
                "oscillator_pairs",
                &format!("invalid long period '{}'", long),
            )
        })?;
        if short < 2 {
            return Err(invalid(
                "strategy",
                "oscillator_pairs",
                "short period must be at least 2",
            ));
        }
        if short >= long {
            return Err(invalid(
                "strategy",
                "oscillator_pairs",
                &format!("short period {} must be below long period {}", short, long),
            ));
        }
        pairs.push((short, long));
    }

    if pairs.is_empty() {
        return Err(invalid(
            "strategy",
            "oscillator_pairs",
            "at least one short:long pair is required",
        ));
    }
    Ok(pairs)
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, TrendTraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(TrendTraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, TrendTraderError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            field,
            &format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn invalid(section: &str, key: &str, reason: &str) -> TrendTraderError {
    TrendTraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[data]
csv_dir = /var/prices
codes = RELIANCE,TCS,INFY

[backtest]
start_date = 2022-01-01
end_date = 2024-12-31
risk_free_rate = 0.02
var_confidence = 0.95

[strategy]
oscillator_pairs = 4:16,8:32
max_positions = 10
rebalance_weekday = monday
causal_entries = false
"#;

    #[test]
    fn valid_config_passes() {
        let config = make_config(VALID);
        let settings = load_data_settings(&config).unwrap();
        assert_eq!(settings.codes, "RELIANCE,TCS,INFY");

        let bt = load_backtest_config(&config).unwrap();
        assert_eq!(bt.oscillator_pairs, vec![(4, 16), (8, 32)]);
        assert_eq!(bt.max_positions, 10);
        assert_eq!(bt.rebalance_weekday, Weekday::Mon);
        assert!(!bt.causal_entries);
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config = make_config(
            "[data]\ncsv_dir = /p\ncodes = AAA\n\n[backtest]\nstart_date = 2022-01-01\nend_date = 2024-01-01\n",
        );
        let bt = load_backtest_config(&config).unwrap();
        assert_eq!(bt.oscillator_pairs, DEFAULT_PAIRS.to_vec());
        assert_eq!(bt.max_positions, DEFAULT_MAX_POSITIONS);
        assert_eq!(bt.risk_free_rate, DEFAULT_RISK_FREE_RATE);
        assert_eq!(bt.var_confidence, DEFAULT_VAR_CONFIDENCE);
        assert_eq!(bt.rebalance_weekday, Weekday::Mon);
    }

    #[test]
    fn missing_start_date_fails() {
        let config = make_config("[backtest]\nend_date = 2024-01-01\n");
        let err = load_backtest_config(&config).unwrap_err();
        assert!(matches!(err, TrendTraderError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn bad_date_format_fails() {
        let config = make_config("[backtest]\nstart_date = 2022/01/01\nend_date = 2024-01-01\n");
        let err = load_backtest_config(&config).unwrap_err();
        assert!(matches!(err, TrendTraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn inverted_dates_fail() {
        let config = make_config("[backtest]\nstart_date = 2024-01-01\nend_date = 2022-01-01\n");
        let err = load_backtest_config(&config).unwrap_err();
        assert!(matches!(err, TrendTraderError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn risk_free_rate_out_of_range_fails() {
        let config = make_config(
            "[backtest]\nstart_date = 2022-01-01\nend_date = 2024-01-01\nrisk_free_rate = 1.5\n",
        );
        let err = load_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, TrendTraderError::ConfigInvalid { key, .. } if key == "risk_free_rate")
        );
    }

    #[test]
    fn max_positions_zero_fails() {
        let config = make_config(
            "[backtest]\nstart_date = 2022-01-01\nend_date = 2024-01-01\n\n[strategy]\nmax_positions = 0\n",
        );
        let err = load_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, TrendTraderError::ConfigInvalid { key, .. } if key == "max_positions")
        );
    }

    #[test]
    fn weekday_parses_case_insensitive() {
        let config = make_config(
            "[backtest]\nstart_date = 2022-01-01\nend_date = 2024-01-01\n\n[strategy]\nrebalance_weekday = Friday\n",
        );
        let bt = load_backtest_config(&config).unwrap();
        assert_eq!(bt.rebalance_weekday, Weekday::Fri);
    }

    #[test]
    fn bad_weekday_fails() {
        let config = make_config(
            "[backtest]\nstart_date = 2022-01-01\nend_date = 2024-01-01\n\n[strategy]\nrebalance_weekday = someday\n",
        );
        let err = load_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, TrendTraderError::ConfigInvalid { key, .. } if key == "rebalance_weekday")
        );
    }

    #[test]
    fn missing_csv_dir_fails() {
        let config = make_config("[data]\ncodes = AAA\n");
        let err = load_data_settings(&config).unwrap_err();
        assert!(matches!(err, TrendTraderError::ConfigMissing { key, .. } if key == "csv_dir"));
    }

    #[test]
    fn parse_pairs_basic() {
        assert_eq!(
            parse_oscillator_pairs("4:16, 8:32").unwrap(),
            vec![(4, 16), (8, 32)]
        );
    }

    #[test]
    fn parse_pairs_single() {
        assert_eq!(parse_oscillator_pairs("2:64").unwrap(), vec![(2, 64)]);
    }

    #[test]
    fn parse_pairs_rejects_short_ge_long() {
        assert!(parse_oscillator_pairs("16:4").is_err());
        assert!(parse_oscillator_pairs("8:8").is_err());
    }

    #[test]
    fn parse_pairs_rejects_short_below_two() {
        assert!(parse_oscillator_pairs("1:16").is_err());
    }

    #[test]
    fn parse_pairs_rejects_garbage() {
        assert!(parse_oscillator_pairs("four:sixteen").is_err());
        assert!(parse_oscillator_pairs("4-16").is_err());
        assert!(parse_oscillator_pairs("").is_err());
    }
}
