//! Domain error types.

/// Top-level error type for trendtrader.
///
/// Undefined metrics (zero-variance Sharpe, zero-day CAGR) are not errors;
/// they surface as `None` in [`crate::domain::metrics::Metrics`].
#[derive(Debug, thiserror::Error)]
pub enum TrendTraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error("insufficient price data for {code}: have {rows} rows, need {minimum}")]
    InsufficientData {
        code: String,
        rows: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrendTraderError> for std::process::ExitCode {
    fn from(err: &TrendTraderError) -> Self {
        let code: u8 = match err {
            TrendTraderError::Io(_) => 1,
            TrendTraderError::ConfigParse { .. }
            | TrendTraderError::ConfigMissing { .. }
            | TrendTraderError::ConfigInvalid { .. } => 2,
            TrendTraderError::Data { .. } => 3,
            TrendTraderError::NoData { .. } | TrendTraderError::InsufficientData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
