//! CSV file price adapter.
//!
//! One file per asset at `<base>/<CODE>.csv` with a `date,close` header,
//! dates in `YYYY-MM-DD`.

use crate::domain::error::TrendTraderError;
use crate::ports::data_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

impl PricePort for CsvAdapter {
    fn fetch_closes(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, TrendTraderError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| TrendTraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut closes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TrendTraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TrendTraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TrendTraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let close: f64 = record
                .get(1)
                .ok_or_else(|| TrendTraderError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| TrendTraderError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            if close <= 0.0 {
                return Err(TrendTraderError::Data {
                    reason: format!("non-positive close {} on {} for {}", close, date, code),
                });
            }

            closes.push((date, close));
        }

        closes.sort_by_key(|&(date, _)| date);
        Ok(closes)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendTraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TrendTraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TrendTraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
