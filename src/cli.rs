//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{load_backtest_config, load_data_settings};
use crate::domain::error::TrendTraderError;
use crate::domain::universe::{load_universe, parse_codes};
use crate::ports::data_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "trendtrader", about = "EWMAC trend-following portfolio backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the EWMAC backtest and print the metrics report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the equity curve as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override [backtest] start_date
        #[arg(long)]
        start: Option<String>,
        /// Override [backtest] end_date
        #[arg(long)]
        end: Option<String>,
    },
    /// List asset codes available in the configured price directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            start,
            end,
        } => run_backtest_command(&config, output.as_deref(), start.as_deref(), end.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TrendTraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn parse_override(value: &str, field: &str) -> Result<NaiveDate, TrendTraderError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| TrendTraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: field.to_string(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", field),
    })
}

fn run_backtest_command(
    config_path: &std::path::Path,
    output: Option<&std::path::Path>,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let outcome = (|| -> Result<(), TrendTraderError> {
        let mut backtest_config = load_backtest_config(&adapter)?;
        if let Some(s) = start_override {
            backtest_config.start_date = parse_override(s, "start_date")?;
        }
        if let Some(s) = end_override {
            backtest_config.end_date = parse_override(s, "end_date")?;
        }

        let data = load_data_settings(&adapter)?;
        let codes = parse_codes(&data.codes).map_err(|e| TrendTraderError::ConfigInvalid {
            section: "data".to_string(),
            key: "codes".to_string(),
            reason: e.to_string(),
        })?;

        eprintln!(
            "Loading {} codes from {}",
            codes.len(),
            data.csv_dir.display()
        );
        let data_port = CsvAdapter::new(data.csv_dir);
        let universe = load_universe(
            &data_port,
            codes,
            backtest_config.start_date,
            backtest_config.end_date,
        )?;

        eprintln!(
            "Running backtest over {} trading dates, {} assets",
            universe.prices.n_dates(),
            universe.prices.n_assets()
        );
        let result = run_backtest(&universe.prices, &backtest_config);

        TextReportAdapter.write(&result, &backtest_config)?;
        if let Some(path) = output {
            TextReportAdapter::export_equity_csv(path, &result.equity_curve)?;
            eprintln!("Equity curve written to {}", path.display());
        }
        Ok(())
    })();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_list_symbols(config_path: &std::path::Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let outcome = (|| -> Result<(), TrendTraderError> {
        let data = load_data_settings(&adapter)?;
        let data_port = CsvAdapter::new(data.csv_dir);
        for code in data_port.list_symbols()? {
            println!("{}", code);
        }
        Ok(())
    })();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_validate(config_path: &std::path::Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let outcome = load_backtest_config(&adapter)
        .map(|_| ())
        .and_then(|_| load_data_settings(&adapter).map(|_| ()));

    match outcome {
        Ok(()) => {
            eprintln!("Config OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
