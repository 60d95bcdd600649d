//! Core domain types and pipeline logic.

pub mod price_table;
pub mod universe;
pub mod ewmac;
pub mod entry;
pub mod schedule;
pub mod allocation;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
