//! Property tests for the allocator and metric invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use trendtrader::domain::allocation::allocate;
use trendtrader::domain::entry::EntryDates;
use trendtrader::domain::metrics::{max_drawdown, value_at_risk};
use trendtrader::domain::backtest::EquityPoint;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

fn entries_from_offsets(offsets: &[Option<u16>]) -> EntryDates {
    offsets
        .iter()
        .enumerate()
        .map(|(i, offset)| {
            (
                format!("A{:03}", i),
                offset.map(|days| base_date() + chrono::Duration::days(days as i64)),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn weights_normalized_and_capped(
        offsets in prop::collection::vec(prop::option::of(0u16..700), 1..40),
        as_of_offset in 0u16..700,
        max_positions in 1usize..15,
    ) {
        let entry_dates = entries_from_offsets(&offsets);
        let as_of = base_date() + chrono::Duration::days(as_of_offset as i64);
        let weights = allocate(&entry_dates, as_of, max_positions);

        prop_assert_eq!(weights.len(), entry_dates.len());

        let nonzero = weights.iter().filter(|w| **w > 0.0).count();
        prop_assert!(nonzero <= max_positions);

        let sum: f64 = weights.iter().sum();
        let eligible = offsets
            .iter()
            .flatten()
            .any(|days| *days as i64 <= (as_of - base_date()).num_days());
        if eligible {
            prop_assert!((sum - 1.0).abs() < 1e-9);
        } else {
            prop_assert_eq!(sum, 0.0);
        }

        prop_assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));
    }

    #[test]
    fn fresher_entries_never_get_less_weight(
        offsets in prop::collection::vec(0u16..700, 2..12),
    ) {
        let entry_dates = entries_from_offsets(
            &offsets.iter().map(|o| Some(*o)).collect::<Vec<_>>(),
        );
        let as_of = base_date() + chrono::Duration::days(800);
        let weights = allocate(&entry_dates, as_of, offsets.len());

        // later entry (larger offset) means smaller age, so weight must be >=
        for i in 0..offsets.len() {
            for j in 0..offsets.len() {
                if offsets[i] >= offsets[j] {
                    prop_assert!(weights[i] >= weights[j] - 1e-12);
                }
            }
        }
    }

    #[test]
    fn drawdown_is_never_positive(
        equity in prop::collection::vec(0.01f64..10.0, 0..60),
    ) {
        let curve: Vec<EquityPoint> = equity
            .iter()
            .enumerate()
            .map(|(i, &e)| EquityPoint {
                date: base_date() + chrono::Duration::days(i as i64),
                equity: e,
            })
            .collect();
        prop_assert!(max_drawdown(&curve) <= 0.0);
    }

    #[test]
    fn var_lies_within_observed_range(
        returns in prop::collection::vec(-0.2f64..0.2, 1..80),
    ) {
        let var = value_at_risk(&returns, 0.95).unwrap();
        let min = returns.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(var >= min - 1e-12);
        prop_assert!(var <= max + 1e-12);
    }
}
