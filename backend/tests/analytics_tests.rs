//! Analytics tests
//!
//! Covers turnover rate arithmetic, margin over landed cost and expiry
//! alert bucketing.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{classify_expiry, ExpirySeverity};
use shared::pricing::{
    clamp_to_minimum_margin, margin_percent, profit_per_unit, selling_price_for_margin,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Turnover formula used by the report: sold / (current + sold) * 100
fn turnover_rate(sold: i64, current_stock: i64) -> Decimal {
    let denominator = current_stock + sold;
    if denominator <= 0 {
        return Decimal::ZERO;
    }
    ((Decimal::from(sold) / Decimal::from(denominator)) * Decimal::from(100)).round_dp(2)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_turnover_rate_basics() {
        // Sold half of what the window started with
        assert_eq!(turnover_rate(50, 50), dec("50"));
        // Nothing sold
        assert_eq!(turnover_rate(0, 80), Decimal::ZERO);
        // Everything sold
        assert_eq!(turnover_rate(80, 0), dec("100"));
        // No stock and no sales
        assert_eq!(turnover_rate(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_margin_uses_landed_cost() {
        // landed = 10 + 2, selling 18 -> 50%
        assert_eq!(margin_percent(dec("10"), dec("2"), dec("18")), dec("50"));
        // Below landed cost the margin is negative
        assert!(margin_percent(dec("10"), dec("2"), dec("9")) < Decimal::ZERO);
    }

    #[test]
    fn test_margin_zero_cost_batches() {
        // Manual adjustment batches have no cost basis
        assert_eq!(margin_percent(dec("0"), dec("0"), dec("5")), Decimal::ZERO);
    }

    #[test]
    fn test_profit_per_unit() {
        assert_eq!(profit_per_unit(dec("10"), dec("2"), dec("18")), dec("6"));
    }

    #[test]
    fn test_expiry_buckets() {
        // Already expired counts as critical
        assert_eq!(classify_expiry(-3), ExpirySeverity::Critical);
        assert_eq!(classify_expiry(7), ExpirySeverity::Critical);
        assert_eq!(classify_expiry(8), ExpirySeverity::Warning);
        assert_eq!(classify_expiry(14), ExpirySeverity::Warning);
        assert_eq!(classify_expiry(15), ExpirySeverity::Info);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Turnover is always a percentage between 0 and 100
        #[test]
        fn prop_turnover_bounded(sold in 0i64..=100000, current in 0i64..=100000) {
            let rate = turnover_rate(sold, current);
            prop_assert!(rate >= Decimal::ZERO);
            prop_assert!(rate <= dec("100"));
        }

        /// Selling more of the same opening stock raises the rate
        #[test]
        fn prop_turnover_monotonic_in_sold(sold in 0i64..=10000, current in 1i64..=10000, extra in 1i64..=1000) {
            // Keep the opening stock (current + sold) fixed while shifting
            // units from unsold to sold
            prop_assume!(current > extra);
            let lower = turnover_rate(sold, current);
            let higher = turnover_rate(sold + extra, current - extra);
            prop_assert!(higher >= lower);
        }

        /// Price-for-margin and margin-of-price invert each other
        #[test]
        fn prop_margin_price_inverse(cost_cents in 100i64..=100000, margin_whole in 0i64..=200) {
            let cost = Decimal::new(cost_cents, 2);
            let margin = Decimal::from(margin_whole);

            let price = selling_price_for_margin(cost, Decimal::ZERO, margin);
            let recovered = margin_percent(cost, Decimal::ZERO, price);

            // Rounding the price to cents can shift the margin slightly
            prop_assert!((recovered - margin).abs() < dec("1"));
        }

        /// A clamped price never yields less than the minimum margin
        #[test]
        fn prop_clamp_enforces_floor(
            cost_cents in 100i64..=100000,
            proposed_cents in 0i64..=200000,
            min_margin_whole in 0i64..=100
        ) {
            let cost = Decimal::new(cost_cents, 2);
            let proposed = Decimal::new(proposed_cents, 2);
            let min_margin = Decimal::from(min_margin_whole);

            let clamped = clamp_to_minimum_margin(cost, Decimal::ZERO, proposed, min_margin);
            let floor = selling_price_for_margin(cost, Decimal::ZERO, min_margin);

            prop_assert!(clamped >= floor);
            // Prices already above the floor pass through untouched
            if proposed >= floor {
                prop_assert_eq!(clamped, proposed);
            }
        }

        /// Every number of days lands in exactly one bucket
        #[test]
        fn prop_expiry_buckets_partition(days in -100i64..=1000) {
            let severity = classify_expiry(days);
            match severity {
                ExpirySeverity::Critical => prop_assert!(days <= 7),
                ExpirySeverity::Warning => prop_assert!(days > 7 && days <= 14),
                ExpirySeverity::Info => prop_assert!(days > 14),
            }
        }
    }
}
