//! Pricing calculations shared by the backend and the browser dialogs
//!
//! Margin is always computed against landed cost (unit cost plus the
//! shipping allocation), not the bare unit cost.

use rust_decimal::Decimal;

/// Landed cost per unit: purchase cost plus allocated inbound freight
pub fn landed_cost(unit_cost: Decimal, shipping_cost_per_unit: Decimal) -> Decimal {
    unit_cost + shipping_cost_per_unit
}

/// Margin percentage for a selling price over landed cost.
/// Returns zero when the landed cost is zero (manual adjustment batches
/// carry no cost basis).
pub fn margin_percent(
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    selling_price: Decimal,
) -> Decimal {
    let cost = landed_cost(unit_cost, shipping_cost_per_unit);
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    ((selling_price - cost) / cost) * Decimal::from(100)
}

/// Selling price that yields the given margin over landed cost
pub fn selling_price_for_margin(
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    margin_pct: Decimal,
) -> Decimal {
    let cost = landed_cost(unit_cost, shipping_cost_per_unit);
    (cost * (Decimal::ONE + margin_pct / Decimal::from(100))).round_dp(2)
}

/// Profit per unit at a selling price
pub fn profit_per_unit(
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    selling_price: Decimal,
) -> Decimal {
    selling_price - landed_cost(unit_cost, shipping_cost_per_unit)
}

/// Raise a proposed selling price to the minimum-margin floor if it falls
/// below it. Price dialogs apply this before submitting; the server does
/// not enforce it.
pub fn clamp_to_minimum_margin(
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    proposed_price: Decimal,
    min_margin_pct: Decimal,
) -> Decimal {
    let floor = selling_price_for_margin(unit_cost, shipping_cost_per_unit, min_margin_pct);
    if proposed_price < floor {
        floor
    } else {
        proposed_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_margin_over_landed_cost() {
        // landed cost 10 + 2 = 12, selling 15 -> 25%
        assert_eq!(dec("25"), margin_percent(dec("10"), dec("2"), dec("15")));
    }

    #[test]
    fn test_margin_zero_cost_basis() {
        assert_eq!(Decimal::ZERO, margin_percent(dec("0"), dec("0"), dec("15")));
    }

    #[test]
    fn test_price_and_margin_are_inverse() {
        let price = selling_price_for_margin(dec("10"), dec("2"), dec("25"));
        assert_eq!(dec("15.00"), price);
        assert_eq!(dec("25"), margin_percent(dec("10"), dec("2"), price));
    }

    #[test]
    fn test_clamp_raises_low_price() {
        let clamped = clamp_to_minimum_margin(dec("10"), dec("0"), dec("10.50"), dec("10"));
        assert_eq!(dec("11.00"), clamped);
    }

    #[test]
    fn test_clamp_keeps_price_above_floor() {
        let kept = clamp_to_minimum_margin(dec("10"), dec("0"), dec("14"), dec("10"));
        assert_eq!(dec("14"), kept);
    }
}
