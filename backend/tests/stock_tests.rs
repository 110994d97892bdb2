//! Stock batch ledger tests
//!
//! Exercises the FIFO consumption model against a small in-memory ledger:
//! adjustments, transfers, conservation of moved units and the fail-clean
//! policy for insufficient transfers.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// In-memory stand-in for a stock batch. Vec order is creation order.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    remaining: i32,
    unit_cost: Decimal,
    selling_price: Decimal,
}

impl Batch {
    fn new(remaining: i32, unit_cost: &str, selling_price: &str) -> Self {
        Self {
            remaining,
            unit_cost: dec(unit_cost),
            selling_price: dec(selling_price),
        }
    }

    fn is_depleted(&self) -> bool {
        self.remaining == 0
    }
}

fn total_remaining(batches: &[Batch]) -> i32 {
    batches.iter().map(|b| b.remaining).sum()
}

/// Drain batches oldest-first; returns units actually consumed.
/// Consuming more than is available drains everything without error.
fn consume_fifo(batches: &mut [Batch], requested: i32) -> i32 {
    let mut outstanding = requested;
    for batch in batches.iter_mut() {
        if outstanding == 0 {
            break;
        }
        let take = outstanding.min(batch.remaining);
        batch.remaining -= take;
        outstanding -= take;
    }
    requested - outstanding
}

/// Move `quantity` units oldest-first into `dest`, mirroring cost and price.
/// Fails before touching either side when the source cannot cover it.
fn transfer_fifo(
    source: &mut Vec<Batch>,
    dest: &mut Vec<Batch>,
    quantity: i32,
) -> Result<Vec<Batch>, &'static str> {
    if total_remaining(source) < quantity {
        return Err("Insufficient stock");
    }

    let mut moved = Vec::new();
    let mut outstanding = quantity;
    for batch in source.iter_mut() {
        if outstanding == 0 {
            break;
        }
        let take = outstanding.min(batch.remaining);
        if take == 0 {
            continue;
        }
        batch.remaining -= take;
        outstanding -= take;
        moved.push(Batch {
            remaining: take,
            unit_cost: batch.unit_cost,
            selling_price: batch.selling_price,
        });
    }

    dest.extend(moved.iter().cloned());
    Ok(moved)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A positive adjustment creates one batch holding the full delta
    #[test]
    fn test_positive_adjustment_creates_full_batch() {
        let mut warehouse = vec![Batch::new(3, "2", "4")];
        let delta = 12;
        warehouse.push(Batch::new(delta, "0", "0"));

        let created = warehouse.last().unwrap();
        assert_eq!(created.remaining, delta);
        assert!(!created.is_depleted());
        // Manual adjustments carry no cost basis
        assert_eq!(created.unit_cost, Decimal::ZERO);
    }

    /// Oldest batch is drained before newer ones
    #[test]
    fn test_count_correction_depletes_oldest_first() {
        // B1 created at t0 with 5 left, B2 created at t1 with 10 left
        let mut batches = vec![Batch::new(5, "2", "4"), Batch::new(10, "3", "5")];

        let consumed = consume_fifo(&mut batches, 8);

        assert_eq!(consumed, 8);
        assert!(batches[0].is_depleted());
        assert_eq!(batches[1].remaining, 7);
    }

    /// Drawing down more than is on hand drains every batch, no error
    #[test]
    fn test_overdraw_drains_everything() {
        let mut batches = vec![Batch::new(5, "2", "4"), Batch::new(3, "3", "5")];

        let consumed = consume_fifo(&mut batches, 20);

        assert_eq!(consumed, 8);
        assert_eq!(total_remaining(&batches), 0);
        assert!(batches.iter().all(Batch::is_depleted));
    }

    /// Exact consumption leaves later batches untouched
    #[test]
    fn test_exact_consumption_stops_at_boundary() {
        let mut batches = vec![Batch::new(5, "2", "4"), Batch::new(10, "3", "5")];

        consume_fifo(&mut batches, 5);

        assert!(batches[0].is_depleted());
        assert_eq!(batches[1].remaining, 10);
    }

    /// One-batch transfer mirrors the batch at the destination
    #[test]
    fn test_transfer_mirrors_single_batch() {
        let mut w1 = vec![Batch::new(5, "2.50", "4.75")];
        let mut w2 = Vec::new();

        let moved = transfer_fifo(&mut w1, &mut w2, 5).unwrap();

        assert!(w1[0].is_depleted());
        assert_eq!(w2.len(), 1);
        assert_eq!(w2[0].remaining, 5);
        assert_eq!(w2[0].unit_cost, dec("2.50"));
        assert_eq!(w2[0].selling_price, dec("4.75"));
        assert_eq!(moved, w2);
    }

    /// Transfer across batch boundaries conserves units and pricing per slice
    #[test]
    fn test_transfer_spans_batches() {
        let mut w1 = vec![Batch::new(4, "2", "4"), Batch::new(6, "3", "5")];
        let mut w2 = Vec::new();

        transfer_fifo(&mut w1, &mut w2, 7).unwrap();

        assert_eq!(total_remaining(&w1), 3);
        assert_eq!(total_remaining(&w2), 7);
        // First mirrored slice keeps the old batch's pricing, second the newer
        assert_eq!(w2[0].unit_cost, dec("2"));
        assert_eq!(w2[1].unit_cost, dec("3"));
        assert_eq!(w2[1].remaining, 3);
    }

    /// An insufficient transfer fails cleanly: nothing moves on either side
    #[test]
    fn test_insufficient_transfer_moves_nothing() {
        let mut w1 = vec![Batch::new(4, "2", "4")];
        let mut w2 = vec![Batch::new(1, "9", "9")];
        let w1_before = w1.clone();
        let w2_before = w2.clone();

        let result = transfer_fifo(&mut w1, &mut w2, 10);

        assert!(result.is_err());
        assert_eq!(w1, w1_before);
        assert_eq!(w2, w2_before);
    }

    /// Depleted batches are retained, not removed
    #[test]
    fn test_depleted_batches_are_kept() {
        let mut batches = vec![Batch::new(5, "2", "4")];
        consume_fifo(&mut batches, 5);
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_depleted());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn batch_strategy() -> impl Strategy<Value = Batch> {
        (1i32..=500, 1i64..=10000, 1i64..=10000).prop_map(|(remaining, cost, price)| Batch {
            remaining,
            unit_cost: Decimal::new(cost, 2),
            selling_price: Decimal::new(price, 2),
        })
    }

    fn ledger_strategy() -> impl Strategy<Value = Vec<Batch>> {
        prop::collection::vec(batch_strategy(), 1..8)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Consumption removes exactly min(requested, available) units
        #[test]
        fn prop_consumption_conserves_units(
            mut batches in ledger_strategy(),
            requested in 1i32..=2000
        ) {
            let before = total_remaining(&batches);
            let consumed = consume_fifo(&mut batches, requested);

            prop_assert_eq!(consumed, requested.min(before));
            prop_assert_eq!(total_remaining(&batches), before - consumed);
        }

        /// After consumption, a batch with stock left implies every older
        /// batch was fully drained first
        #[test]
        fn prop_consumption_is_oldest_first(
            mut batches in ledger_strategy(),
            requested in 1i32..=2000
        ) {
            consume_fifo(&mut batches, requested);

            let first_open = batches.iter().position(|b| !b.is_depleted());
            if let Some(idx) = first_open {
                prop_assert!(batches[..idx].iter().all(Batch::is_depleted));
            }
        }

        /// A covered transfer moves exactly the requested quantity and
        /// preserves unit economics per moved slice
        #[test]
        fn prop_transfer_conserves_quantity_and_pricing(
            mut source in ledger_strategy(),
            quantity in 1i32..=500
        ) {
            let available = total_remaining(&source);
            prop_assume!(available >= quantity);

            let source_before = source.clone();
            let mut dest = Vec::new();
            let moved = transfer_fifo(&mut source, &mut dest, quantity).unwrap();

            prop_assert_eq!(total_remaining(&source), available - quantity);
            prop_assert_eq!(total_remaining(&dest), quantity);

            // Every moved slice carries the pricing of some source batch
            for slice in &moved {
                prop_assert!(source_before.iter().any(|b|
                    b.unit_cost == slice.unit_cost && b.selling_price == slice.selling_price
                ));
            }
        }

        /// An uncovered transfer never mutates either warehouse
        #[test]
        fn prop_insufficient_transfer_is_clean(
            mut source in ledger_strategy(),
            extra in 1i32..=500
        ) {
            let quantity = total_remaining(&source) + extra;
            let source_before = source.clone();
            let mut dest = Vec::new();

            prop_assert!(transfer_fifo(&mut source, &mut dest, quantity).is_err());
            prop_assert_eq!(source, source_before);
            prop_assert!(dest.is_empty());
        }

        /// Remaining quantities never go negative
        #[test]
        fn prop_remaining_never_negative(
            mut batches in ledger_strategy(),
            requested in 1i32..=5000
        ) {
            consume_fifo(&mut batches, requested);
            prop_assert!(batches.iter().all(|b| b.remaining >= 0));
        }
    }
}
