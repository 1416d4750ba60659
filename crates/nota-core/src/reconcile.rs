//! # Total Reconciliation
//!
//! Derives the canonical monetary total for an invoice.
//!
//! ## Why Reconcile At All?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The spreadsheet's total_amount column is known to go stale:            │
//! │                                                                         │
//! │    • older app versions wrote 0 and never updated it                    │
//! │    • manual edits to item rows skip the total cell                      │
//! │                                                                         │
//! │  Line items are ground truth whenever they sum to a positive value.    │
//! │  Only when they don't (empty list, all-zero prices) do we trust the    │
//! │  stored column — clamped so the canonical total is never negative.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and total: malformed items were already degraded to an empty list
//! at decode time, so nothing here can fail.

use crate::money::Money;
use crate::types::Invoice;

/// Returns the canonical total for an invoice.
///
/// `computed = Σ unit_price × quantity`; returned when positive, otherwise
/// the stored total clamped to `>= 0`.
///
/// ## Example
/// ```rust
/// use nota_core::money::Money;
/// use nota_core::reconcile::reconcile;
/// use nota_core::types::{Invoice, LineItem};
/// use chrono::Utc;
///
/// let invoice = Invoice {
///     id: "INV-0001".into(),
///     customer_name: "Budi".into(),
///     customer_phone: None,
///     items: vec![LineItem::new("Kopi", Money::from_rupiah(10_000), 2)],
///     stored_total: Money::zero(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(reconcile(&invoice).rupiah(), 20_000);
/// ```
pub fn reconcile(invoice: &Invoice) -> Money {
    let computed = invoice
        .items
        .iter()
        .fold(Money::zero(), |sum, item| sum + item.subtotal());

    if computed.is_positive() {
        computed
    } else {
        invoice.stored_total.clamp_non_negative()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;
    use chrono::Utc;

    fn invoice_with(items: Vec<LineItem>, stored_total: i64) -> Invoice {
        Invoice {
            id: "INV-TEST".to_string(),
            customer_name: "Budi".to_string(),
            customer_phone: None,
            items,
            stored_total: Money::from_rupiah(stored_total),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_items_win_over_stored_total() {
        let invoice = invoice_with(vec![LineItem::new("Kopi", Money::from_rupiah(10_000), 2)], 0);
        assert_eq!(reconcile(&invoice).rupiah(), 20_000);
    }

    #[test]
    fn test_items_win_even_when_stored_total_disagrees() {
        let invoice = invoice_with(
            vec![LineItem::new("Kopi", Money::from_rupiah(10_000), 2)],
            99_999,
        );
        assert_eq!(reconcile(&invoice).rupiah(), 20_000);
    }

    #[test]
    fn test_empty_items_fall_back_to_stored() {
        let invoice = invoice_with(vec![], 5_000);
        assert_eq!(reconcile(&invoice).rupiah(), 5_000);
    }

    #[test]
    fn test_zero_sum_items_fall_back_to_stored() {
        let invoice = invoice_with(vec![LineItem::new("Gratis", Money::zero(), 1)], 7_000);
        assert_eq!(reconcile(&invoice).rupiah(), 7_000);
    }

    #[test]
    fn test_negative_stored_total_clamped() {
        let invoice = invoice_with(vec![], -3_000);
        assert_eq!(reconcile(&invoice).rupiah(), 0);
    }

    #[test]
    fn test_idempotent() {
        let invoice = invoice_with(
            vec![
                LineItem::new("Kopi", Money::from_rupiah(15_000), 2),
                LineItem::new("Roti", Money::from_rupiah(10_000), 1),
            ],
            0,
        );
        assert_eq!(reconcile(&invoice), reconcile(&invoice));
        assert_eq!(reconcile(&invoice).rupiah(), 40_000);
    }
}
