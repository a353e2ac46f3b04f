//! Money arithmetic over catalog price strings.
//!
//! Prices travel through the system as the strings the catalog serves (see
//! [`Product::price`](super::product::Product)). Two different sums are
//! derived from them:
//!
//! - the *display total*, an exact decimal sum formatted to two places, and
//! - the *charge amount*, the whole-currency sum the payment backend
//!   accepts.
//!
//! The two intentionally disagree on fractional cents; see
//! [`charge_amount`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::product::Product;

/// Exact decimal sum of the entry prices.
///
/// An unparseable price contributes zero, matching the catalog contract
/// that prices are decimal strings.
#[must_use]
pub fn cart_total(entries: &[Product]) -> Decimal {
    entries
        .iter()
        .map(|p| p.price.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO))
        .sum()
}

/// Format a decimal total for display, e.g. `"$30.00"`.
#[must_use]
pub fn format_total(total: Decimal) -> String {
    format!("${total:.2}")
}

/// Whole-currency amount submitted to the payment backend.
///
/// Each price is truncated to its integer part before summing, so
/// fractional cents are dropped. The payment API only accepts
/// whole-currency amounts today, and order records must stay bit-exact
/// with what it charges.
///
/// TODO: send the exact decimal amount once `payment/process` accepts one.
#[must_use]
pub fn charge_amount(entries: &[Product]) -> i64 {
    entries
        .iter()
        .map(|p| {
            p.price
                .trim()
                .parse::<Decimal>()
                .ok()
                .and_then(|d| d.trunc().to_i64())
                .unwrap_or(0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;

    fn entry(id: i32, price: &str) -> Product {
        Product::new(ProductId::new(id), format!("product-{id}"), price)
    }

    #[test]
    fn test_total_whole_prices() {
        let cart = vec![entry(1, "10"), entry(2, "20")];
        assert_eq!(format_total(cart_total(&cart)), "$30.00");
    }

    #[test]
    fn test_charge_amount_whole_prices() {
        let cart = vec![entry(1, "10"), entry(2, "20")];
        assert_eq!(charge_amount(&cart), 30);
    }

    #[test]
    fn test_charge_amount_truncates_each_item() {
        // 10.99 + 20.99 displays as $31.98 but charges 10 + 20 = 30.
        let cart = vec![entry(1, "10.99"), entry(2, "20.99")];
        assert_eq!(format_total(cart_total(&cart)), "$31.98");
        assert_eq!(charge_amount(&cart), 30);
    }

    #[test]
    fn test_unparseable_price_contributes_zero() {
        let cart = vec![entry(1, "10"), entry(2, "not-a-price")];
        assert_eq!(format_total(cart_total(&cart)), "$10.00");
        assert_eq!(charge_amount(&cart), 10);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(format_total(cart_total(&[])), "$0.00");
        assert_eq!(charge_amount(&[]), 0);
    }
}
