//! Exact monetary arithmetic helpers.
//!
//! All amounts are `rust_decimal::Decimal` in Vietnamese dong. Prices cross the
//! session boundary as canonical decimal text (`Decimal::to_string`) and are
//! parsed back here, never through a binary float.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse stored decimal text, coercing missing, empty or malformed input to zero.
///
/// ```
/// use glowmart_core::parse_money_lenient;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_money_lenient(Some("19999.99")), Decimal::new(1_999_999, 2));
/// assert_eq!(parse_money_lenient(Some("")), Decimal::ZERO);
/// assert_eq!(parse_money_lenient(None), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_money_lenient(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or(Decimal::ZERO)
}

/// The price a shopper pays right now: the sale price when strictly positive,
/// otherwise the base price.
#[must_use]
pub fn effective_unit_price(price: Decimal, sale_price: Decimal) -> Decimal {
    if sale_price > Decimal::ZERO {
        sale_price
    } else {
        price
    }
}

/// Format an amount for display, e.g. `1.250.000₫`.
///
/// Fractional dong are rounded away; negative amounts keep their sign.
#[must_use]
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}₫")
    } else {
        format!("{grouped}₫")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money_lenient_exact() {
        let price = parse_money_lenient(Some("19999.99"));
        assert_eq!(price * Decimal::from(3), Decimal::from_str("59999.97").unwrap());
    }

    #[test]
    fn test_parse_money_lenient_garbage_is_zero() {
        assert_eq!(parse_money_lenient(Some("abc")), Decimal::ZERO);
        assert_eq!(parse_money_lenient(Some("   ")), Decimal::ZERO);
    }

    #[test]
    fn test_parse_money_round_trips_canonical_text() {
        let original = Decimal::from_str("100000.50").unwrap();
        let text = original.to_string();
        assert_eq!(parse_money_lenient(Some(&text)), original);
    }

    #[test]
    fn test_effective_unit_price_prefers_positive_sale() {
        let price = Decimal::from(100_000);
        assert_eq!(effective_unit_price(price, Decimal::from(80_000)), Decimal::from(80_000));
        assert_eq!(effective_unit_price(price, Decimal::ZERO), price);
        assert_eq!(effective_unit_price(price, Decimal::from(-5)), price);
    }

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(Decimal::ZERO), "0₫");
        assert_eq!(format_vnd(Decimal::from(999)), "999₫");
        assert_eq!(format_vnd(Decimal::from(1_250_000)), "1.250.000₫");
        assert_eq!(format_vnd(Decimal::from(-12_000)), "-12.000₫");
        assert_eq!(format_vnd(Decimal::from_str("1999.6").unwrap()), "2.000₫");
    }
}
