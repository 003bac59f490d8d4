//! Price breakdown for a booking, in BRL.
//!
//! All money is `rust_decimal::Decimal` internally; conversion to the
//! processor's integer minor units (centavos) happens once, at the
//! processor boundary.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Service fee charged on top of the court price: 10% of the subtotal.
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Rounds to centavos and pins the scale so money always serializes
/// with exactly two decimal places (`200.00`, never `200`).
fn to_money(value: Decimal) -> Decimal {
    let mut v = value.round_dp(2);
    v.rescale(2);
    v
}

/// Itemized price of a booking.
///
/// Invariant: `total == subtotal + service_fee - discount`, with
/// `service_fee == 0.10 * subtotal`. Enforced by construction —
/// [`PriceBreakdown::compute`] is the only way to build one outside the
/// store layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PriceBreakdown {
    /// Court price × duration.
    #[schema(value_type = String, example = "200.00")]
    pub subtotal: Decimal,
    /// 10% of the subtotal.
    #[schema(value_type = String, example = "20.00")]
    pub service_fee: Decimal,
    /// Coupon discount, zero when no coupon applies.
    #[schema(value_type = String, example = "0.00")]
    pub discount: Decimal,
    /// Amount actually charged.
    #[schema(value_type = String, example = "220.00")]
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Computes the breakdown from an hourly court price and duration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the price is not
    /// positive or the discount is negative or exceeds subtotal + fee.
    pub fn compute(
        price_per_hour: Decimal,
        duration_hours: u32,
        discount: Decimal,
    ) -> Result<Self, GatewayError> {
        if price_per_hour <= Decimal::ZERO {
            return Err(GatewayError::InvalidRequest(
                "price per hour must be positive".to_string(),
            ));
        }
        if discount < Decimal::ZERO {
            return Err(GatewayError::InvalidRequest(
                "discount must not be negative".to_string(),
            ));
        }

        let subtotal = to_money(price_per_hour * Decimal::from(duration_hours));
        let service_fee = to_money(subtotal * SERVICE_FEE_RATE);
        let discount = to_money(discount);
        let total = subtotal + service_fee - discount;
        if total < Decimal::ZERO {
            return Err(GatewayError::InvalidRequest(
                "discount exceeds the booking price".to_string(),
            ));
        }

        Ok(Self {
            subtotal,
            service_fee,
            discount,
            total,
        })
    }

    /// Converts the total to integer minor units (centavos) for the
    /// payment processor, rounding half up as the processor expects.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the amount does not fit in
    /// an `i64` (never for realistic court prices).
    pub fn total_minor_units(&self) -> Result<i64, GatewayError> {
        (self.total * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or_else(|| GatewayError::Internal("amount overflows minor units".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        let Ok(d) = s.parse() else {
            panic!("valid decimal: {s}");
        };
        d
    }

    #[test]
    fn hundred_per_hour_for_two_hours() {
        // Concrete scenario: R$100/h × 2h.
        let Ok(price) = PriceBreakdown::compute(dec("100.00"), 2, Decimal::ZERO) else {
            panic!("valid breakdown");
        };
        assert_eq!(price.subtotal, dec("200.00"));
        assert_eq!(price.service_fee, dec("20.00"));
        assert_eq!(price.total, dec("220.00"));
    }

    #[test]
    fn total_identity_holds_with_discount() {
        let Ok(price) = PriceBreakdown::compute(dec("80.00"), 3, dec("15.00")) else {
            panic!("valid breakdown");
        };
        assert_eq!(price.service_fee, price.subtotal * dec("0.10"));
        assert_eq!(
            price.total,
            price.subtotal + price.service_fee - price.discount
        );
    }

    #[test]
    fn fee_rounds_to_centavos() {
        let Ok(price) = PriceBreakdown::compute(dec("33.33"), 1, Decimal::ZERO) else {
            panic!("valid breakdown");
        };
        assert_eq!(price.service_fee, dec("3.33"));
    }

    #[test]
    fn money_fields_keep_two_decimal_places() {
        // A whole-number court price must still render as "200.00".
        let Ok(price) = PriceBreakdown::compute(Decimal::from(100), 2, Decimal::ZERO) else {
            panic!("valid breakdown");
        };
        assert_eq!(price.subtotal.to_string(), "200.00");
        assert_eq!(price.service_fee.to_string(), "20.00");
        assert_eq!(price.discount.to_string(), "0.00");
        assert_eq!(price.total.to_string(), "220.00");
    }

    #[test]
    fn minor_units_conversion() {
        let Ok(price) = PriceBreakdown::compute(dec("100.00"), 2, Decimal::ZERO) else {
            panic!("valid breakdown");
        };
        assert_eq!(price.total_minor_units().ok(), Some(22_000));
    }

    #[test]
    fn zero_price_rejected() {
        assert!(PriceBreakdown::compute(Decimal::ZERO, 2, Decimal::ZERO).is_err());
    }

    #[test]
    fn negative_discount_rejected() {
        assert!(PriceBreakdown::compute(dec("100.00"), 1, dec("-5.00")).is_err());
    }

    #[test]
    fn excessive_discount_rejected() {
        assert!(PriceBreakdown::compute(dec("100.00"), 1, dec("500.00")).is_err());
    }
}
