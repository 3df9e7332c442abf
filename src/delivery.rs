//! Delivery Policy

use rusty_money::{Money, iso::Currency};

/// Flat delivery fee, waived once the discounted price reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPolicy<'a> {
    fee: Money<'a, Currency>,
    free_threshold: Money<'a, Currency>,
}

impl<'a> DeliveryPolicy<'a> {
    /// Create a new delivery policy.
    pub fn new(fee: Money<'a, Currency>, free_threshold: Money<'a, Currency>) -> Self {
        Self {
            fee,
            free_threshold,
        }
    }

    /// Return the flat delivery fee.
    pub fn fee(&self) -> Money<'a, Currency> {
        self.fee
    }

    /// Return the price from which delivery is free.
    pub fn free_threshold(&self) -> Money<'a, Currency> {
        self.free_threshold
    }

    /// Delivery fee for an order, evaluated on the price after discounts.
    ///
    /// The threshold is inclusive.
    pub fn fee_for(&self, price_after_discount: Money<'a, Currency>) -> Money<'a, Currency> {
        if price_after_discount.to_minor_units() >= self.free_threshold.to_minor_units() {
            Money::from_minor(0, self.fee.currency())
        } else {
            self.fee
        }
    }
}
