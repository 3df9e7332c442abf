//! Discounts
//!
//! Percentages are whole points between 0 and 100. Each discount is applied to
//! the original subtotal and rounded to a whole currency unit on its own, then
//! the rounded amounts are summed.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Serialize;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percent outside of 0–100.
    #[error("discount percent {0} is outside of 0-100")]
    PercentOutOfRange(u32),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A discount percentage in whole points, bounded to 0–100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: DiscountPercent = DiscountPercent(0);

    /// The whole amount.
    pub const FULL: DiscountPercent = DiscountPercent(100);

    /// Create a percentage from whole points.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOutOfRange`] if `points` exceeds 100.
    pub fn new(points: u32) -> Result<Self, DiscountError> {
        u8::try_from(points)
            .ok()
            .filter(|points| *points <= 100)
            .map(DiscountPercent)
            .ok_or(DiscountError::PercentOutOfRange(points))
    }

    /// Return the whole percentage points.
    pub const fn points(self) -> u8 {
        self.0
    }

    /// Return `true` when no discount applies.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert to a fractional [`Percentage`] (e.g. 5 points becomes 0.05).
    pub fn as_percentage(self) -> Percentage {
        Percentage::from(Decimal::new(i64::from(self.0), 2))
    }
}

impl TryFrom<u32> for DiscountPercent {
    type Error = DiscountError;

    fn try_from(points: u32) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Discount amounts derived from a subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountAmounts<'a> {
    /// Quantity-tier discount
    pub quantity_amount: Money<'a, Currency>,

    /// Promotion discount
    pub promotion_amount: Money<'a, Currency>,

    /// Sum of both rounded components
    pub total_amount: Money<'a, Currency>,

    /// Subtotal minus the total discount, never below zero
    pub price_after_discount: Money<'a, Currency>,
}

/// Compute both discounts against the original subtotal.
///
/// The discounts are additive on the base price, not compounded: the promotion
/// is never applied to the quantity-discounted price.
///
/// # Errors
///
/// Returns a [`DiscountError`] if a percentage cannot be represented or money
/// arithmetic fails.
pub fn compute_discounts<'a>(
    subtotal: Money<'a, Currency>,
    quantity_percent: DiscountPercent,
    promotion_percent: DiscountPercent,
) -> Result<DiscountAmounts<'a>, DiscountError> {
    let quantity_amount = percent_of_whole_units(quantity_percent, subtotal)?;
    let promotion_amount = percent_of_whole_units(promotion_percent, subtotal)?;
    let total_amount = quantity_amount.add(promotion_amount)?;

    // Two full discounts can exceed the subtotal.
    let remaining = subtotal
        .to_minor_units()
        .checked_sub(total_amount.to_minor_units())
        .ok_or(DiscountError::PercentConversion)?;

    Ok(DiscountAmounts {
        quantity_amount,
        promotion_amount,
        total_amount,
        price_after_discount: Money::from_minor(remaining.max(0), subtotal.currency()),
    })
}

/// Apply a percentage to an amount, rounded to the nearest whole currency unit.
///
/// Midpoints round away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_whole_units<'a>(
    percent: DiscountPercent,
    amount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let currency = amount.currency();
    let unit = minor_units_per_unit(currency)?;
    let major = Decimal::from_i64(amount.to_minor_units())
        .ok_or(DiscountError::PercentConversion)?
        .checked_div(unit)
        .ok_or(DiscountError::PercentConversion)?;

    // `Percentage * Decimal` is the only way to read the fraction back out.
    let fraction = percent.as_percentage() * Decimal::ONE;

    let discount_minor = fraction
        .checked_mul(major)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(unit)
        .and_then(|minor| minor.to_i64())
        .ok_or(DiscountError::PercentConversion)?;

    Ok(Money::from_minor(discount_minor, currency))
}

/// Number of minor units in one whole unit of the currency.
fn minor_units_per_unit(currency: &Currency) -> Result<Decimal, DiscountError> {
    10_i64
        .checked_pow(currency.exponent)
        .and_then(Decimal::from_i64)
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, RSD};
    use testresult::TestResult;

    use super::*;

    fn percent(points: u32) -> Result<DiscountPercent, DiscountError> {
        DiscountPercent::new(points)
    }

    #[test]
    fn percent_rejects_values_above_one_hundred() {
        assert_eq!(
            DiscountPercent::new(101),
            Err(DiscountError::PercentOutOfRange(101))
        );
        assert_eq!(
            DiscountPercent::try_from(1_000),
            Err(DiscountError::PercentOutOfRange(1_000))
        );
    }

    #[test]
    fn percent_accepts_bounds() -> TestResult {
        assert_eq!(percent(0)?, DiscountPercent::ZERO);
        assert_eq!(percent(100)?, DiscountPercent::FULL);
        assert_eq!(percent(15)?.to_string(), "15%");

        Ok(())
    }

    #[test]
    fn percent_of_whole_units_is_exact_for_whole_results() -> TestResult {
        let amount = Money::from_major(1080, RSD);

        let discount = percent_of_whole_units(percent(5)?, amount)?;

        assert_eq!(discount, Money::from_major(54, RSD));

        Ok(())
    }

    #[test]
    fn percent_of_whole_units_rounds_half_away_from_zero() -> TestResult {
        // 5% of 190 = 9.5 -> 10
        let discount = percent_of_whole_units(percent(5)?, Money::from_major(190, RSD))?;

        assert_eq!(discount, Money::from_major(10, RSD));

        // 5% of 188 = 9.4 -> 9
        let discount = percent_of_whole_units(percent(5)?, Money::from_major(188, RSD))?;

        assert_eq!(discount, Money::from_major(9, RSD));

        Ok(())
    }

    #[test]
    fn percent_of_whole_units_rounds_to_whole_units_not_minor_units() -> TestResult {
        // 10% of 12.34 EUR = 1.234 -> 1.00 EUR
        let discount = percent_of_whole_units(percent(10)?, Money::from_minor(1234, EUR))?;

        assert_eq!(discount, Money::from_minor(100, EUR));

        Ok(())
    }

    #[test]
    fn compute_discounts_is_additive_on_the_subtotal() -> TestResult {
        let amounts = compute_discounts(Money::from_major(6000, RSD), percent(10)?, percent(10)?)?;

        assert_eq!(amounts.quantity_amount, Money::from_major(600, RSD));
        assert_eq!(amounts.promotion_amount, Money::from_major(600, RSD));
        assert_eq!(amounts.total_amount, Money::from_major(1200, RSD));
        assert_eq!(amounts.price_after_discount, Money::from_major(4800, RSD));

        Ok(())
    }

    #[test]
    fn compute_discounts_rounds_each_component_separately() -> TestResult {
        // 5% of 190 = 9.5 -> 10, twice = 20; rounding the 19 sum would give 19.
        let amounts = compute_discounts(Money::from_major(190, RSD), percent(5)?, percent(5)?)?;

        assert_eq!(amounts.total_amount, Money::from_major(20, RSD));
        assert_eq!(amounts.price_after_discount, Money::from_major(170, RSD));

        Ok(())
    }

    #[test]
    fn compute_discounts_floors_price_at_zero() -> TestResult {
        let amounts = compute_discounts(Money::from_major(500, RSD), percent(80)?, percent(50)?)?;

        assert_eq!(amounts.total_amount, Money::from_major(650, RSD));
        assert_eq!(amounts.price_after_discount, Money::from_major(0, RSD));

        Ok(())
    }

    #[test]
    fn compute_discounts_with_no_discounts_keeps_subtotal() -> TestResult {
        let amounts = compute_discounts(
            Money::from_major(180, RSD),
            DiscountPercent::ZERO,
            DiscountPercent::ZERO,
        )?;

        assert_eq!(amounts.total_amount, Money::from_major(0, RSD));
        assert_eq!(amounts.price_after_discount, Money::from_major(180, RSD));

        Ok(())
    }
}
