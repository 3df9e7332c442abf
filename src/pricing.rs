//! Pricing
//!
//! The single entry point for pricing a cart. Every step reads an explicit
//! settings snapshot; nothing here touches global state or performs I/O.

use jiff::Timestamp;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    breakdown::OrderBreakdown,
    catalog::{CatalogError, PriceCatalog},
    delivery::DeliveryPolicy,
    discounts::{DiscountError, DiscountPercent, compute_discounts},
    formats::Format,
    items::{LineItem, total_quantity},
    promotions::{Promotion, promotion_applies},
    schedule::DiscountSchedule,
};

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The cart has no line items.
    #[error("cart is empty; add at least one photo")]
    EmptyCart,

    /// A line item references a format without a configured price.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A line total or the subtotal does not fit in minor units.
    #[error("price overflowed while totalling {0} prints")]
    Overflow(Format),

    /// Discount calculation failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price of a single line item: unit price times quantity.
///
/// # Errors
///
/// Returns a [`PricingError`] if the format has no price or the total overflows.
pub fn line_total<'a>(
    item: &LineItem,
    catalog: &PriceCatalog<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    let unit_price = catalog.unit_price(item.format()).inspect_err(|err| {
        error!(
            format = %item.format(),
            file_name = item.file_name(),
            %err,
            "line item references a format missing from the price catalog"
        );
    })?;

    let total = unit_price
        .to_minor_units()
        .checked_mul(i64::from(item.quantity()))
        .ok_or(PricingError::Overflow(item.format()))?;

    Ok(Money::from_minor(total, unit_price.currency()))
}

/// Sum of every line item's price, before any discount.
///
/// An empty slice totals zero; rejecting empty carts is [`price_order`]'s job.
///
/// # Errors
///
/// Returns a [`PricingError`] if a format has no price or the sum overflows.
pub fn subtotal<'a>(
    items: &[LineItem],
    catalog: &PriceCatalog<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    items.iter().try_fold(
        Money::from_minor(0, catalog.currency()),
        |acc, item| {
            let line = line_total(item, catalog)?;
            let sum = acc
                .to_minor_units()
                .checked_add(line.to_minor_units())
                .ok_or(PricingError::Overflow(item.format()))?;

            Ok(Money::from_minor(sum, catalog.currency()))
        },
    )
}

/// Price an order.
///
/// The steps run in a fixed sequence: subtotal, quantity tier, promotion,
/// discount amounts, delivery fee, grand total. The delivery threshold is
/// checked against the discounted price, never the raw subtotal.
///
/// `now` is only used for promotion expiry; sample it once per call.
///
/// # Errors
///
/// Returns [`PricingError::EmptyCart`] before computing anything if `items` is
/// empty, and [`PricingError::Catalog`] if any line item's format is unpriced;
/// in that case the whole order is rejected.
pub fn price_order<'a>(
    items: &[LineItem],
    catalog: &PriceCatalog<'a>,
    schedule: &DiscountSchedule,
    promotion: Option<&Promotion>,
    policy: &DeliveryPolicy<'a>,
    now: Timestamp,
) -> Result<OrderBreakdown<'a>, PricingError> {
    if items.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    let subtotal = subtotal(items, catalog)?;
    let total_quantity = total_quantity(items);

    debug!(
        line_items = items.len(),
        total_quantity,
        subtotal = %subtotal,
        "computed subtotal"
    );

    let quantity_discount_percent = schedule.select_quantity_tier(total_quantity);

    let promotion_discount_percent = if promotion_applies(promotion, items, now) {
        promotion.map_or(DiscountPercent::ZERO, |promotion| promotion.discount_percent)
    } else {
        DiscountPercent::ZERO
    };

    debug!(
        quantity_percent = quantity_discount_percent.points(),
        promotion_percent = promotion_discount_percent.points(),
        "selected discounts"
    );

    let discounts = compute_discounts(
        subtotal,
        quantity_discount_percent,
        promotion_discount_percent,
    )?;

    let delivery_fee = policy.fee_for(discounts.price_after_discount);
    let grand_total = discounts.price_after_discount.add(delivery_fee)?;

    debug!(
        price_after_discount = %discounts.price_after_discount,
        delivery_fee = %delivery_fee,
        grand_total = %grand_total,
        "priced order"
    );

    Ok(OrderBreakdown {
        total_quantity,
        subtotal,
        quantity_discount_percent,
        quantity_discount_amount: discounts.quantity_amount,
        promotion_discount_percent,
        promotion_discount_amount: discounts.promotion_amount,
        total_discount_amount: discounts.total_amount,
        price_after_discount: discounts.price_after_discount,
        delivery_fee,
        grand_total,
    })
}
