//! Order Breakdown
//!
//! The priced result of a cart. Presentation layers render these fields; they
//! never recompute amounts themselves.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{CatalogError, PriceCatalog},
    discounts::DiscountPercent,
    items::LineItem,
    pricing::{PricingError, line_total},
};

/// Errors that can occur when rendering a breakdown.
#[derive(Debug, Error)]
pub enum BreakdownError {
    /// A line item could not be priced for display.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

impl From<CatalogError> for BreakdownError {
    fn from(err: CatalogError) -> Self {
        BreakdownError::Pricing(PricingError::Catalog(err))
    }
}

/// Priced order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBreakdown<'a> {
    /// Total number of prints
    pub total_quantity: u64,

    /// Sum of line item prices before discounts
    pub subtotal: Money<'a, Currency>,

    /// Selected quantity tier percent
    pub quantity_discount_percent: DiscountPercent,

    /// Quantity discount, rounded to a whole unit
    pub quantity_discount_amount: Money<'a, Currency>,

    /// Promotion percent, zero when the promotion does not apply
    pub promotion_discount_percent: DiscountPercent,

    /// Promotion discount, rounded to a whole unit
    pub promotion_discount_amount: Money<'a, Currency>,

    /// Sum of both discount amounts
    pub total_discount_amount: Money<'a, Currency>,

    /// Subtotal minus discounts, never negative
    pub price_after_discount: Money<'a, Currency>,

    /// Delivery fee, zero above the free delivery threshold
    pub delivery_fee: Money<'a, Currency>,

    /// Amount to charge
    pub grand_total: Money<'a, Currency>,
}

/// Serializable form of a breakdown, in major currency units.
///
/// Every field is always present, zeros included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRecord {
    /// ISO currency code
    pub currency: String,
    /// Total number of prints
    pub total_quantity: u64,
    /// Sum of line item prices before discounts
    pub subtotal: Decimal,
    /// Quantity tier percent points
    pub quantity_discount_percent: u8,
    /// Quantity discount amount
    pub quantity_discount_amount: Decimal,
    /// Promotion percent points
    pub promotion_discount_percent: u8,
    /// Promotion discount amount
    pub promotion_discount_amount: Decimal,
    /// Sum of both discount amounts
    pub total_discount_amount: Decimal,
    /// Subtotal minus discounts
    pub price_after_discount: Decimal,
    /// Delivery fee
    pub delivery_fee: Decimal,
    /// Amount to charge
    pub grand_total: Decimal,
}

impl<'a> OrderBreakdown<'a> {
    /// Currency of every amount in the breakdown.
    pub fn currency(&self) -> &'a Currency {
        self.subtotal.currency()
    }

    /// Return `true` if delivery is free for this order.
    pub fn has_free_delivery(&self) -> bool {
        self.delivery_fee.to_minor_units() == 0
    }

    /// Total discount as a fraction of the subtotal.
    pub fn savings_percent(&self) -> Percentage {
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(Decimal::ZERO);
        }

        Percentage::from(
            Decimal::from(self.total_discount_amount.to_minor_units()) / Decimal::from(subtotal_minor),
        )
    }

    /// Convert to a serializable record.
    pub fn to_record(&self) -> BreakdownRecord {
        BreakdownRecord {
            currency: self.currency().iso_alpha_code.to_string(),
            total_quantity: self.total_quantity,
            subtotal: major_units(self.subtotal),
            quantity_discount_percent: self.quantity_discount_percent.points(),
            quantity_discount_amount: major_units(self.quantity_discount_amount),
            promotion_discount_percent: self.promotion_discount_percent.points(),
            promotion_discount_amount: major_units(self.promotion_discount_amount),
            total_discount_amount: major_units(self.total_discount_amount),
            price_after_discount: major_units(self.price_after_discount),
            delivery_fee: major_units(self.delivery_fee),
            grand_total: major_units(self.grand_total),
        }
    }

    /// Writes the breakdown as a receipt: one row per line item, then the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if a line item cannot be priced or output fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        items: &[LineItem],
        catalog: &PriceCatalog<'_>,
    ) -> Result<(), BreakdownError> {
        let mut builder = Builder::default();

        push_receipt_header(&mut builder);

        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = SmallVec::new();

        append_item_rows(items, catalog, &mut builder, &mut color_ops)?;

        write_receipt_table(&mut out, builder, color_ops)?;

        write_receipt_summary(&mut out, self)?;

        Ok(())
    }
}

fn major_units(money: Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

fn push_receipt_header(builder: &mut Builder) {
    builder.push_record(["", "Photo", "Format", "Finish", "Qty", "Unit Price", "Total"]);
}

fn append_item_rows(
    items: &[LineItem],
    catalog: &PriceCatalog<'_>,
    builder: &mut Builder,
    color_ops: &mut SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), BreakdownError> {
    for (item_idx, item) in items.iter().enumerate() {
        let unit_price = catalog.unit_price(item.format())?;
        let total = line_total(item, catalog)?;

        builder.push_record([
            format!("#{:<3}", item_idx + 1),
            item.file_name().to_string(),
            format!("{} cm", item.format()),
            item.finish().to_string(),
            item.quantity().to_string(),
            format!("{unit_price}"),
            format!("{total}"),
        ]);

        // header is row 0
        color_ops.push((item_idx + 1, 3, color_dark_grey()));
        color_ops.push((item_idx + 1, 5, color_dark_grey()));
    }

    Ok(())
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), BreakdownError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| BreakdownError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    breakdown: &OrderBreakdown<'_>,
) -> Result<(), BreakdownError> {
    let mut lines: SmallVec<[(String, String); 6]> = SmallVec::new();

    lines.push((" Subtotal:".to_string(), format!("{}  ", breakdown.subtotal)));

    if !breakdown.quantity_discount_percent.is_zero() {
        lines.push((
            format!(" Quantity discount ({}):", breakdown.quantity_discount_percent),
            format!("-{}  ", breakdown.quantity_discount_amount),
        ));
    }

    if !breakdown.promotion_discount_percent.is_zero() {
        lines.push((
            format!(" Promotion ({}):", breakdown.promotion_discount_percent),
            format!("-{}  ", breakdown.promotion_discount_amount),
        ));
    }

    let delivery = if breakdown.has_free_delivery() {
        "Free  ".to_string()
    } else {
        format!("{}  ", breakdown.delivery_fee)
    };

    lines.push((" Delivery:".to_string(), delivery));

    lines.push((
        " \x1b[1mTotal:\x1b[0m".to_string(),
        format!("\x1b[1m{}  \x1b[0m", breakdown.grand_total),
    ));

    let savings_points = percent_points_from_fractional_percentage(breakdown.savings_percent());

    lines.push((
        " Savings:".to_string(),
        format!("({savings_points:.2}%) {}  ", breakdown.total_discount_amount),
    ));

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| BreakdownError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), BreakdownError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| BreakdownError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
