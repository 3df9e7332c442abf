//! Orders
//!
//! Turns a priced cart and the customer's contact details into a submitted
//! order with a number, a status and the plain-text details sheet that ships
//! with the photos to the print lab.

use std::{fmt, path::Path};

use jiff::{Timestamp, tz::TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    breakdown::{BreakdownRecord, OrderBreakdown},
    items::{LineItem, total_quantity},
    pricing::PricingError,
    settings::{SettingsError, SettingsSnapshot, read_document},
};

/// Errors raised while submitting an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// A required contact field is blank.
    #[error("missing required contact field: {0}")]
    MissingContactField(&'static str),

    /// The cart has no line items.
    #[error("cannot submit an empty cart")]
    EmptyCart,

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Customer contact details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// Full name
    pub full_name: String,

    /// E-mail address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Delivery address
    pub address: String,

    /// Free-form notes for the lab
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactInfo {
    /// Check that every required field has a value.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingContactField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), OrderError> {
        let required = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];

        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(OrderError::MissingContactField(field)),
            None => Ok(()),
        }
    }
}

/// How the lab should fit photos whose aspect ratio differs from the print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingOptions {
    /// Crop the photo to fill the format
    pub crop_to_format: bool,

    /// Pad the photo with white borders
    pub fill_white: bool,
}

/// Checkout form contents submitted alongside the cart.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Customer contact details
    pub contact_info: ContactInfo,

    /// Lab processing options
    #[serde(default)]
    pub processing_options: ProcessingOptions,
}

impl OrderRequest {
    /// Load a checkout form from a YAML or JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        read_document(path.as_ref())
    }
}

/// Order lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet picked up by the lab
    #[default]
    Pending,

    /// Being printed
    Processing,

    /// Printed and handed off for delivery
    Completed,
}

impl OrderStatus {
    /// Return the status identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate an order number of the form `ORD-NNNNNN`.
pub fn generate_order_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ORD-{}", rng.gen_range(100_000..=999_999))
}

/// A submitted order.
#[derive(Debug, Clone)]
pub struct OrderSubmission<'a> {
    number: String,
    created_at: Timestamp,
    status: OrderStatus,
    contact: ContactInfo,
    options: ProcessingOptions,
    items: Vec<LineItem>,
    breakdown: OrderBreakdown<'a>,
}

impl<'a> OrderSubmission<'a> {
    /// Validate and price an order.
    ///
    /// Contact details are checked first, then the cart, then the order is
    /// priced against `snapshot` at `now`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if a contact field is blank, the cart is
    /// empty or pricing fails.
    pub fn submit<R: Rng + ?Sized>(
        contact: ContactInfo,
        options: ProcessingOptions,
        items: Vec<LineItem>,
        snapshot: &SettingsSnapshot<'a>,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Self, OrderError> {
        contact.validate()?;

        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let breakdown = snapshot.price(&items, now)?;
        let number = generate_order_number(rng);

        info!(
            order_number = %number,
            total_quantity = breakdown.total_quantity,
            grand_total = %breakdown.grand_total,
            "order submitted"
        );

        Ok(Self {
            number,
            created_at: now,
            status: OrderStatus::Pending,
            contact,
            options,
            items,
            breakdown,
        })
    }

    /// Return the order number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Return when the order was submitted.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Return the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Move the order to a new status.
    pub fn set_status(&mut self, status: OrderStatus) {
        info!(order_number = %self.number, from = %self.status, to = %status, "order status changed");

        self.status = status;
    }

    /// Return the customer's contact details.
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Return the processing options.
    pub fn options(&self) -> ProcessingOptions {
        self.options
    }

    /// Return the ordered line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Return the pricing breakdown.
    pub fn breakdown(&self) -> &OrderBreakdown<'a> {
        &self.breakdown
    }

    /// Convert to a serializable record.
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            order_number: self.number.clone(),
            status: self.status,
            created_at: self.created_at,
            contact_info: self.contact.clone(),
            processing_options: self.options,
            photo_settings: self.items.clone(),
            total_photos: self.breakdown.total_quantity,
            breakdown: self.breakdown.to_record(),
        }
    }

    /// Render the `order_details.txt` sheet, with times shown in `time_zone`.
    pub fn details<'o>(&'o self, time_zone: &'o TimeZone) -> OrderDetails<'o, 'a> {
        OrderDetails {
            order: self,
            time_zone,
        }
    }
}

/// Serializable form of a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// `ORD-NNNNNN`
    pub order_number: String,
    /// Current status
    pub status: OrderStatus,
    /// Submission time
    pub created_at: Timestamp,
    /// Customer contact details
    pub contact_info: ContactInfo,
    /// Lab processing options
    pub processing_options: ProcessingOptions,
    /// Ordered line items
    pub photo_settings: Vec<LineItem>,
    /// Total number of prints
    pub total_photos: u64,
    /// Pricing breakdown
    pub breakdown: BreakdownRecord,
}

/// Plain-text order details sheet.
#[derive(Debug)]
pub struct OrderDetails<'o, 'a> {
    order: &'o OrderSubmission<'a>,
    time_zone: &'o TimeZone,
}

impl fmt::Display for OrderDetails<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.order;
        let contact = &order.contact;
        let created_at = order.created_at.to_zoned(self.time_zone.clone());

        writeln!(f, "ORDER NUMBER: {}", order.number)?;
        writeln!(f, "DATE: {}", created_at.strftime("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;

        writeln!(f, "CUSTOMER INFORMATION:")?;
        writeln!(f, "Name: {}", contact.full_name)?;
        writeln!(f, "Email: {}", contact.email)?;
        writeln!(f, "Phone: {}", contact.phone)?;
        writeln!(f, "Address: {}", contact.address)?;
        writeln!(
            f,
            "Notes: {}",
            contact
                .notes
                .as_deref()
                .filter(|notes| !notes.trim().is_empty())
                .unwrap_or("N/A")
        )?;
        writeln!(f)?;

        writeln!(f, "PHOTO PROCESSING OPTIONS:")?;
        writeln!(f, "Crop to format: {}", yes_no(order.options.crop_to_format))?;
        writeln!(f, "Fill with white: {}", yes_no(order.options.fill_white))?;
        writeln!(f)?;

        writeln!(f, "PHOTO DETAILS:")?;

        for (idx, item) in order.items.iter().enumerate() {
            writeln!(f, "---")?;
            writeln!(f, "Photo {}: {}", idx + 1, item.file_name())?;
            writeln!(f, "Format: {} cm", item.format())?;
            writeln!(f, "Quantity: {}", item.quantity())?;
            writeln!(f, "Finish: {}", capitalize(item.finish().as_str()))?;
        }

        writeln!(f)?;
        writeln!(f, "TOTAL PHOTOS: {} prints", total_quantity(&order.items))?;
        writeln!(f)?;

        let record = order.breakdown.to_record();
        let currency = &record.currency;

        writeln!(f, "PRICING:")?;
        writeln!(f, "Subtotal: {} {currency}", record.subtotal)?;

        if record.quantity_discount_percent > 0 {
            writeln!(
                f,
                "Quantity discount ({}%): -{} {currency}",
                record.quantity_discount_percent, record.quantity_discount_amount
            )?;
        }

        if record.promotion_discount_percent > 0 {
            writeln!(
                f,
                "Promotion ({}%): -{} {currency}",
                record.promotion_discount_percent, record.promotion_discount_amount
            )?;
        }

        if order.breakdown.has_free_delivery() {
            writeln!(f, "Delivery: Free")?;
        } else {
            writeln!(f, "Delivery: {} {currency}", record.delivery_fee)?;
        }

        writeln!(f, "TOTAL: {} {currency}", record.grand_total)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::TimeZone;
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use crate::{
        formats::{Finish, Format},
        settings::SettingsDocument,
    };

    use super::*;

    fn snapshot() -> Result<SettingsSnapshot<'static>, Box<dyn std::error::Error>> {
        let document: SettingsDocument = serde_norway::from_str(
            "prices:\n  \"10x15\": 18\n  \"20x30\": 150\ndiscounts:\n  \"50\": 5\n",
        )?;

        Ok(SettingsSnapshot::from_document(document, &TimeZone::UTC)?)
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            full_name: "Marko Marković".to_string(),
            email: "marko@example.com".to_string(),
            phone: "+381 60 123 4567".to_string(),
            address: "Knez Mihailova 1, Beograd".to_string(),
            notes: None,
        }
    }

    fn items() -> Result<Vec<LineItem>, crate::items::ItemError> {
        Ok(vec![
            LineItem::new("beach.jpg", Format::Cm10x15, 60, Finish::Glossy)?,
            LineItem::new("family.jpg", Format::Cm20x30, 2, Finish::Matte)?,
        ])
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2025-06-01T09:30:00Z".parse()
    }

    #[test]
    fn generate_order_number_has_six_digits() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let number = generate_order_number(&mut rng);
            let digits = number.strip_prefix("ORD-").unwrap_or_default();

            assert_eq!(digits.len(), 6, "{number}");
            assert!(digits.chars().all(|c| c.is_ascii_digit()), "{number}");
            assert!(!digits.starts_with('0'), "{number}");
        }
    }

    #[test]
    fn validate_reports_first_blank_field() {
        let mut contact = contact();
        contact.phone = "   ".to_string();
        contact.address = String::new();

        assert_eq!(
            contact.validate(),
            Err(OrderError::MissingContactField("phone"))
        );
    }

    #[test]
    fn validate_allows_missing_notes() {
        assert_eq!(contact().validate(), Ok(()));
    }

    #[test]
    fn submit_prices_and_starts_pending() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let order = OrderSubmission::submit(
            contact(),
            ProcessingOptions::default(),
            items()?,
            &snapshot,
            now()?,
            &mut rng,
        )?;

        assert!(order.number().starts_with("ORD-"));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.created_at(), now()?);
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.breakdown().total_quantity, 62);

        Ok(())
    }

    #[test]
    fn submit_checks_contact_before_cart() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let result = OrderSubmission::submit(
            ContactInfo::default(),
            ProcessingOptions::default(),
            Vec::new(),
            &snapshot,
            now()?,
            &mut rng,
        );

        assert!(matches!(
            result,
            Err(OrderError::MissingContactField("fullName"))
        ));

        Ok(())
    }

    #[test]
    fn submit_rejects_empty_cart() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let result = OrderSubmission::submit(
            contact(),
            ProcessingOptions::default(),
            Vec::new(),
            &snapshot,
            now()?,
            &mut rng,
        );

        assert!(matches!(result, Err(OrderError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn submit_rejects_unpriced_formats() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let result = OrderSubmission::submit(
            contact(),
            ProcessingOptions::default(),
            vec![LineItem::new("a.jpg", Format::Cm30x45, 1, Finish::Glossy)?],
            &snapshot,
            now()?,
            &mut rng,
        );

        assert!(matches!(result, Err(OrderError::Pricing(_))));

        Ok(())
    }

    #[test]
    fn set_status_moves_through_lifecycle() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let mut order = OrderSubmission::submit(
            contact(),
            ProcessingOptions::default(),
            items()?,
            &snapshot,
            now()?,
            &mut rng,
        )?;

        order.set_status(OrderStatus::Processing);
        assert_eq!(order.status().to_string(), "processing");

        order.set_status(OrderStatus::Completed);
        assert_eq!(order.status(), OrderStatus::Completed);

        Ok(())
    }

    #[test]
    fn details_lists_contact_photos_and_pricing() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let order = OrderSubmission::submit(
            contact(),
            ProcessingOptions {
                crop_to_format: true,
                fill_white: false,
            },
            items()?,
            &snapshot,
            now()?,
            &mut rng,
        )?;

        let details = order.details(&TimeZone::UTC).to_string();

        assert!(details.starts_with(&format!("ORDER NUMBER: {}\n", order.number())));
        assert!(details.contains("DATE: 2025-06-01 09:30:00\n"));
        assert!(details.contains("Name: Marko Marković\n"));
        assert!(details.contains("Notes: N/A\n"));
        assert!(details.contains("Crop to format: YES\n"));
        assert!(details.contains("Fill with white: NO\n"));
        assert!(details.contains("Photo 2: family.jpg\nFormat: 20x30 cm\nQuantity: 2\nFinish: Matte\n"));
        assert!(details.contains("TOTAL PHOTOS: 62 prints\n"));

        // 60 x 18 + 2 x 150 = 1380, 5% = 69
        assert!(details.contains("Subtotal: 1380.00 RSD\n"));
        assert!(details.contains("Quantity discount (5%): -69.00 RSD\n"));
        assert!(!details.contains("Promotion"));
        assert!(details.contains("Delivery: 400.00 RSD\n"));
        assert!(details.ends_with("TOTAL: 1711.00 RSD\n"));

        Ok(())
    }

    #[test]
    fn to_record_serializes_storefront_shape() -> TestResult {
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = snapshot()?;

        let order = OrderSubmission::submit(
            contact(),
            ProcessingOptions::default(),
            items()?,
            &snapshot,
            now()?,
            &mut rng,
        )?;

        let value = serde_json::to_value(order.to_record())?;

        assert_eq!(value["orderNumber"], order.number());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["totalPhotos"], 62);
        assert_eq!(value["contactInfo"]["fullName"], "Marko Marković");
        assert_eq!(value["photoSettings"][1]["format"], "20x30");
        assert_eq!(value["breakdown"]["quantityDiscountPercent"], 5);

        Ok(())
    }

    #[test]
    fn order_request_reads_checkout_form() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("order.json");
        std::fs::write(
            &path,
            r#"{"contactInfo":{"fullName":"Ana","email":"ana@example.com","phone":"060","address":"Novi Sad"},"processingOptions":{"fillWhite":true}}"#,
        )?;

        let request = OrderRequest::from_path(&path)?;

        assert_eq!(request.contact_info.full_name, "Ana");
        assert_eq!(request.contact_info.notes, None);
        assert!(request.processing_options.fill_white);
        assert!(!request.processing_options.crop_to_format);

        Ok(())
    }

    #[test]
    fn contact_info_reads_storefront_json() -> TestResult {
        let contact: ContactInfo = serde_json::from_str(
            r#"{"fullName":"Ana","email":"ana@example.com","phone":"060","address":"Novi Sad","notes":"Hitno"}"#,
        )?;

        assert_eq!(contact.full_name, "Ana");
        assert_eq!(contact.notes.as_deref(), Some("Hitno"));

        Ok(())
    }
}
