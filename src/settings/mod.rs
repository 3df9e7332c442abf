//! Settings Snapshot
//!
//! A consistent, read-only copy of everything the settings store supplies to
//! pricing. Values are validated once, here, when the document is converted
//! into domain types; the pricing engine trusts them afterwards.

use std::{fs, path::Path};

use jiff::{Timestamp, tz::TimeZone};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    breakdown::OrderBreakdown,
    catalog::{CatalogError, PriceCatalog},
    delivery::DeliveryPolicy,
    discounts::DiscountError,
    formats::FormatError,
    items::LineItem,
    pricing::{PricingError, price_order},
    promotions::{Promotion, PromotionTarget},
    schedule::DiscountSchedule,
    settings::{
        discounts::DiscountsDocument,
        prices::{PricesDocument, StoreSettingsDocument, parse_currency},
        promotion::PromotionDocument,
    },
};

pub mod discounts;
pub mod prices;
pub mod promotion;

/// Settings loading and validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading a document
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Documents must be `.yml`, `.yaml` or `.json`
    #[error("Unsupported settings file extension: {0}")]
    UnsupportedExtension(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown print format
    #[error(transparent)]
    UnknownFormat(#[from] FormatError),

    /// Invalid price
    #[error("Invalid price for {0}")]
    InvalidPrice(String),

    /// Invalid discount percent
    #[error("Invalid discount percent for {field}: {source}")]
    InvalidPercent {
        /// Setting the percent was read from
        field: String,
        /// Underlying range error
        source: DiscountError,
    },

    /// Invalid quantity tier threshold
    #[error("Invalid discount threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid `validUntil` timestamp
    #[error("Invalid promotion expiry: {0}")]
    InvalidTimestamp(String),

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Settings document, in the shape the admin panel stores it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    /// ISO currency code for every amount
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Unit price per format, in major units
    pub prices: PricesDocument,

    /// Quantity discount tiers
    #[serde(default)]
    pub discounts: DiscountsDocument,

    /// The promotional campaign, if one is configured
    #[serde(default)]
    pub promotion: Option<PromotionDocument>,

    /// Delivery and contact settings
    #[serde(default)]
    pub settings: StoreSettingsDocument,
}

fn default_currency() -> String {
    "RSD".to_string()
}

/// Store contact details shown alongside the order summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreInfo {
    /// Contact phone number
    pub contact_phone: String,

    /// Contact e-mail address
    pub contact_email: String,

    /// Opening hours text
    pub working_hours: String,
}

/// Everything pricing needs, read from the settings store at one point in time.
#[derive(Debug, Clone)]
pub struct SettingsSnapshot<'a> {
    /// Unit prices
    pub catalog: PriceCatalog<'a>,

    /// Quantity discount tiers
    pub schedule: DiscountSchedule,

    /// At most one promotional campaign
    pub promotion: Option<Promotion>,

    /// Delivery fee and free delivery threshold
    pub delivery: DeliveryPolicy<'a>,

    /// Contact details
    pub store: StoreInfo,
}

impl SettingsSnapshot<'static> {
    /// Load a snapshot from a YAML or JSON document.
    ///
    /// Civil `validUntil` values (without an offset) are read in `time_zone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any value
    /// fails validation.
    pub fn from_path(path: impl AsRef<Path>, time_zone: &TimeZone) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let document: SettingsDocument = read_document(path)?;

        debug!(path = %path.display(), "loaded settings document");

        Self::from_document(document, time_zone)
    }

    /// Validate a parsed settings document.
    ///
    /// # Errors
    ///
    /// Returns an error if any value fails validation.
    pub fn from_document(
        document: SettingsDocument,
        time_zone: &TimeZone,
    ) -> Result<Self, SettingsError> {
        let currency = parse_currency(&document.currency)?;

        let catalog = document.prices.into_catalog(currency)?;
        let schedule = document.discounts.into_schedule()?;
        let promotion = document
            .promotion
            .map(|promotion| promotion.into_promotion(time_zone))
            .transpose()?;
        let (delivery, store) = document.settings.into_parts(currency)?;

        let snapshot = Self {
            catalog,
            schedule,
            promotion,
            delivery,
            store,
        };

        snapshot.log_issues();

        Ok(snapshot)
    }
}

impl<'a> SettingsSnapshot<'a> {
    /// Price a cart against this snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the cart is empty or references an unpriced format.
    pub fn price(&self, items: &[LineItem], now: Timestamp) -> Result<OrderBreakdown<'a>, PricingError> {
        price_order(
            items,
            &self.catalog,
            &self.schedule,
            self.promotion.as_ref(),
            &self.delivery,
            now,
        )
    }

    /// Return the promotion message to show customers, if a campaign is in effect.
    pub fn promotion_banner(&self, now: Timestamp) -> Option<&str> {
        self.promotion
            .as_ref()
            .filter(|promotion| promotion.is_in_effect(now))
            .map(|promotion| promotion.message.as_str())
    }

    /// Log configuration problems for admin review, returning how many were found.
    ///
    /// None of these block pricing.
    pub fn log_issues(&self) -> usize {
        let mut issues = self.schedule.log_issues();

        if let Some(promotion) = &self.promotion
            && let PromotionTarget::Format(format) = promotion.target
            && !self.catalog.contains(format)
        {
            warn!(%format, "promotion targets a format missing from the price catalog");
            issues += 1;
        }

        issues
    }
}

/// Read a YAML or JSON document, picking the parser from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or has an unknown extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yml" | "yaml") => Ok(serde_norway::from_str(&fs::read_to_string(path)?)?),
        Some("json") => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        _ => Err(SettingsError::UnsupportedExtension(
            path.display().to_string(),
        )),
    }
}
