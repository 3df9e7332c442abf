//! Promotion settings

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use serde::Deserialize;

use crate::{
    discounts::DiscountPercent,
    formats::Format,
    promotions::{Promotion, PromotionTarget},
    settings::SettingsError,
};

/// Promotion as stored by the admin panel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDocument {
    /// Admin toggle
    #[serde(default)]
    pub is_active: bool,

    /// `"all"` or a format identifier
    #[serde(default = "default_target")]
    pub format: String,

    /// Whole-order discount in percent
    #[serde(default)]
    pub discount_percent: u32,

    /// Banner text
    #[serde(default)]
    pub message: String,

    /// Expiry; empty or missing means the campaign never expires
    #[serde(default)]
    pub valid_until: Option<String>,
}

fn default_target() -> String {
    "all".to_string()
}

impl PromotionDocument {
    /// Validate the campaign, reading civil expiry times in `time_zone`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown format, a percent above 100 or an
    /// unparseable expiry.
    pub fn into_promotion(self, time_zone: &TimeZone) -> Result<Promotion, SettingsError> {
        let target = parse_target(&self.format)?;

        let discount_percent = DiscountPercent::new(self.discount_percent).map_err(|source| {
            SettingsError::InvalidPercent {
                field: "promotion.discountPercent".to_string(),
                source,
            }
        })?;

        let valid_until = self
            .valid_until
            .as_deref()
            .map(|value| parse_valid_until(value, time_zone))
            .transpose()?
            .flatten();

        Ok(Promotion {
            is_active: self.is_active,
            target,
            discount_percent,
            message: self.message,
            valid_until,
        })
    }
}

/// Parse a promotion target, accepting `"all"` in any case.
///
/// # Errors
///
/// Returns [`SettingsError::UnknownFormat`] for unrecognised formats.
pub fn parse_target(value: &str) -> Result<PromotionTarget, SettingsError> {
    let value = value.trim();

    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(PromotionTarget::AllFormats);
    }

    Ok(PromotionTarget::Format(value.parse::<Format>()?))
}

/// Parse a promotion expiry.
///
/// Accepts RFC 3339 instants, civil date-times such as `2025-12-31T23:59`
/// and bare dates (midnight at the start of the day). Civil values are read
/// in `time_zone`. An empty value means no expiry.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidTimestamp`] if the value matches none of those.
pub fn parse_valid_until(
    value: &str,
    time_zone: &TimeZone,
) -> Result<Option<Timestamp>, SettingsError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    let invalid = || SettingsError::InvalidTimestamp(value.to_string());

    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Ok(Some(timestamp));
    }

    let civil = match value.parse::<DateTime>() {
        Ok(datetime) => datetime,
        Err(_) => value.parse::<Date>().map_err(|_err| invalid())?.into(),
    };

    let zoned = civil
        .to_zoned(time_zone.clone())
        .map_err(|_err| invalid())?;

    Ok(Some(zoned.timestamp()))
}
