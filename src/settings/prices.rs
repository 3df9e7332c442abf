//! Price and delivery settings

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, RSD, USD},
};
use serde::Deserialize;

use crate::{
    catalog::PriceCatalog,
    delivery::DeliveryPolicy,
    formats::Format,
    settings::{SettingsError, StoreInfo},
};

/// Unit prices keyed by format identifier, in major units (e.g. `"10x15": 18`).
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct PricesDocument(pub BTreeMap<String, Decimal>);

impl PricesDocument {
    /// Validate prices and build a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown formats and negative or sub-minor-unit prices.
    pub fn into_catalog(
        self,
        currency: &'static Currency,
    ) -> Result<PriceCatalog<'static>, SettingsError> {
        let mut catalog = PriceCatalog::new(currency);

        for (key, amount) in self.0 {
            let format: Format = key.parse()?;
            let price = money_from_major(amount, currency, &key)?;

            catalog.set_price(format, price)?;
        }

        Ok(catalog)
    }
}

/// Delivery and contact settings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettingsDocument {
    /// Flat delivery fee
    pub delivery_price: Decimal,

    /// Discounted price from which delivery is free
    pub free_delivery_limit: Decimal,

    /// Contact phone number
    pub contact_phone: String,

    /// Contact e-mail address
    pub contact_email: String,

    /// Opening hours text
    pub working_hours: String,
}

impl Default for StoreSettingsDocument {
    fn default() -> Self {
        Self {
            delivery_price: Decimal::from(400),
            free_delivery_limit: Decimal::from(5000),
            contact_phone: String::new(),
            contact_email: String::new(),
            working_hours: String::new(),
        }
    }
}

impl StoreSettingsDocument {
    /// Validate amounts and split into the delivery policy and contact details.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidPrice`] for negative or sub-minor-unit amounts.
    pub fn into_parts(
        self,
        currency: &'static Currency,
    ) -> Result<(DeliveryPolicy<'static>, StoreInfo), SettingsError> {
        let fee = money_from_major(self.delivery_price, currency, "deliveryPrice")?;
        let free_threshold =
            money_from_major(self.free_delivery_limit, currency, "freeDeliveryLimit")?;

        let store = StoreInfo {
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            working_hours: self.working_hours,
        };

        Ok((DeliveryPolicy::new(fee, free_threshold), store))
    }
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns [`SettingsError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, SettingsError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "RSD" => Ok(RSD),
        "EUR" => Ok(EUR),
        "USD" => Ok(USD),
        "GBP" => Ok(GBP),
        _ => Err(SettingsError::UnknownCurrency(code.to_string())),
    }
}

/// Convert a major-unit amount into money, rejecting negative values and
/// amounts finer than the currency's minor unit.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidPrice`] naming `field`.
pub fn money_from_major(
    amount: Decimal,
    currency: &'static Currency,
    field: &str,
) -> Result<Money<'static, Currency>, SettingsError> {
    let invalid = || SettingsError::InvalidPrice(format!("{field}: {amount}"));

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid());
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(invalid)?;

    let minor = amount.checked_mul(scale).ok_or_else(invalid)?;

    if !minor.fract().is_zero() {
        return Err(invalid());
    }

    let minor = minor.to_i64().ok_or_else(invalid)?;

    Ok(Money::from_minor(minor, currency))
}
