//! Price Catalog

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::formats::Format;

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A line item references a format the catalog has no price for.
    #[error("no price configured for format {0}")]
    UnknownFormat(Format),

    /// Unit prices must not be negative.
    #[error("negative price configured for format {0}")]
    NegativePrice(Format),

    /// A price's currency differs from the catalog currency (format, price currency, catalog currency).
    #[error("Price for {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(Format, &'static str, &'static str),
}

/// Unit prices per print format, in a single currency.
#[derive(Debug, Clone)]
pub struct PriceCatalog<'a> {
    prices: FxHashMap<Format, Money<'a, Currency>>,
    currency: &'static Currency,
}

impl<'a> PriceCatalog<'a> {
    /// Create an empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            prices: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from `(format, unit price)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a price is negative or in another currency.
    pub fn with_prices(
        prices: impl IntoIterator<Item = (Format, Money<'a, Currency>)>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for (format, price) in prices {
            catalog.set_price(format, price)?;
        }

        Ok(catalog)
    }

    /// Set the unit price for a format, returning the previous price if any.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the price is negative or in another currency.
    pub fn set_price(
        &mut self,
        format: Format,
        price: Money<'a, Currency>,
    ) -> Result<Option<Money<'a, Currency>>, CatalogError> {
        if price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                format,
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(format));
        }

        Ok(self.prices.insert(format, price))
    }

    /// Look up the unit price of a format.
    ///
    /// Lookups are strict: a missing format is a configuration error and is
    /// never priced at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownFormat`] if the format has no price.
    pub fn unit_price(&self, format: Format) -> Result<Money<'a, Currency>, CatalogError> {
        self.prices
            .get(&format)
            .copied()
            .ok_or(CatalogError::UnknownFormat(format))
    }

    /// Check whether a format has a configured price.
    pub fn contains(&self, format: Format) -> bool {
        self.prices.contains_key(&format)
    }

    /// Iterate over configured prices, smallest format first.
    pub fn iter(&self) -> impl Iterator<Item = (Format, Money<'a, Currency>)> + '_ {
        Format::ALL
            .into_iter()
            .filter_map(|format| self.prices.get(&format).map(|price| (format, *price)))
    }

    /// Get the number of priced formats.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if the catalog has no prices.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, RSD};
    use testresult::TestResult;

    use super::*;

    fn test_catalog<'a>() -> Result<PriceCatalog<'a>, CatalogError> {
        PriceCatalog::with_prices(
            [
                (Format::Cm9x13, Money::from_major(12, RSD)),
                (Format::Cm10x15, Money::from_major(18, RSD)),
            ],
            RSD,
        )
    }

    #[test]
    fn unit_price_returns_configured_price() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(
            catalog.unit_price(Format::Cm10x15)?,
            Money::from_major(18, RSD)
        );

        Ok(())
    }

    #[test]
    fn unit_price_rejects_missing_format() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(
            catalog.unit_price(Format::Cm30x45),
            Err(CatalogError::UnknownFormat(Format::Cm30x45))
        );

        Ok(())
    }

    #[test]
    fn set_price_rejects_negative_prices() {
        let mut catalog = PriceCatalog::new(RSD);

        let result = catalog.set_price(Format::Cm13x18, Money::from_major(-1, RSD));

        assert_eq!(result, Err(CatalogError::NegativePrice(Format::Cm13x18)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn set_price_rejects_currency_mismatch() {
        let mut catalog = PriceCatalog::new(RSD);

        let result = catalog.set_price(Format::Cm13x18, Money::from_major(1, EUR));

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(Format::Cm13x18, "EUR", "RSD"))
        ));
    }

    #[test]
    fn set_price_replaces_previous_price() -> TestResult {
        let mut catalog = test_catalog()?;

        let previous = catalog.set_price(Format::Cm9x13, Money::from_major(15, RSD))?;

        assert_eq!(previous, Some(Money::from_major(12, RSD)));
        assert_eq!(catalog.unit_price(Format::Cm9x13)?, Money::from_major(15, RSD));
        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[test]
    fn iter_is_ordered_by_format() -> TestResult {
        let catalog = PriceCatalog::with_prices(
            [
                (Format::Cm20x30, Money::from_major(150, RSD)),
                (Format::Cm9x13, Money::from_major(12, RSD)),
            ],
            RSD,
        )?;

        let formats: Vec<Format> = catalog.iter().map(|(format, _)| format).collect();

        assert_eq!(formats, vec![Format::Cm9x13, Format::Cm20x30]);
        assert!(catalog.contains(Format::Cm20x30));
        assert!(!catalog.contains(Format::Cm10x15));

        Ok(())
    }
}
