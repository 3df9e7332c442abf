//! Quantity discount settings

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::{
    discounts::DiscountPercent,
    schedule::{DiscountSchedule, DiscountTier},
    settings::SettingsError,
};

/// Tier threshold as written in the settings document.
///
/// JSON object keys are always strings while YAML keys may be plain numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum ThresholdKey {
    /// Unquoted numeric key
    Number(u64),

    /// Quoted key, e.g. `"50"`
    Text(String),
}

impl ThresholdKey {
    /// Parse the key into a print count.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidThreshold`] if the key is not a whole number.
    pub fn threshold(&self) -> Result<u32, SettingsError> {
        let parsed = match self {
            ThresholdKey::Number(number) => u32::try_from(*number).ok(),
            ThresholdKey::Text(text) => text.trim().parse::<u32>().ok(),
        };

        parsed.ok_or_else(|| SettingsError::InvalidThreshold(self.to_string()))
    }
}

impl fmt::Display for ThresholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdKey::Number(number) => write!(f, "{number}"),
            ThresholdKey::Text(text) => f.write_str(text),
        }
    }
}

/// Tiers keyed by threshold, valued by percent (e.g. `"50": 5`).
///
/// Tiers are listed in key order, which decides which of two equal
/// thresholds (such as `"50"` and `"050"`) wins.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct DiscountsDocument(pub BTreeMap<ThresholdKey, u32>);

impl DiscountsDocument {
    /// Validate tiers and build a schedule.
    ///
    /// Duplicate and non-monotonic tiers are kept; the schedule reports them.
    ///
    /// # Errors
    ///
    /// Returns an error for zero or non-numeric thresholds and percents above 100.
    pub fn into_schedule(self) -> Result<DiscountSchedule, SettingsError> {
        let tiers = self
            .0
            .into_iter()
            .map(|(key, points)| {
                let percent =
                    DiscountPercent::new(points).map_err(|source| SettingsError::InvalidPercent {
                        field: format!("discounts.{key}"),
                        source,
                    })?;

                DiscountTier::new(key.threshold()?, percent)
                    .map_err(|_err| SettingsError::InvalidThreshold(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiscountSchedule::new(tiers))
    }
}
