//! Line Items

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formats::{Finish, Format};

/// Errors raised when building or mutating a line item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    /// Quantities must be whole numbers of at least one print.
    #[error("invalid quantity {0}; at least one print is required")]
    InvalidQuantity(i64),
}

/// One uploaded photo's print configuration.
///
/// All prints of the same photo share a single line item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    file_name: String,
    format: Format,
    quantity: NonZeroU32,
    finish: Finish,
}

impl LineItem {
    /// Create a line item.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::InvalidQuantity`] if `quantity` is zero, negative or
    /// does not fit in a `u32`.
    pub fn new(
        file_name: impl Into<String>,
        format: Format,
        quantity: i64,
        finish: Finish,
    ) -> Result<Self, ItemError> {
        Ok(Self {
            file_name: file_name.into(),
            format,
            quantity: validate_quantity(quantity)?,
            finish,
        })
    }

    /// A single glossy 10x15 print, the storefront default for a fresh upload.
    pub fn with_defaults(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            format: Format::default(),
            quantity: NonZeroU32::MIN,
            finish: Finish::default(),
        }
    }

    /// Returns the uploaded file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the print format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the number of prints.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Returns the paper finish.
    pub fn finish(&self) -> Finish {
        self.finish
    }

    pub(crate) fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub(crate) fn set_finish(&mut self, finish: Finish) {
        self.finish = finish;
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) -> Result<(), ItemError> {
        self.quantity = validate_quantity(quantity)?;

        Ok(())
    }
}

/// Validate a requested quantity at the mutation boundary.
fn validate_quantity(quantity: i64) -> Result<NonZeroU32, ItemError> {
    u32::try_from(quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ItemError::InvalidQuantity(quantity))
}

/// Total number of prints across all line items.
///
/// Only used to select a quantity discount tier, never to compute a price.
pub fn total_quantity(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}
