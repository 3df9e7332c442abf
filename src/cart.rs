//! Cart
//!
//! The upload session's list of line items. Every mutation goes through here,
//! so invalid quantities are rejected before anything reaches pricing.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    formats::{Finish, Format},
    items::{ItemError, LineItem, total_quantity},
    settings::{SettingsError, read_document},
};

/// Errors related to cart mutation or loading.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line item rejected the change.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// No photo exists at the given position.
    #[error("no photo at position {0}")]
    NoSuchPhoto(usize),

    /// The cart document could not be read or parsed.
    #[error("failed to load cart: {0}")]
    Load(#[from] SettingsError),
}

/// Cart document, as submitted by the storefront.
#[derive(Debug, Deserialize)]
struct CartDocument {
    #[serde(alias = "photoSettings")]
    photos: Vec<LineItem>,
}

/// Cart
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart with the given items.
    pub fn with_items(items: impl Into<Vec<LineItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Load a cart from a YAML or JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Load`] if the file cannot be read or parsed. Items
    /// with a zero quantity or unknown format fail to parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let document: CartDocument = read_document(path.as_ref())?;

        Ok(Self::with_items(document.photos))
    }

    /// Add an uploaded photo with the default print settings, returning its position.
    pub fn add_photo(&mut self, file_name: impl Into<String>) -> usize {
        self.push(LineItem::with_defaults(file_name))
    }

    /// Add a configured line item, returning its position.
    pub fn push(&mut self, item: LineItem) -> usize {
        self.items.push(item);

        self.items.len() - 1
    }

    /// Remove the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchPhoto`] if the position is out of range.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::NoSuchPhoto(index));
        }

        Ok(self.items.remove(index))
    }

    /// Change the print format of the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchPhoto`] if the position is out of range.
    pub fn set_format(&mut self, index: usize, format: Format) -> Result<(), CartError> {
        self.item_mut(index)?.set_format(format);

        Ok(())
    }

    /// Change the paper finish of the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchPhoto`] if the position is out of range.
    pub fn set_finish(&mut self, index: usize, finish: Finish) -> Result<(), CartError> {
        self.item_mut(index)?.set_finish(finish);

        Ok(())
    }

    /// Set the quantity of the photo at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Item`] if the quantity is below one, or
    /// [`CartError::NoSuchPhoto`] if the position is out of range.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CartError> {
        self.item_mut(index)?.set_quantity(quantity)?;

        Ok(())
    }

    /// Step the quantity of the photo at `index` up or down, never below one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchPhoto`] if the position is out of range, or
    /// [`CartError::Item`] if the result overflows.
    pub fn adjust_quantity(&mut self, index: usize, delta: i64) -> Result<u32, CartError> {
        let item = self.item_mut(index)?;
        let quantity = i64::from(item.quantity()).saturating_add(delta).max(1);

        item.set_quantity(quantity)?;

        Ok(item.quantity())
    }

    /// Get the line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total number of prints in the cart.
    pub fn total_quantity(&self) -> u64 {
        total_quantity(&self.items)
    }

    /// Get the number of photos in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut LineItem, CartError> {
        self.items
            .get_mut(index)
            .ok_or(CartError::NoSuchPhoto(index))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use super::*;

    fn test_cart() -> Result<Cart, ItemError> {
        Ok(Cart::with_items([
            LineItem::new("a.jpg", Format::Cm9x13, 2, Finish::Glossy)?,
            LineItem::new("b.jpg", Format::Cm20x30, 1, Finish::Matte)?,
        ]))
    }

    #[test]
    fn add_photo_uses_storefront_defaults() {
        let mut cart = Cart::new();

        let index = cart.add_photo("new.jpg");

        assert_eq!(index, 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(LineItem::format), Some(Format::Cm10x15));
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn remove_returns_item_and_rejects_bad_index() -> TestResult {
        let mut cart = test_cart()?;

        let removed = cart.remove(0)?;

        assert_eq!(removed.file_name(), "a.jpg");
        assert_eq!(cart.len(), 1);
        assert!(matches!(cart.remove(5), Err(CartError::NoSuchPhoto(5))));

        Ok(())
    }

    #[test]
    fn set_quantity_rejects_zero() -> TestResult {
        let mut cart = test_cart()?;

        let result = cart.set_quantity(0, 0);

        assert!(matches!(
            result,
            Err(CartError::Item(ItemError::InvalidQuantity(0)))
        ));
        assert_eq!(cart.total_quantity(), 3);

        Ok(())
    }

    #[test]
    fn adjust_quantity_is_clamped_at_one() -> TestResult {
        let mut cart = test_cart()?;

        assert_eq!(cart.adjust_quantity(0, 3)?, 5);
        assert_eq!(cart.adjust_quantity(0, -10)?, 1);
        assert_eq!(cart.adjust_quantity(1, -1)?, 1);

        Ok(())
    }

    #[test]
    fn set_format_and_finish_update_the_item() -> TestResult {
        let mut cart = test_cart()?;

        cart.set_format(1, Format::Cm30x45)?;
        cart.set_finish(1, Finish::Glossy)?;

        let item = cart.items().get(1).ok_or("missing item")?;

        assert_eq!(item.format(), Format::Cm30x45);
        assert_eq!(item.finish(), Finish::Glossy);
        assert!(matches!(
            cart.set_format(9, Format::Cm9x13),
            Err(CartError::NoSuchPhoto(9))
        ));

        Ok(())
    }

    #[test]
    fn from_path_loads_yaml_documents() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.yml");

        fs::write(
            &path,
            "photos:\n  - fileName: a.jpg\n    format: 10x15\n    quantity: 10\n    finish: glossy\n",
        )?;

        let cart = Cart::from_path(&path)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 10);

        Ok(())
    }

    #[test]
    fn from_path_accepts_photo_settings_json() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");

        fs::write(
            &path,
            r#"{"photoSettings":[{"fileName":"a.jpg","format":"9x13","quantity":2,"finish":"matte"}]}"#,
        )?;

        let cart = Cart::from_path(&path)?;

        assert_eq!(cart.into_items().len(), 1);

        Ok(())
    }

    #[test]
    fn from_path_rejects_unknown_formats() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.yml");

        fs::write(
            &path,
            "photos:\n  - fileName: a.jpg\n    format: 11x11\n    quantity: 1\n    finish: glossy\n",
        )?;

        assert!(matches!(Cart::from_path(&path), Err(CartError::Load(_))));

        Ok(())
    }
}
