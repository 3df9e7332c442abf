//! Photoprint
//!
//! Pricing and discount composition for photo print orders: per-format unit
//! prices, quantity tiers, time-bounded promotions and conditional delivery.

pub mod breakdown;
pub mod cart;
pub mod catalog;
pub mod delivery;
pub mod discounts;
pub mod formats;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod schedule;
pub mod settings;
