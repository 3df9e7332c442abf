//! Photoprint prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    breakdown::{BreakdownError, BreakdownRecord, OrderBreakdown},
    cart::{Cart, CartError},
    catalog::{CatalogError, PriceCatalog},
    delivery::DeliveryPolicy,
    discounts::{DiscountAmounts, DiscountError, DiscountPercent, compute_discounts},
    formats::{Finish, Format, FormatError},
    items::{ItemError, LineItem},
    orders::{
        ContactInfo, OrderError, OrderRecord, OrderRequest, OrderStatus, OrderSubmission,
        ProcessingOptions,
    },
    pricing::{PricingError, price_order},
    promotions::{Promotion, PromotionTarget},
    schedule::{DiscountSchedule, DiscountTier, ScheduleError},
    settings::{SettingsError, SettingsSnapshot, StoreInfo},
};
