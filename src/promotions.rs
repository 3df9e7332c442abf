//! Promotions
//!
//! A single admin-managed campaign. When it applies, its discount covers the
//! whole order, not just the matching line items.

use std::fmt;

use jiff::Timestamp;

use crate::{discounts::DiscountPercent, formats::Format, items::LineItem};

/// What a promotion targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromotionTarget {
    /// Every order qualifies.
    #[default]
    AllFormats,

    /// Orders containing at least one print of this format qualify.
    Format(Format),
}

impl fmt::Display for PromotionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionTarget::AllFormats => f.write_str("all"),
            PromotionTarget::Format(format) => write!(f, "{format}"),
        }
    }
}

/// A time-bounded promotional campaign.
#[derive(Clone, Debug, PartialEq)]
pub struct Promotion {
    /// Admin toggle
    pub is_active: bool,

    /// Qualifying format
    pub target: PromotionTarget,

    /// Discount on the whole order subtotal
    pub discount_percent: DiscountPercent,

    /// Banner text shown to customers
    pub message: String,

    /// The campaign stops applying at this instant
    pub valid_until: Option<Timestamp>,
}

impl Promotion {
    /// Return `true` once `now` has reached `valid_until`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.valid_until.is_some_and(|until| now >= until)
    }

    /// Return `true` if the campaign is switched on and not expired.
    pub fn is_in_effect(&self, now: Timestamp) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// Return whether this promotion applies to the given line items at `now`.
    ///
    /// A single matching line item is enough for a format-specific campaign.
    pub fn applies_to(&self, items: &[LineItem], now: Timestamp) -> bool {
        if !self.is_in_effect(now) {
            return false;
        }

        match self.target {
            PromotionTarget::AllFormats => true,
            PromotionTarget::Format(format) => items.iter().any(|item| item.format() == format),
        }
    }
}

/// Return whether an optional promotion applies to the given line items at `now`.
pub fn promotion_applies(promotion: Option<&Promotion>, items: &[LineItem], now: Timestamp) -> bool {
    promotion.is_some_and(|promotion| promotion.applies_to(items, now))
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::formats::Finish;

    use super::*;

    fn now() -> Result<Timestamp, jiff::Error> {
        "2025-06-01T12:00:00Z".parse()
    }

    fn promotion(target: PromotionTarget, valid_until: Option<Timestamp>) -> Promotion {
        Promotion {
            is_active: true,
            target,
            discount_percent: DiscountPercent::FULL,
            message: "Summer sale".to_string(),
            valid_until,
        }
    }

    fn items() -> Result<Vec<LineItem>, Box<dyn std::error::Error>> {
        Ok(vec![
            LineItem::new("a.jpg", Format::Cm10x15, 3, Finish::Glossy)?,
            LineItem::new("b.jpg", Format::Cm20x30, 1, Finish::Matte)?,
        ])
    }

    #[test]
    fn absent_promotion_never_applies() -> TestResult {
        assert!(!promotion_applies(None, &items()?, now()?));

        Ok(())
    }

    #[test]
    fn inactive_promotion_does_not_apply() -> TestResult {
        let mut promo = promotion(PromotionTarget::AllFormats, None);
        promo.is_active = false;

        assert!(!promo.applies_to(&items()?, now()?));

        Ok(())
    }

    #[test]
    fn all_formats_promotion_applies_without_expiry() -> TestResult {
        let promo = promotion(PromotionTarget::AllFormats, None);

        assert!(promotion_applies(Some(&promo), &items()?, now()?));

        Ok(())
    }

    #[test]
    fn expiry_is_inclusive() -> TestResult {
        let now = now()?;
        let promo = promotion(PromotionTarget::AllFormats, Some(now));

        assert!(promo.is_expired(now));
        assert!(!promo.applies_to(&items()?, now));

        let later = promotion(
            PromotionTarget::AllFormats,
            Some(now.checked_add(SignedDuration::from_secs(1))?),
        );

        assert!(later.applies_to(&items()?, now));

        Ok(())
    }

    #[test]
    fn format_promotion_needs_one_matching_item() -> TestResult {
        let matching = promotion(PromotionTarget::Format(Format::Cm20x30), None);
        let missing = promotion(PromotionTarget::Format(Format::Cm30x45), None);

        assert!(matching.applies_to(&items()?, now()?));
        assert!(!missing.applies_to(&items()?, now()?));

        Ok(())
    }

    #[test]
    fn target_displays_storefront_identifier() {
        assert_eq!(PromotionTarget::AllFormats.to_string(), "all");
        assert_eq!(PromotionTarget::Format(Format::Cm13x18).to_string(), "13x18");
    }
}
