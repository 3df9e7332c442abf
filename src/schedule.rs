//! Quantity Discount Schedule
//!
//! Whole-order discounts keyed on the total number of prints. Tiers are step
//! functions (e.g. 50 prints for 5%, 100 for 10%); the single highest tier the
//! order reaches applies, and tiers never stack.

use std::num::NonZeroU32;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::discounts::DiscountPercent;

/// Configuration problems in a discount schedule.
///
/// None of these block pricing; they are reported for admin review.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Tier thresholds must be at least one print.
    #[error("tier threshold must be greater than zero")]
    ZeroThreshold,

    /// Two tiers share a threshold; the first one listed is used.
    #[error("duplicate tier threshold {0}")]
    DuplicateThreshold(u32),

    /// A larger threshold grants a smaller discount than a smaller one.
    #[error("tier at {threshold} prints gives {percent} but a smaller tier gives more")]
    NonMonotonic {
        /// Threshold of the offending tier
        threshold: u32,
        /// Percent of the offending tier
        percent: DiscountPercent,
    },
}

/// A single quantity discount tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscountTier {
    threshold: NonZeroU32,
    percent: DiscountPercent,
}

impl DiscountTier {
    /// Create a new tier.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ZeroThreshold`] if `threshold` is zero.
    pub fn new(threshold: u32, percent: DiscountPercent) -> Result<Self, ScheduleError> {
        let threshold = NonZeroU32::new(threshold).ok_or(ScheduleError::ZeroThreshold)?;

        Ok(Self { threshold, percent })
    }

    /// Return the minimum number of prints for this tier.
    pub fn threshold(&self) -> u32 {
        self.threshold.get()
    }

    /// Return the discount granted by this tier.
    pub fn percent(&self) -> DiscountPercent {
        self.percent
    }
}

/// Ordered set of quantity discount tiers.
#[derive(Clone, Debug, Default)]
pub struct DiscountSchedule {
    tiers: SmallVec<[DiscountTier; 4]>,
}

impl DiscountSchedule {
    /// Create a schedule from tiers, in the order the settings store lists them.
    pub fn new(tiers: impl IntoIterator<Item = DiscountTier>) -> Self {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Return the tiers.
    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// Check if the schedule has no tiers.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Pick the tier with the largest threshold the order reaches.
    ///
    /// On duplicate thresholds the first tier listed wins and a warning is logged.
    pub fn select_tier(&self, total_quantity: u64) -> Option<&DiscountTier> {
        let selected = self
            .tiers
            .iter()
            .filter(|tier| u64::from(tier.threshold()) <= total_quantity)
            .fold(None, |best: Option<&DiscountTier>, tier| match best {
                Some(best) if best.threshold >= tier.threshold => Some(best),
                _ => Some(tier),
            });

        if let Some(tier) = selected
            && self.is_duplicated(tier.threshold)
        {
            warn!(
                threshold = tier.threshold(),
                percent = tier.percent().points(),
                "duplicate discount tier threshold; using the first tier listed"
            );
        }

        selected
    }

    /// The discount percent for an order of `total_quantity` prints, or zero.
    pub fn select_quantity_tier(&self, total_quantity: u64) -> DiscountPercent {
        self.select_tier(total_quantity)
            .map_or(DiscountPercent::ZERO, DiscountTier::percent)
    }

    /// Report configuration problems for admin review.
    pub fn issues(&self) -> Vec<ScheduleError> {
        let mut issues = Vec::new();

        for (idx, tier) in self.tiers.iter().enumerate() {
            let seen_before = self
                .tiers
                .iter()
                .take(idx)
                .any(|other| other.threshold == tier.threshold);

            if seen_before {
                issues.push(ScheduleError::DuplicateThreshold(tier.threshold()));
            }
        }

        let mut ordered: Vec<&DiscountTier> = self.tiers.iter().collect();
        ordered.sort_by_key(|tier| tier.threshold);

        let mut best = DiscountPercent::ZERO;

        for tier in ordered {
            if tier.percent < best {
                issues.push(ScheduleError::NonMonotonic {
                    threshold: tier.threshold(),
                    percent: tier.percent,
                });
            }

            best = best.max(tier.percent);
        }

        issues
    }

    /// Log every configuration problem at `warn`, returning how many were found.
    pub fn log_issues(&self) -> usize {
        let issues = self.issues();

        for issue in &issues {
            warn!(%issue, "discount schedule needs admin review");
        }

        issues.len()
    }

    fn is_duplicated(&self, threshold: NonZeroU32) -> bool {
        self.tiers
            .iter()
            .filter(|tier| tier.threshold == threshold)
            .count()
            > 1
    }
}
