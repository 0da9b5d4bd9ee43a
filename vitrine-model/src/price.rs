use crate::error::{ModelError, Result};

/// Upper bound shown on the price facet before any product has been seen.
pub const DEFAULT_PRICE_CEILING: f64 = 5_000_000.0;

/// Granularity of the displayed price ceiling.
pub const PRICE_DISPLAY_INCREMENT: f64 = 100_000.0;

/// Inclusive price bounds selected on the price facet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Strict constructor: both bounds finite, non-negative and ordered.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ModelError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lenient constructor for user-typed bounds. The smaller value becomes
    /// the minimum, negatives clamp to zero and non-finite input collapses to
    /// zero.
    pub fn normalized(a: f64, b: f64) -> Self {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let (a, b) = (clean(a), clean(b));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// `[0, ceiling]`, the unconstrained range for a given ceiling.
    pub fn full(ceiling: f64) -> Self {
        Self::normalized(0.0, ceiling)
    }

    /// True when the range does not narrow anything below `ceiling`.
    pub fn covers(&self, ceiling: f64) -> bool {
        self.min <= 0.0 && self.max >= ceiling
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::full(DEFAULT_PRICE_CEILING)
    }
}

/// Round `value` up to the next multiple of `increment`.
///
/// Non-positive increments leave the value untouched.
pub fn round_up_to_increment(value: f64, increment: f64) -> f64 {
    if increment <= 0.0 || !increment.is_finite() {
        return value;
    }
    (value / increment).ceil() * increment
}
