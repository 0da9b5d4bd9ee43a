use vitrine_model::Product;
use vitrine_model::price::{
    DEFAULT_PRICE_CEILING, PRICE_DISPLAY_INCREMENT, round_up_to_increment,
};

/// How a display ceiling is derived from observed prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CeilingPolicy {
    pub increment: f64,
    /// Used until a load with live items has been seen.
    pub fallback: f64,
}

impl Default for CeilingPolicy {
    fn default() -> Self {
        Self {
            increment: PRICE_DISPLAY_INCREMENT,
            fallback: DEFAULT_PRICE_CEILING,
        }
    }
}

impl CeilingPolicy {
    /// Highest live price rounded up to the increment, or the fallback when
    /// nothing priced above zero is live.
    pub fn derive<'a>(&self, items: impl IntoIterator<Item = &'a Product>) -> f64 {
        let max = items
            .into_iter()
            .filter(|p| p.is_live() && p.price.is_finite())
            .map(|p| p.price)
            .fold(0.0_f64, f64::max);
        if max <= 0.0 {
            self.fallback
        } else {
            round_up_to_increment(max, self.increment)
        }
    }
}

/// Upper bound of the price slider for one session. Seeded once from the
/// first load that yields live items, then frozen so later narrowing never
/// shrinks the slider under the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCeiling {
    policy: CeilingPolicy,
    seeded: Option<f64>,
}

impl PriceCeiling {
    pub fn new(policy: CeilingPolicy) -> Self {
        Self {
            policy,
            seeded: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.seeded.unwrap_or(self.policy.fallback)
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded.is_some()
    }

    pub fn policy(&self) -> CeilingPolicy {
        self.policy
    }

    /// Seed from `items` if not yet seeded. Returns the new ceiling when this
    /// call seeded it.
    pub fn seed_from(&mut self, items: &[Product]) -> Option<f64> {
        if self.seeded.is_some() || !items.iter().any(Product::is_live) {
            return None;
        }
        let ceiling = self.policy.derive(items);
        self.seeded = Some(ceiling);
        Some(ceiling)
    }

    pub fn reset(&mut self) {
        self.seeded = None;
    }
}

impl Default for PriceCeiling {
    fn default() -> Self {
        Self::new(CeilingPolicy::default())
    }
}
