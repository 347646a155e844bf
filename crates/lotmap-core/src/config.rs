//! Map configuration.

/// How [`AggregatingOrderMap::try_insert`](crate::AggregatingOrderMap::try_insert)
/// treats quantities below zero.
///
/// [`AggregatingOrderMap::insert`](crate::AggregatingOrderMap::insert) is always
/// permissive regardless of this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuantityPolicy {
    /// Accept and sum any quantity, including negative ones.
    #[default]
    Permissive,
    /// Reject negative quantities without touching the map.
    RejectNegative,
}

impl QuantityPolicy {
    /// Check whether `qty` passes this policy.
    #[inline(always)]
    pub const fn accepts(self, qty: i64) -> bool {
        match self {
            QuantityPolicy::Permissive => true,
            QuantityPolicy::RejectNegative => qty >= 0,
        }
    }
}

/// Construction-time settings for an [`AggregatingOrderMap`](crate::AggregatingOrderMap).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapConfig {
    /// Symbols to pre-allocate room for.
    pub symbol_capacity: usize,
    /// Price levels to pre-allocate for each newly created symbol.
    pub level_capacity: usize,
    /// Validation applied by `try_insert`.
    pub quantity_policy: QuantityPolicy,
}

impl MapConfig {
    /// Set the outer map capacity.
    pub fn with_symbol_capacity(mut self, capacity: usize) -> Self {
        self.symbol_capacity = capacity;
        self
    }

    /// Set the per-symbol level capacity.
    pub fn with_level_capacity(mut self, capacity: usize) -> Self {
        self.level_capacity = capacity;
        self
    }

    /// Set the quantity policy.
    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }
}
