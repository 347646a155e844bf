//! Move-only atomic quantity cell.
//!
//! A [`LotSize`] is deliberately neither `Clone` nor `Copy`: a quantity that
//! is being aggregated lives in exactly one place. Callers hand ownership to
//! the map on insert, and the only way to change a resting value is
//! [`LotSize::fetch_add`].

use core::sync::atomic::{AtomicI64, Ordering};

/// Aggregated quantity resting at one (symbol, price) bucket.
///
/// Arithmetic wraps on overflow, matching atomic integer semantics. No bounds
/// are enforced; see [`QuantityPolicy`](crate::QuantityPolicy) for the opt-in
/// negative check.
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct LotSize(AtomicI64);

impl LotSize {
    /// Create a new cell holding `qty`.
    #[inline(always)]
    pub const fn new(qty: i64) -> Self {
        Self(AtomicI64::new(qty))
    }

    /// Consume the cell and return its value.
    #[inline(always)]
    pub fn into_inner(self) -> i64 {
        self.0.into_inner()
    }

    /// Current value.
    #[inline(always)]
    pub fn load(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    /// Atomically add `qty`, returning the previous value.
    #[inline(always)]
    pub fn fetch_add(&self, qty: i64) -> i64 {
        self.0.fetch_add(qty, Ordering::AcqRel)
    }
}

impl From<i64> for LotSize {
    #[inline(always)]
    fn from(qty: i64) -> Self {
        Self::new(qty)
    }
}
