//! Price level keys.
//!
//! Prices are plain integer keys. The map never interprets them beyond
//! equality and hashing, so no tick size or decimal scaling is applied here.

use core::fmt;

/// Integer price key, unique within a symbol's level collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Price(pub i64);

impl From<i64> for Price {
    #[inline(always)]
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from() {
        assert_eq!(Price::from(-42), Price(-42));
        assert_eq!(Price::from(7), Price(7));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price(2).to_string(), "2");
        assert_eq!(Price(-3).to_string(), "-3");
    }
}
