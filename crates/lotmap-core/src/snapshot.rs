//! Point-in-time copies of the map.
//!
//! A [`Snapshot`] owns plain integers, not [`LotSize`](crate::LotSize) cells, so it
//! can be inspected and printed after the read lock has been released.
//! Ordering across symbols and across levels within a symbol follows hash
//! bucket order and must not be relied upon.

use core::fmt;

use crate::price::Price;

/// One (price, quantity) row of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Level {
    /// Price key.
    pub price: Price,
    /// Aggregated quantity at `price` when the snapshot was taken.
    pub lot_size: i64,
}

/// All levels of one symbol at snapshot time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolLevels<K> {
    /// Symbol key.
    pub symbol: K,
    /// Levels in unspecified order. Never empty.
    pub levels: Vec<Level>,
}

/// Consistent copy of every bucket in an
/// [`AggregatingOrderMap`](crate::AggregatingOrderMap).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<K> {
    symbols: Vec<SymbolLevels<K>>,
}

impl<K> Snapshot<K> {
    pub(crate) fn new(symbols: Vec<SymbolLevels<K>>) -> Self {
        Self { symbols }
    }

    /// Per-symbol views.
    pub fn symbols(&self) -> &[SymbolLevels<K>] {
        &self.symbols
    }

    /// Number of symbols.
    #[inline(always)]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Total number of buckets across all symbols.
    pub fn level_count(&self) -> usize {
        self.symbols.iter().map(|s| s.levels.len()).sum()
    }

    /// Check if the map was empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterator over `(symbol, price, lot_size)` triples.
    pub fn iter(&self) -> SnapshotIter<'_, K> {
        SnapshotIter {
            symbols: &self.symbols,
            symbol_pos: 0,
            level_pos: 0,
        }
    }
}

impl<K: PartialEq> Snapshot<K> {
    /// Levels recorded for `symbol`, if present.
    pub fn levels(&self, symbol: &K) -> Option<&[Level]> {
        self.symbols
            .iter()
            .find(|s| &s.symbol == symbol)
            .map(|s| s.levels.as_slice())
    }

    /// Quantity recorded at (`symbol`, `price`), if present.
    pub fn lot_size(&self, symbol: &K, price: Price) -> Option<i64> {
        self.levels(symbol)?
            .iter()
            .find(|l| l.price == price)
            .map(|l| l.lot_size)
    }
}

impl<'a, K> IntoIterator for &'a Snapshot<K> {
    type Item = (&'a K, Price, i64);
    type IntoIter = SnapshotIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the buckets of a snapshot.
pub struct SnapshotIter<'a, K> {
    symbols: &'a [SymbolLevels<K>],
    symbol_pos: usize,
    level_pos: usize,
}

impl<'a, K> Iterator for SnapshotIter<'a, K> {
    type Item = (&'a K, Price, i64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.symbols.get(self.symbol_pos) {
            if let Some(level) = entry.levels.get(self.level_pos) {
                self.level_pos += 1;
                return Some((&entry.symbol, level.price, level.lot_size));
            }
            self.symbol_pos += 1;
            self.level_pos = 0;
        }
        None
    }
}

/// One line per symbol: `SYM: {lotSize: 30, price: 2} {lotSize: 5, price: 3} `.
impl<K: fmt::Display> fmt::Display for Snapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.symbols {
            write!(f, "{}: ", entry.symbol)?;
            for level in &entry.levels {
                write!(f, "{{lotSize: {}, price: {}}} ", level.lot_size, level.price)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
