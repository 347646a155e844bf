//! Aggregating order map.
//!
//! Two-level storage, symbol -> price -> [`LotSize`], behind a single
//! reader/writer lock:
//!
//! - `insert` and `remove` take the lock exclusively, so creating a symbol,
//!   creating a level and dropping a symbol are totally ordered.
//! - `snapshot` and the read helpers take it shared and may run together.
//!
//! The leaf counters are atomic even though the exclusive lock already
//! serializes every add. That keeps aggregation into an existing bucket valid
//! under a shared lock, which is the intended fast path once insert contention
//! matters (sharding by symbol is the other option).

use core::fmt;
use core::hash::Hash;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::config::MapConfig;
use crate::error::MapError;
use crate::lot::LotSize;
use crate::price::Price;
use crate::snapshot::{Level, Snapshot, SymbolLevels};

type Levels = FxHashMap<Price, LotSize>;

/// Concurrent map from symbol to aggregated quantity per price.
///
/// Inserting at an existing (symbol, price) bucket sums quantities; it never
/// replaces. A symbol is present iff it holds at least one level.
pub struct AggregatingOrderMap<K> {
    book: RwLock<FxHashMap<K, Levels>>,
    config: MapConfig,
}

impl<K> AggregatingOrderMap<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty map with default configuration.
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    /// Create an empty map with `config`.
    pub fn with_config(config: MapConfig) -> Self {
        Self {
            book: RwLock::new(FxHashMap::with_capacity_and_hasher(
                config.symbol_capacity,
                Default::default(),
            )),
            config,
        }
    }

    /// Active configuration.
    #[inline(always)]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Add `lot_size` to the bucket at (`symbol`, `price`).
    ///
    /// Creates the symbol and the level as needed. Quantities are not
    /// validated; use [`try_insert`](Self::try_insert) for that.
    pub fn insert(&self, symbol: K, lot_size: LotSize, price: Price) {
        let mut book = self.book.write();

        let levels = match book.entry(symbol) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                trace!(symbol = ?slot.key(), "symbol created");
                slot.insert(FxHashMap::with_capacity_and_hasher(
                    self.config.level_capacity,
                    Default::default(),
                ))
            }
        };

        match levels.entry(price) {
            Entry::Occupied(slot) => {
                slot.get().fetch_add(lot_size.into_inner());
            }
            Entry::Vacant(slot) => {
                trace!(%price, lot_size = lot_size.load(), "price level created");
                slot.insert(lot_size);
            }
        }
    }

    /// Validating variant of [`insert`](Self::insert).
    ///
    /// Applies the configured [`QuantityPolicy`](crate::QuantityPolicy). A
    /// rejected quantity leaves the map untouched.
    pub fn try_insert(&self, symbol: K, lot_size: LotSize, price: Price) -> Result<(), MapError> {
        let qty = lot_size.load();
        if !self.config.quantity_policy.accepts(qty) {
            warn!(?symbol, %price, lot_size = qty, "rejected negative lot size");
            return Err(MapError::NegativeQuantity { price, lot_size: qty });
        }

        self.insert(symbol, lot_size, price);
        Ok(())
    }

    /// Drop `symbol` and every level under it.
    ///
    /// Returns `false` if the symbol was absent, which is not an error.
    pub fn remove(&self, symbol: &K) -> bool {
        let removed = self.book.write().remove(symbol);
        match removed {
            Some(levels) => {
                debug!(?symbol, levels = levels.len(), "symbol removed");
                true
            }
            None => false,
        }
    }

    /// Copy every bucket while holding the read lock.
    pub fn snapshot(&self) -> Snapshot<K> {
        let book = self.book.read();
        let symbols: Vec<_> = book
            .iter()
            .map(|(symbol, levels)| SymbolLevels {
                symbol: symbol.clone(),
                levels: levels
                    .iter()
                    .map(|(&price, lot)| Level {
                        price,
                        lot_size: lot.load(),
                    })
                    .collect(),
            })
            .collect();
        drop(book);

        debug!(symbols = symbols.len(), "snapshot taken");
        Snapshot::new(symbols)
    }

    /// Current quantity at (`symbol`, `price`).
    pub fn lot_size(&self, symbol: &K, price: Price) -> Option<i64> {
        self.book
            .read()
            .get(symbol)
            .and_then(|levels| levels.get(&price))
            .map(LotSize::load)
    }

    /// Check if `symbol` has any levels.
    pub fn contains_symbol(&self, symbol: &K) -> bool {
        self.book.read().contains_key(symbol)
    }

    /// Number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.book.read().len()
    }

    /// Number of price levels under `symbol` (zero if absent).
    pub fn level_count(&self, symbol: &K) -> usize {
        self.book.read().get(symbol).map_or(0, |levels| levels.len())
    }

    /// Check if the map holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.book.read().is_empty()
    }
}

impl<K> AggregatingOrderMap<K>
where
    K: Eq + Hash + Clone + fmt::Debug + fmt::Display,
{
    /// Human-readable rendering of a fresh snapshot.
    pub fn display(&self) -> String {
        self.snapshot().to_string()
    }
}

impl<K> Default for AggregatingOrderMap<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for AggregatingOrderMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatingOrderMap")
            .field("symbols", &self.book.read().len())
            .field("config", &self.config)
            .finish()
    }
}
