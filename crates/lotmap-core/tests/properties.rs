//! Property tests for aggregation, partitioning and removal.

use std::collections::HashMap;

use lotmap_core::{AggregatingOrderMap, LotSize, Price};
use proptest::prelude::*;

fn op_sequence() -> impl Strategy<Value = Vec<(u8, i64, i64)>> {
    // (symbol, price, quantity)
    prop::collection::vec((0u8..4, -3i64..8, 0i64..10_000), 1..200)
}

proptest! {
    #[test]
    fn bucket_equals_sum_of_inserts(qtys in prop::collection::vec(0i64..1_000_000, 1..100)) {
        let map: AggregatingOrderMap<&str> = AggregatingOrderMap::new();
        for &q in &qtys {
            map.insert("S", LotSize::new(q), Price(2));
        }
        prop_assert_eq!(map.lot_size(&"S", Price(2)), Some(qtys.iter().sum::<i64>()));
        prop_assert_eq!(map.level_count(&"S"), 1);
    }

    #[test]
    fn buckets_partition_by_symbol_and_price(ops in op_sequence()) {
        let map: AggregatingOrderMap<u8> = AggregatingOrderMap::new();
        let mut expected: HashMap<(u8, i64), i64> = HashMap::new();

        for &(symbol, price, qty) in &ops {
            map.insert(symbol, LotSize::new(qty), Price(price));
            *expected.entry((symbol, price)).or_default() += qty;
        }

        let snap = map.snapshot();
        prop_assert_eq!(snap.level_count(), expected.len());
        for (symbol, price, qty) in &snap {
            prop_assert_eq!(expected.get(&(*symbol, price.0)), Some(&qty));
        }
    }

    #[test]
    fn remove_clears_only_target_symbol(ops in op_sequence(), target in 0u8..4) {
        let map: AggregatingOrderMap<u8> = AggregatingOrderMap::new();
        for &(symbol, price, qty) in &ops {
            map.insert(symbol, LotSize::new(qty), Price(price));
        }
        let before = map.snapshot();

        map.remove(&target);
        // Second removal is a no-op.
        prop_assert!(!map.remove(&target));

        let after = map.snapshot();
        prop_assert!(after.levels(&target).is_none());
        for entry in before.symbols().iter().filter(|e| e.symbol != target) {
            for level in &entry.levels {
                prop_assert_eq!(after.lot_size(&entry.symbol, level.price), Some(level.lot_size));
            }
        }
        prop_assert_eq!(
            after.level_count(),
            before.level_count() - before.levels(&target).map_or(0, |levels| levels.len())
        );
    }
}
