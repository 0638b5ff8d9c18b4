//! Property-Based Tests for the Chunked Cache
//!
//! Uses proptest with small limits so values cross the inline/chunked
//! boundary and the chunk bound within a few hundred characters.

use proptest::prelude::*;
use serde_json::Value;

use crate::chunked::chunker::split_chunks;
use crate::chunked::{CacheLimits, ChunkedCache};
use crate::store::{KvStore, MemoryStore};

// == Test Configuration ==
fn test_limits() -> CacheLimits {
    CacheLimits {
        chunk_size: 16,
        max_chunks: 8,
        max_value_length: 200,
        ..CacheLimits::default()
    }
}

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,40}"
}

/// Short JSON documents mixing ASCII and multi-byte text
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z志願 ]{0,30}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: usize, value: Value },
    Remove { key: usize },
    Evict { key: usize, index: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0usize..3, json_value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        (0usize..3).prop_map(|key| CacheOp::Remove { key }),
        (0usize..3, 0usize..8).prop_map(|(key, index)| CacheOp::Evict { key, index }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Concatenating the chunks gives back the input, every chunk is within
    // the size bound and the count is ceil(len / size).
    #[test]
    fn prop_split_partitions_text(text in "[a-z志願0-9\"{}]{0,300}", size in 1usize..40) {
        let chunks = split_chunks(&text, size);
        let length = text.chars().count();

        prop_assert_eq!(chunks.concat(), text.clone());
        prop_assert_eq!(chunks.len(), length.div_ceil(size));
        for chunk in &chunks {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.chars().count() <= size);
        }
    }

    // A storable value reads back deep-equal, whichever shape it took.
    #[test]
    fn prop_round_trip(key in valid_key_strategy(), value in json_value_strategy()) {
        let limits = test_limits();
        let cache = ChunkedCache::with_limits(MemoryStore::new(1_000), limits);
        let length = value.to_string().chars().count();

        cache.set(&key, &value, None);
        let cached: Option<Value> = cache.get(&key);

        let storable = length <= limits.max_value_length
            && length.div_ceil(limits.chunk_size) <= limits.max_chunks;
        if storable {
            prop_assert_eq!(cached, Some(value));
        } else {
            prop_assert_eq!(cached, None);
        }
    }

    // Whatever mix of writes, removals and single-chunk evictions happens,
    // a read returns either nothing or the most recently set value.
    #[test]
    fn prop_reads_never_return_torn_values(ops in prop::collection::vec(cache_op_strategy(), 1..30)) {
        let keys = ["examData", "choicesData", "limitOfSchools"];
        let cache = ChunkedCache::with_limits(MemoryStore::new(1_000), test_limits());
        let mut latest: [Option<Value>; 3] = [None, None, None];

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(keys[key], &value, None);
                    latest[key] = Some(value);
                }
                CacheOp::Remove { key } => {
                    cache.remove(keys[key]);
                    latest[key] = None;
                }
                CacheOp::Evict { key, index } => {
                    let _ = cache.store().remove(&format!("{}_{index}", keys[key]));
                }
            }

            for (slot, key) in keys.iter().enumerate() {
                if let Some(value) = cache.get::<Value>(key) {
                    prop_assert_eq!(Some(&value), latest[slot].as_ref());
                }
            }
        }
    }
}

// == Property Test for Concurrent Writers and Readers ==
// Real threads race `set` against `get` on one key through a shared store.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Values span inline, few-chunk and many-chunk shapes. Every hit a reader
    // sees must be one of the written values, never a splice of two.
    #[test]
    fn prop_concurrent_reads_see_whole_values(
        inline_len in 1usize..14,
        short_len in 17usize..60,
        long_len in 61usize..120,
        rounds in 50usize..150,
    ) {
        use std::sync::Arc;
        use std::thread;

        let values = vec![
            Value::from("a".repeat(inline_len)),
            Value::from("b".repeat(short_len)),
            Value::from("c".repeat(long_len)),
        ];
        let cache = ChunkedCache::with_limits(Arc::new(MemoryStore::new(1_000)), test_limits());

        let unexpected: Vec<Value> = thread::scope(|scope| {
            for offset in 0..values.len() {
                let (cache, values) = (&cache, &values);
                scope.spawn(move || {
                    for round in 0..rounds {
                        cache.set("examData", &values[(round + offset) % values.len()], None);
                    }
                });
            }

            let readers: Vec<_> = (0..2)
                .map(|_| {
                    let (cache, values) = (&cache, &values);
                    scope.spawn(move || {
                        let mut seen = Vec::new();
                        for _ in 0..rounds {
                            if let Some(value) = cache.get::<Value>("examData") {
                                if !values.contains(&value) {
                                    seen.push(value);
                                }
                            }
                        }
                        seen
                    })
                })
                .collect();

            readers
                .into_iter()
                .flat_map(|reader| reader.join().unwrap())
                .collect()
        });

        prop_assert!(unexpected.is_empty(), "torn reads: {:?}", unexpected);

        if let Some(value) = cache.get::<Value>("examData") {
            prop_assert!(values.contains(&value));
        }
    }
}
