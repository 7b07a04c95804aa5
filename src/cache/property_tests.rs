//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation and store accounting over random inputs.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::ready;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cache::{build_key, FetchRequest, MapCache};
use crate::error::CacheError;

// == Strategies ==
/// Generates base keys
fn base_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,32}".prop_map(|s| s)
}

/// Generates flat parameter objects
fn params_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6)
}

/// A fetch drawn from a small key space so that repeats are common
#[derive(Debug, Clone)]
enum FetchOp {
    Plain { key: u8 },
    WithParams { key: u8, page: u8 },
    Failing { key: u8 },
}

fn fetch_op_strategy() -> impl Strategy<Value = FetchOp> {
    prop_oneof![
        (0u8..4).prop_map(|key| FetchOp::Plain { key }),
        (0u8..4, 0u8..3).prop_map(|(key, page)| FetchOp::WithParams { key, page }),
        (0u8..4).prop_map(|key| FetchOp::Failing { key }),
    ]
}

fn always_fails() -> std::future::Ready<Result<u32, CacheError>> {
    ready(Err(CacheError::Serialization(
        serde_json::from_str::<u32>("x").unwrap_err(),
    )))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property 1: Key Determinism**
    // Structurally equal params yield the same composite key, whatever map type
    // or insertion order produced them.
    #[test]
    fn prop_key_determinism(base in base_key_strategy(), params in params_strategy()) {
        let mut reversed: HashMap<String, i64> = HashMap::new();
        for (name, value) in params.iter().rev() {
            reversed.insert(name.clone(), *value);
        }

        let a = build_key(&base, Some(&params)).unwrap();
        let b = build_key(&base, Some(&reversed)).unwrap();
        prop_assert_eq!(a, b);
    }

    // **Property 2: Parameter Sensitivity**
    // Different params under the same base key never share a composite key.
    #[test]
    fn prop_parameter_sensitivity(
        base in base_key_strategy(),
        a in params_strategy(),
        b in params_strategy()
    ) {
        prop_assume!(a != b);

        let key_a = build_key(&base, Some(&a)).unwrap();
        let key_b = build_key(&base, Some(&b)).unwrap();
        prop_assert_ne!(key_a, key_b);
    }

    // **Property 3: Absent Params Keep the Base Key**
    #[test]
    fn prop_absent_params_keep_base_key(base in base_key_strategy()) {
        let key = build_key::<()>(&base, None).unwrap();
        prop_assert_eq!(key, base);
    }

    // **Property 4: Size Accounting**
    // With no TTL, the producer runs once per distinct composite key, size()
    // equals the number of distinct composite keys, and failed producers never
    // add entries.
    #[test]
    fn prop_size_accounting(ops in prop::collection::vec(fetch_op_strategy(), 1..40)) {
        let cache: MapCache<u32> = MapCache::new();
        let calls = AtomicUsize::new(0);
        let mut stored = HashSet::new();

        tokio_test::block_on(async {
            for op in &ops {
                match op {
                    FetchOp::Plain { key } => {
                        let request = FetchRequest::new(format!("k{}", key));
                        let _ = cache
                            .fetch(request, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                ready(Ok::<_, CacheError>(u32::from(*key)))
                            })
                            .await;
                        stored.insert(format!("k{}", key));
                    }
                    FetchOp::WithParams { key, page } => {
                        let params = serde_json::json!({ "page": page });
                        let request = FetchRequest::new(format!("k{}", key)).params(&params);
                        let _ = cache
                            .fetch(request, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                ready(Ok::<_, CacheError>(u32::from(*page)))
                            })
                            .await;
                        stored.insert(build_key(&format!("k{}", key), Some(&params)).unwrap());
                    }
                    FetchOp::Failing { key } => {
                        let _ = cache
                            .fetch(format!("k{}", key), always_fails)
                            .await;
                    }
                }
            }
        });

        prop_assert_eq!(cache.size(), stored.len());
        prop_assert_eq!(calls.load(Ordering::SeqCst), stored.len());

        let stats = cache.stats();
        prop_assert_eq!(stats.total_entries, stored.len());
        prop_assert_eq!(stats.expired, 0);
    }
}
