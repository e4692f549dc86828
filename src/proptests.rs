use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn validate_trie<V>(t: &RadixTrie<V>) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {issues:?}");
}

/// Keys over a tiny alphabet so that inserts and deletes constantly split
/// and merge shared prefixes.
fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(prop::sample::select(b"abc/".to_vec()), 0..=8)
}

fn short_prefix_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abc/".to_vec()), 0..=3)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Store(#[proptest(strategy = "key_strategy()")] Vec<u8>, u64),
    #[proptest(weight = 3)]
    Delete(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 2)]
    Load(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    #[proptest(weight = 1)]
    Keys(
        #[proptest(strategy = "short_prefix_strategy()")] Vec<u8>,
        #[proptest(strategy = "0usize..6")] usize,
    ),
}

/// Keys of `m` starting with `prefix`, capped at `limit` (0 = all).
fn expected_keys(m: &BTreeMap<Vec<u8>, u64>, prefix: &[u8], limit: usize) -> Vec<Vec<u8>> {
    let matches = m.keys().filter(|k| k.starts_with(prefix)).cloned();
    if limit == 0 {
        matches.collect()
    } else {
        matches.take(limit).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t: RadixTrie<u64> = RadixTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Store(key, value) => {
                    let nodes = t.node_count();
                    let old_t = t.store(&key, value);
                    let old_m = m.insert(key, value);
                    if old_m.is_some() {
                        prop_assert_eq!(t.node_count(), nodes);
                    }
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Delete(key) => {
                    let old_t = t.remove(&key);
                    let old_m = m.remove(key.as_slice());
                    prop_assert_eq!(old_t, old_m);
                    prop_assert!(t.load(&key).is_none());
                }
                Op::Load(key) => {
                    let got_t = t.load(&key).copied();
                    let got_m = m.get(key.as_slice()).copied();
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Keys(prefix, limit) => {
                    prop_assert_eq!(t.keys(&prefix, limit), expected_keys(&m, &prefix, limit));
                }
            }

            prop_assert_eq!(t.len(), m.len());
            validate_trie(&t);
        }

        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_delete_absent_leaves_trie_unchanged(
        keys in prop::collection::vec(key_strategy(), 0..=40),
        probe in key_strategy(),
    ) {
        let mut t: RadixTrie<u64> = RadixTrie::new();
        for (i, k) in keys.iter().enumerate() {
            t.store(k, i as u64);
        }
        prop_assume!(!t.contains_key(&probe));

        let before = t.tree_bytes();
        t.delete(&probe);
        prop_assert_eq!(t.tree_bytes(), before);
    }

    #[test]
    fn prop_keys_limit_is_truncation(
        keys in prop::collection::vec(key_strategy(), 0..=60),
        prefix in short_prefix_strategy(),
        limit in 1usize..10,
    ) {
        let t: RadixTrie<usize> = keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
        let all = t.keys(&prefix, 0);
        for pair in all.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        let capped = t.keys(&prefix, limit);
        prop_assert_eq!(capped.as_slice(), &all[..limit.min(all.len())]);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_set() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"sa".to_vec(),
        b"sam".to_vec(),
        b"sally".to_vec(),
        b"samuel".to_vec(),
        b"bob".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_set();
    let mut reference: Option<Vec<u8>> = None;

    for_each_permutation(&keys, |perm| {
        let mut t: RadixTrie<u64> = RadixTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for k in perm {
            let v = k.len() as u64;
            assert_eq!(t.store(&k, v), m.insert(k, v));
        }

        validate_trie(&t);
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(got, expected);

        // The canonical shape does not depend on insertion order.
        let shape = t.tree_bytes();
        match &reference {
            Some(r) => assert_eq!(&shape, r),
            None => reference = Some(shape),
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_set();

    let mut base_trie: RadixTrie<u64> = RadixTrie::new();
    let mut base_map: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as u64;
        assert_eq!(base_trie.store(k, v), base_map.insert(k.clone(), v));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_trie.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(k.as_slice()));
            assert_eq!(t.len(), m.len());
            validate_trie(&t);
            assert_eq!(t.keys(b"", 0), m.keys().cloned().collect::<Vec<_>>());
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.node_count(), 1);
    });
}
