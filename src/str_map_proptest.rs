#![cfg(test)]

// Property tests kept inside the crate so they can check slot-level
// invariants that the public API does not expose.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::Error;
use crate::StrMap;
use crate::Upsert;
use crate::hash::StrHasher;
use crate::hash::poly_hash;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, usize),
    Update(usize, usize),
    Upsert(usize, usize),
    Remove(usize),
    Lookup(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::hash_set("[a-z]{0,6}", 1..=48).prop_flat_map(|pool| {
        let pool: Vec<String> = pool.into_iter().collect();
        let key = 0..pool.len();
        let value = 0..VALUES.len();
        let op = prop_oneof![
            4 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Insert(k, v)),
            2 => (key.clone(), value.clone()).prop_map(|(k, v)| Op::Update(k, v)),
            3 => (key.clone(), value).prop_map(|(k, v)| Op::Upsert(k, v)),
            3 => key.clone().prop_map(Op::Remove),
            2 => key.prop_map(Op::Lookup),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

static VALUES: [u32; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

// Runs `ops` against the map and a std HashMap model, checking parity and the
// Robin Hood ordering after every step.
fn check_against_model<H: StrHasher>(
    pool: &[String],
    ops: &[Op],
    hasher: H,
) -> Result<(), TestCaseError> {
    let mut sut: StrMap<u32, H> = StrMap::with_hasher(hasher);
    let mut model: HashMap<&str, u32> = HashMap::new();

    for op in ops {
        match *op {
            Op::Insert(k, v) => {
                let key = pool[k].as_str();
                let result = sut.insert(key, &VALUES[v]);
                if model.contains_key(key) {
                    prop_assert_eq!(result, Err(Error::Duplicate));
                } else {
                    prop_assert_eq!(result.map(|e| *e.data), Ok(VALUES[v]));
                    model.insert(key, VALUES[v]);
                }
            }
            Op::Update(k, v) => {
                let key = pool[k].as_str();
                let result = sut.update(key, &VALUES[v]);
                match model.get_mut(key) {
                    Some(old) => {
                        prop_assert_eq!(result.map(|e| *e.data), Ok(*old));
                        *old = VALUES[v];
                    }
                    None => {
                        prop_assert_eq!(result, Err(Error::NotFound));
                    }
                }
            }
            Op::Upsert(k, v) => {
                let key = pool[k].as_str();
                let result = sut.upsert(key, &VALUES[v]);
                match model.insert(key, VALUES[v]) {
                    Some(old) => {
                        prop_assert!(matches!(result, Ok(Upsert::Updated(e)) if *e.data == old));
                    }
                    None => {
                        prop_assert!(matches!(result, Ok(Upsert::Inserted(_))));
                    }
                }
            }
            Op::Remove(k) => {
                let key = pool[k].as_str();
                let len = sut.len();
                let result = sut.remove(key);
                match model.remove(key) {
                    Some(old) => {
                        prop_assert_eq!(result.map(|e| (e.key, *e.data)), Ok((key, old)));
                    }
                    None => {
                        prop_assert_eq!(result, Err(Error::NotFound));
                        prop_assert_eq!(sut.len(), len);
                    }
                }
            }
            Op::Lookup(k) => {
                let key = pool[k].as_str();
                prop_assert_eq!(sut.get(key).copied(), model.get(key).copied());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.probe_mean() >= 0.0);
        prop_assert!(sut.probe_variance() >= 0.0);
    }

    for (key, value) in &model {
        prop_assert_eq!(sut.get(key), Some(value));
    }
    let mut seen: Vec<&str> = sut.iter().map(|e| e.key).collect();
    seen.sort_unstable();
    let mut expected: Vec<&str> = model.keys().copied().collect();
    expected.sort_unstable();
    prop_assert_eq!(seen, expected);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn prop_model_equivalence_poly_hash((pool, ops) in arb_scenario()) {
        check_against_model(&pool, &ops, poly_hash)?;
    }

    // Few distinct homes: long collision runs, wraparound and many shifts.
    #[test]
    fn prop_model_equivalence_clustered((pool, ops) in arb_scenario(), homes in 1u64..4) {
        check_against_model(&pool, &ops, move |key: &str| poly_hash(key) % homes)?;
    }

    #[test]
    fn prop_growth_preserves_tuples(pool in proptest::collection::hash_set("[a-z0-9]{1,8}", 1..300)) {
        let pool: Vec<String> = pool.into_iter().collect();
        let mut map = StrMap::new();
        let mut growths = 0;

        for key in &pool {
            let capacity = map.capacity();
            let before: Vec<(String, u64)> = map.iter().map(|e| (e.key.into(), e.hash)).collect();
            map.insert(key, key).unwrap();

            if map.capacity() != capacity {
                growths += 1;
                for (key, hash) in before {
                    let entry = map.lookup(&key).unwrap();
                    prop_assert_eq!(entry.hash, hash);
                    prop_assert_eq!(entry.data, &key);
                }
            }
        }

        map.assert_invariants();
        prop_assert_eq!(map.len(), pool.len());
        prop_assert!(pool.len() <= 6 || growths > 0);
    }

    #[test]
    fn prop_clone_with_capacity_matches(
        pool in proptest::collection::hash_set("[a-z]{1,5}", 0..100),
        hint in 0usize..400,
    ) {
        let pool: Vec<String> = pool.into_iter().collect();
        let mut map = StrMap::new();
        for key in &pool {
            map.insert(key, key).unwrap();
        }

        let copy = map.try_clone_with_capacity(hint).unwrap();
        copy.assert_invariants();
        prop_assert_eq!(copy.len(), map.len());
        prop_assert!(copy.ceiling() >= hint.max(map.len()));
        for entry in map.iter() {
            prop_assert_eq!(copy.lookup(entry.key).map(|e| (e.hash, e.data)), Ok((entry.hash, entry.data)));
        }
    }
}
