#![cfg(test)]

// Property tests for KeyedStore, kept inside the crate so the collision
// hasher and small-table configs stay private.

use crate::config::StoreConfig;
use crate::error::InsertError;
use crate::keyed_store::KeyedStore;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    PutWith(usize, i32),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,6}", 1..=64).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::PutWith(i, v)),
            3 => idx.clone().prop_map(OpI::Get),
            2 => prop_oneof![contains_pool, "[a-z0-9]{0,6}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives `sut` against a std HashMap model and checks, after every op:
// - duplicate puts fail and leave the first value in place;
// - `put_with` builds its value exactly once on success, never on duplicate;
// - `get`/`contains_key` agree with the model;
// - iteration yields each live key once; count/slots/limit invariants hold.
fn run_scenario<S: BuildHasher>(
    mut sut: KeyedStore<i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let calls = Cell::new(0);

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.put(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "put must fail on duplicate");
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(sut.get(k), model.get(k));
                    }
                }
            }
            OpI::PutWith(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                let before = calls.get();
                match sut.put_with(k, || {
                    calls.set(calls.get() + 1);
                    v
                }) {
                    Ok(()) => {
                        prop_assert!(!already);
                        prop_assert_eq!(calls.get(), before + 1);
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already);
                        prop_assert_eq!(calls.get(), before, "constructor must not run on duplicate");
                    }
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("model has every live key");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Iterate => {
                let keys: Vec<&str> = sut.keys().collect();
                let unique: BTreeSet<&str> = keys.iter().copied().collect();
                prop_assert_eq!(keys.len(), unique.len(), "no key yielded twice");
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(unique, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.slots() as usize <= sut.count());
        prop_assert!(sut.slots() <= sut.limit());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(KeyedStore::new(), &pool, ops)?;
    }

    // A tiny starting table makes resizes happen within a short op list.
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let config = StoreConfig::default().with_initial_limit(3);
        run_scenario(KeyedStore::with_config(config), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain walking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(KeyedStore::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    // Property: N distinct inserts survive any number of resizes with their
    // values, and the limit keeps the 2^n - 1 form.
    #[test]
    fn prop_resize_preserves_everything(keys in proptest::collection::btree_set("[a-z]{1,8}", 0..2_000)) {
        let mut sut: KeyedStore<usize> = KeyedStore::with_config(StoreConfig::default().with_initial_limit(1));
        for (i, k) in keys.iter().enumerate() {
            prop_assert!(sut.put(k, i).is_ok());
        }
        prop_assert_eq!(sut.count(), keys.len());
        prop_assert_eq!((sut.limit() + 1).count_ones(), 1);
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(sut.get(k), Some(&i));
        }
    }
}
