//! KeyedStore: string-keyed hash table with separate chaining.
//!
//! Entries live in a `SlotMap` and are linked into per-bucket chains by
//! their generational keys; the bucket array only holds chain heads. Each
//! entry keeps its 32-bit hash so a resize relinks entries without hashing
//! keys again.

use crate::config::StoreConfig;
use crate::error::InsertError;
use crate::murmur::BuildMurmur3;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use slotmap::{DefaultKey, SlotMap};
use tracing::debug;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    hash: u32,
    next: Option<DefaultKey>,
}

pub struct KeyedStore<V, S = BuildMurmur3> {
    hasher: S,
    config: StoreConfig,
    buckets: Vec<Option<DefaultKey>>, // chain heads, `limit` long
    entries: SlotMap<DefaultKey, Entry<V>>,
    slots: u32, // non-empty buckets
}

impl<V> KeyedStore<V> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_config_and_hasher(config, BuildMurmur3::default())
    }
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> KeyedStore<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(StoreConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: StoreConfig, hasher: S) -> Self {
        let limit = config.initial_limit.max(1);
        Self {
            hasher,
            config,
            buckets: vec![None; limit as usize],
            entries: SlotMap::with_key(),
            slots: 0,
        }
    }

    fn hash_key(&self, key: &str) -> u32 {
        // Raw bytes only: `str as Hash` would append a terminator byte.
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        h.finish() as u32
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        (hash % self.limit()) as usize
    }

    fn find(&self, key: &str) -> Option<DefaultKey> {
        let mut cursor = self.buckets[self.bucket_of(self.hash_key(key))];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            if entry.key == key {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bucket count. Always of the form `2^n - 1` under the default config.
    pub fn limit(&self) -> u32 {
        self.buckets.len() as u32
    }

    /// Number of buckets holding at least one entry.
    pub fn slots(&self) -> u32 {
        self.slots
    }

    /// Average chain length over occupied buckets; 0.0 when empty.
    pub fn load_factor(&self) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        self.count() as f64 / f64::from(self.slots)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Bucket `key` hashes to under the current limit.
    pub fn bucket_index(&self, key: &str) -> usize {
        self.bucket_of(self.hash_key(key))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|k| &self.entries[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        self.entries.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Insert `value` under `key`. An existing key is never overwritten:
    /// the call fails with `DuplicateKey` and the store is left untouched.
    pub fn put(&mut self, key: &str, value: V) -> Result<(), InsertError> {
        self.put_with(key, || value)
    }

    /// Like `put`, but only builds the value once the key is known to be new.
    pub fn put_with<F>(&mut self, key: &str, make: F) -> Result<(), InsertError>
    where
        F: FnOnce() -> V,
    {
        let hash = self.hash_key(key);
        let bucket = self.bucket_of(hash);

        let mut tail = None;
        let mut cursor = self.buckets[bucket];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            if entry.key == key {
                return Err(InsertError::DuplicateKey);
            }
            tail = Some(k);
            cursor = entry.next;
        }

        let new = self.entries.insert(Entry {
            key: key.to_owned(),
            value: make(),
            hash,
            next: None,
        });
        match tail {
            Some(t) => self.entries[t].next = Some(new),
            None => {
                self.buckets[bucket] = Some(new);
                self.slots += 1;
            }
        }

        self.maybe_resize();
        Ok(())
    }

    fn maybe_resize(&mut self) {
        let limit = self.limit();
        let next = u64::from(limit) * 2 + 1;
        if next > u64::from(self.config.max_limit) {
            return;
        }
        let load = self.load_factor();
        let occupied = f64::from(self.slots) >= f64::from(limit) * self.config.min_occupancy;
        if load > self.config.max_load && occupied {
            self.resize(next as u32);
        }
    }

    fn resize(&mut self, new_limit: u32) {
        let old_limit = self.limit();
        let old = std::mem::replace(&mut self.buckets, vec![None; new_limit as usize]);
        self.slots = 0;
        for head in old {
            let mut cursor = head;
            while let Some(k) = cursor {
                cursor = self.entries[k].next.take();
                self.relink(k);
            }
        }
        debug!(
            old_limit,
            new_limit,
            count = self.count(),
            slots = self.slots,
            "keyed store resized"
        );
    }

    // Append an unlinked entry to the tail of its bucket's chain.
    fn relink(&mut self, k: DefaultKey) {
        let bucket = self.bucket_of(self.entries[k].hash);
        match self.buckets[bucket] {
            None => {
                self.buckets[bucket] = Some(k);
                self.slots += 1;
            }
            Some(mut last) => {
                while let Some(next) = self.entries[last].next {
                    last = next;
                }
                self.entries[last].next = Some(k);
            }
        }
    }

    /// Drop every entry and shrink back to the configured initial limit.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets = vec![None; self.config.initial_limit.max(1) as usize];
        self.slots = 0;
    }

    /// Entries in bucket order, each chain front to back.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            cursor: None,
            remaining: self.entries.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

/// Iterator over `(key, value)` pairs of a [`KeyedStore`].
pub struct Iter<'a, V> {
    buckets: &'a [Option<DefaultKey>],
    entries: &'a SlotMap<DefaultKey, Entry<V>>,
    bucket: usize,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor.is_none() {
            let head = *self.buckets.get(self.bucket)?;
            self.bucket += 1;
            self.cursor = head;
        }
        let k = self.cursor?;
        let entry = &self.entries[k];
        self.cursor = entry.next;
        self.remaining -= 1;
        Some((entry.key.as_str(), &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, S> IntoIterator for &'a KeyedStore<V, S>
where
    S: BuildHasher,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for KeyedStore<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::murmur::murmur3_32;
    use std::cell::Cell;
    use std::collections::BTreeSet;

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
        } // every key lands in bucket 0
    }

    fn key(i: usize) -> String {
        format!("node-{i}")
    }

    /// Invariant: Duplicate keys are rejected and the first value stays in place.
    #[test]
    fn duplicate_put_rejected() {
        let mut m: KeyedStore<i32> = KeyedStore::new();
        m.put("dup", 1).unwrap();
        assert_eq!(m.put("dup", 2), Err(InsertError::DuplicateKey));
        assert_eq!(m.get("dup"), Some(&1));
        assert_eq!(m.count(), 1);
        assert_eq!(m.slots(), 1);
    }

    /// Invariant: A fresh store has `2^8 - 1` buckets and nothing in them.
    #[test]
    fn new_store_is_empty() {
        let m: KeyedStore<()> = KeyedStore::new();
        assert_eq!(m.limit(), 255);
        assert_eq!(m.count(), 0);
        assert_eq!(m.slots(), 0);
        assert!(m.is_empty());
        assert_eq!(m.load_factor(), 0.0);
        assert!(m.get("anything").is_none());
        assert_eq!(m.keys().count(), 0);
    }

    /// Invariant: `get` returns exactly what `put` stored.
    #[test]
    fn put_then_get_round_trip() {
        let mut m: KeyedStore<String> = KeyedStore::new();
        for i in 0..50 {
            m.put(&key(i), format!("v{i}")).unwrap();
        }
        for i in 0..50 {
            assert_eq!(m.get(&key(i)), Some(&format!("v{i}")));
        }
        assert!(m.get("node-50").is_none());
        assert!(!m.contains_key("missing"));
    }

    /// Invariant: Bucket placement is Murmur3 (seed 0) modulo the limit.
    #[test]
    fn bucket_placement_follows_murmur3() {
        let m: KeyedStore<()> = KeyedStore::new();
        assert_eq!(m.bucket_index("test"), 0xba6b_d213u32 as usize % 255);
        for k in ["", "1", "abc", "Trinity", "some longer key"] {
            assert_eq!(m.bucket_index(k), (murmur3_32(k.as_bytes(), 0) % 255) as usize);
        }
    }

    /// Invariant: Many inserts trigger resizes; every key survives with its
    /// value, `count` is exact, and the limit keeps the `2^n - 1` form.
    #[test]
    fn resize_preserves_entries() {
        let mut m: KeyedStore<usize> = KeyedStore::new();
        let n = 5_000;
        for i in 0..n {
            m.put(&key(i), i).unwrap();
        }
        assert!(m.limit() > 255, "store should have grown");
        assert_eq!((m.limit() + 1).count_ones(), 1, "limit must be 2^n - 1");
        assert_eq!(m.count(), n);
        assert!(m.slots() as usize <= m.count());
        for i in 0..n {
            assert_eq!(m.get(&key(i)), Some(&i));
        }
        assert_eq!(m.iter().count(), n);
    }

    /// Invariant: `slots` matches the number of non-empty buckets after resizes.
    #[test]
    fn slots_track_occupied_buckets() {
        let mut m: KeyedStore<()> = KeyedStore::new();
        for i in 0..1_000 {
            m.put(&key(i), ()).unwrap();
        }
        let occupied: BTreeSet<usize> = m.keys().map(|k| m.bucket_index(k)).collect();
        assert_eq!(occupied.len(), m.slots() as usize);
    }

    /// Invariant: A collision-heavy but sparse table does not resize, because
    /// the occupancy condition never holds.
    #[test]
    fn collisions_alone_do_not_resize() {
        let mut m: KeyedStore<usize, ConstBuildHasher> = KeyedStore::with_hasher(ConstBuildHasher);
        for i in 0..500 {
            m.put(&key(i), i).unwrap();
        }
        assert_eq!(m.limit(), 255);
        assert_eq!(m.slots(), 1);
        assert_eq!(m.count(), 500);
        assert_eq!(m.load_factor(), 500.0);
        for i in 0..500 {
            assert_eq!(m.get(&key(i)), Some(&i));
        }
        assert_eq!(m.put(&key(7), 0), Err(InsertError::DuplicateKey));
    }

    /// Invariant: Growth stops at the ceiling; further inserts just lengthen chains.
    #[test]
    fn growth_halts_at_max_limit() {
        let config = StoreConfig::default()
            .with_initial_limit(3)
            .with_max_limit(16);
        let mut m: KeyedStore<usize> = KeyedStore::with_config(config);
        for i in 0..200 {
            m.put(&key(i), i).unwrap();
        }
        // 3 -> 7 -> 15; 31 would exceed the ceiling.
        assert_eq!(m.limit(), 15);
        assert_eq!(m.count(), 200);
        for i in 0..200 {
            assert_eq!(m.get(&key(i)), Some(&i));
        }
    }

    /// Invariant: Iteration yields each live key exactly once and reports its length.
    #[test]
    fn iteration_yields_each_key_once() {
        let mut m: KeyedStore<usize> = KeyedStore::new();
        for i in 0..300 {
            m.put(&key(i), i).unwrap();
        }
        let it = m.iter();
        assert_eq!(it.len(), 300);
        let seen: Vec<&str> = m.keys().collect();
        let unique: BTreeSet<&str> = seen.iter().copied().collect();
        assert_eq!(seen.len(), unique.len());
        assert_eq!(unique.len(), 300);
        let total: usize = m.values().sum();
        assert_eq!(total, (0..300).sum());
        // Unmutated store: two passes agree on order.
        let again: Vec<&str> = (&m).into_iter().map(|(k, _)| k).collect();
        assert_eq!(seen, again);
    }

    /// Invariant: `get_mut` edits in place and the edit is visible to `get`.
    #[test]
    fn get_mut_updates_value() {
        let mut m: KeyedStore<i32> = KeyedStore::new();
        m.put("k", 10).unwrap();
        *m.get_mut("k").unwrap() += 5;
        assert_eq!(m.get("k"), Some(&15));
        assert!(m.get_mut("nope").is_none());
    }

    /// Invariant: `put_with` only runs the constructor when the key is new.
    #[test]
    fn put_with_is_lazy() {
        let mut m: KeyedStore<String> = KeyedStore::new();
        let calls = Cell::new(0);
        m.put_with("k", || {
            calls.set(calls.get() + 1);
            "v".to_string()
        })
        .unwrap();
        let r = m.put_with("k", || {
            calls.set(calls.get() + 1);
            "v2".to_string()
        });
        assert_eq!(r, Err(InsertError::DuplicateKey));
        assert_eq!(calls.get(), 1);
        assert_eq!(m.get("k"), Some(&"v".to_string()));
    }

    /// Invariant: `clear` drops every entry and restores the initial shape;
    /// previously used keys can be inserted again.
    #[test]
    fn clear_resets_store() {
        let mut m: KeyedStore<usize> = KeyedStore::new();
        for i in 0..1_000 {
            m.put(&key(i), i).unwrap();
        }
        m.clear();
        assert_eq!(m.count(), 0);
        assert_eq!(m.slots(), 0);
        assert_eq!(m.limit(), 255);
        assert!(m.get(&key(1)).is_none());
        m.put(&key(1), 1).unwrap();
        assert_eq!(m.get(&key(1)), Some(&1));
    }

    /// Invariant: Under total collision, chained lookups still resolve by key
    /// equality and keep distinct values apart.
    #[test]
    fn chain_lookup_with_const_hasher() {
        let mut m: KeyedStore<i32, ConstBuildHasher> = KeyedStore::with_hasher(ConstBuildHasher);
        m.put("a", 1).unwrap();
        m.put("b", 2).unwrap();
        m.put("c", 3).unwrap();
        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.get("c"), Some(&3));
        assert!(m.get("d").is_none());
        // Chain order is insertion order within one bucket.
        let order: Vec<&str> = m.keys().collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn debug_lists_entries() {
        let mut m: KeyedStore<i32> = KeyedStore::new();
        m.put("only", 1).unwrap();
        assert_eq!(format!("{m:?}"), r#"{"only": 1}"#);
    }
}
