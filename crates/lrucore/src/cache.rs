//! Bounded LRU cache
//!
//! A key index (`key -> EntryId`) sits beside the recency list. Every public
//! method leaves both holding exactly the same set of live entries.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::entry::{Entry, EntryId, EntryState};
use crate::error::{Error, Result};
use crate::list::{EntryList, Iter, PREALLOC_LIMIT};
use crate::stats::CacheStats;
use crate::value::Value;

/// LRU cache with fixed capacity
pub struct Cache<K, V> {
    index: HashMap<K, EntryId, RandomState>,
    list: EntryList<K, V>,
    max_size: usize,
    stats: CacheStats,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `max_size` entries.
    ///
    /// Fails with [`Error::Config`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self> {
        Ok(Self::with_config(CacheConfig::new(max_size)?))
    }

    /// Create a cache from a validated config
    pub fn with_config(config: CacheConfig) -> Self {
        let max_size = config.max_size();
        Self {
            index: HashMap::with_capacity_and_hasher(
                max_size.saturating_add(1).min(PREALLOC_LIMIT),
                RandomState::new(),
            ),
            list: EntryList::with_capacity(max_size),
            max_size,
            stats: CacheStats::new(),
        }
    }

    /// Insert an entry, or update the value of an existing key.
    ///
    /// The entry ends up most recently used. A new key that pushes the cache
    /// over capacity evicts the least recently used entry after linking in.
    /// An update replaces the value as is; for [`Value`] caches that must keep
    /// kinds stable use [`Cache::put_typed`].
    pub fn put(&mut self, entry: Entry<K, V>) -> Result<()> {
        if entry.state() == EntryState::Invalidated {
            return Err(Error::InvalidEntry.logged());
        }

        if let Some(&id) = self.index.get(entry.key()) {
            let value = entry
                .into_value()
                .ok_or_else(|| Error::InvalidEntry.logged())?;
            self.stored_mut(id)?.set_value(value)?;
            return self.promote_updated(id);
        }

        let key = entry.key().clone();
        let id = self.list.push_back(entry)?;
        self.index.insert(key, id);
        self.stats.record_insert();
        debug!(slot = id.index(), len = self.index.len(), "inserted entry");

        if self.index.len() > self.max_size {
            self.evict_lru()?;
        }
        Ok(())
    }

    /// Insert or update from a key and value
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        self.put(Entry::new(key, value))
    }

    /// Look up a key and promote it to most recently used.
    ///
    /// Fails with [`Error::NotFound`] if the key is absent; the cache is left
    /// unchanged apart from the miss counter.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                self.stats.record_miss();
                return Err(Error::NotFound.logged());
            }
        };

        self.list.move_to_back(id)?;
        self.stats.record_hit();
        trace!(slot = id.index(), "promoted entry");
        self.list
            .get(id)
            .ok_or_else(|| Error::InvalidLink(id.index()).logged())
    }

    /// Look up a key without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).and_then(|&id| self.list.get(id))
    }

    /// Check whether a key is cached, without promotion
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove a key, returning its value, or `Ok(None)` if it was absent.
    /// The removed entry is invalidated.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => return Ok(None),
        };
        if self.list.get(id).is_none() {
            return Err(Error::InvalidLink(id.index()).logged());
        }

        self.index.remove(key);
        let mut entry = self.list.remove(id)?;
        debug!(slot = id.index(), len = self.index.len(), "removed entry");
        Ok(entry.take_value())
    }

    /// Least recently used entry
    pub fn head(&self) -> Option<&Entry<K, V>> {
        self.list.head().and_then(|id| self.list.get(id))
    }

    /// Most recently used entry
    pub fn tail(&self) -> Option<&Entry<K, V>> {
        self.list.tail().and_then(|id| self.list.get(id))
    }

    /// Entries from least to most recently used, without promotion
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Activity counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero the activity counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Verify that index and recency list agree.
    ///
    /// Checks the size bound, list links and head/tail bookkeeping, and that
    /// every indexed key maps to the walked entry carrying that key.
    pub fn check_invariants(&self) -> Result<()> {
        if self.index.len() > self.max_size {
            return Err(Error::Invariant(format!(
                "{} entries exceed max_size {}",
                self.index.len(),
                self.max_size
            ))
            .logged());
        }

        let walked = self.list.check()?;
        if walked != self.index.len() {
            return Err(Error::Invariant(format!(
                "index holds {} keys but list holds {} entries",
                self.index.len(),
                self.list.len()
            ))
            .logged());
        }

        for entry in self.list.iter() {
            let indexed = self.index.get(entry.key()).copied();
            if indexed.is_none() || indexed != entry.id() {
                return Err(Error::Invariant(format!(
                    "list entry in slot {:?} is not indexed under its key",
                    entry.id().map(EntryId::index)
                ))
                .logged());
            }
        }
        Ok(())
    }

    fn evict_lru(&mut self) -> Result<()> {
        let id = match self.list.head() {
            Some(id) => id,
            None => return Ok(()),
        };

        // index first, so it never maps to a slot that is being freed
        let key = self
            .list
            .get(id)
            .ok_or_else(|| Error::InvalidLink(id.index()).logged())?
            .key();
        self.index.remove(key);

        let mut evicted = self.list.remove(id)?;
        evicted.invalidate();
        self.stats.record_eviction();
        debug!(slot = id.index(), len = self.index.len(), "evicted least recently used entry");
        Ok(())
    }

    fn promote_updated(&mut self, id: EntryId) -> Result<()> {
        self.list.move_to_back(id)?;
        self.stats.record_update();
        trace!(slot = id.index(), "updated entry in place");
        Ok(())
    }

    fn stored_mut(&mut self, id: EntryId) -> Result<&mut Entry<K, V>> {
        self.list
            .get_mut(id)
            .ok_or_else(|| Error::InvalidLink(id.index()).logged())
    }
}

impl<K> Cache<K, Value>
where
    K: Hash + Eq + Clone,
{
    /// Like [`Cache::put`], but updating an existing key fails with
    /// [`Error::TypeMismatch`] if the value kind changes. Nothing is modified
    /// on failure.
    pub fn put_typed(&mut self, entry: Entry<K, Value>) -> Result<()> {
        let existing = self.index.get(entry.key()).copied();
        let id = match existing {
            Some(id) if entry.state() != EntryState::Invalidated => id,
            _ => return self.put(entry),
        };

        let value = entry
            .into_value()
            .ok_or_else(|| Error::InvalidEntry.logged())?;
        self.stored_mut(id)?.set_typed_value(value)?;
        self.promote_updated(id)
    }
}

impl<'a, K, V> IntoIterator for &'a Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cache: &Cache<u32, u32>) -> Vec<u32> {
        cache.iter().map(|e| *e.key()).collect()
    }

    fn filled(max_size: usize, n: u32) -> Cache<u32, u32> {
        let mut cache = Cache::new(max_size).unwrap();
        for k in 0..n {
            cache.insert(k, k).unwrap();
        }
        cache
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Cache::<u32, u32>::new(0).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_scenario_promotion() {
        let mut cache = filled(3, 3);
        assert_eq!(*cache.head().unwrap().key(), 0);
        assert_eq!(*cache.tail().unwrap().key(), 2);

        cache.get(&2).unwrap();
        assert_eq!(*cache.tail().unwrap().key(), 2);
        assert_eq!(keys(&cache), vec![0, 1, 2]);

        cache.get(&0).unwrap();
        assert_eq!(*cache.head().unwrap().key(), 1);
        assert_eq!(*cache.tail().unwrap().key(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_scenario_eviction() {
        let mut cache = filled(3, 3);
        cache.insert(3, 3).unwrap();

        assert_eq!(*cache.head().unwrap().key(), 1);
        assert_eq!(*cache.tail().unwrap().key(), 3);
        assert_eq!(keys(&cache), vec![1, 2, 3]);
        assert!(!cache.contains(&0));
        assert_eq!(cache.stats().evictions(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_scenario_single_slot() {
        let mut cache = filled(1, 1);
        cache.insert(1, 1).unwrap();

        assert_eq!(*cache.head().unwrap().key(), 1);
        assert_eq!(*cache.tail().unwrap().key(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&0).unwrap_err(), Error::NotFound);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_scenario_update_in_place() {
        let mut cache = filled(3, 3);
        cache.insert(0, 100).unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(keys(&cache), vec![1, 2, 0]);
        assert_eq!(cache.peek(&0).unwrap().value(), Some(&100));
        assert_eq!(cache.stats().updates(), 1);
        assert_eq!(cache.stats().evictions(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_update_at_capacity_does_not_evict() {
        let mut cache = filled(2, 2);
        cache.insert(0, 7).unwrap();
        cache.insert(1, 8).unwrap();

        assert_eq!(keys(&cache), vec![0, 1]);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_failed_lookup_leaves_state() {
        let mut cache = filled(3, 3);
        let before = keys(&cache);

        assert_eq!(cache.get(&42).unwrap_err(), Error::NotFound);
        assert_eq!(keys(&cache), before);
        assert_eq!(cache.stats().misses(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_get_on_empty() {
        let mut cache: Cache<u32, u32> = Cache::new(2).unwrap();
        assert_eq!(cache.get(&0).unwrap_err().code().as_u16(), 3001);
        assert!(cache.head().is_none());
        assert!(cache.tail().is_none());
    }

    #[test]
    fn test_get_returns_same_entry() {
        let mut cache = filled(3, 3);
        let first = cache.get(&1).unwrap().id();
        let second = cache.get(&1).unwrap().id();

        assert_eq!(first, second);
        assert_eq!(keys(&cache), vec![0, 2, 1]);
    }

    #[test]
    fn test_get_by_entry_key() {
        let mut cache: Cache<String, u32> = Cache::new(2).unwrap();
        let entry = Entry::new("a".to_string(), 1);
        let handle = entry.clone();
        cache.put(entry).unwrap();

        assert_eq!(cache.get(handle.key()).unwrap().value(), Some(&1));
        assert_eq!(cache.get("a").unwrap().value(), Some(&1));
    }

    #[test]
    fn test_invalidated_entry_rejected() {
        let mut cache = filled(2, 1);
        let mut entry = Entry::new(5, 5);
        entry.invalidate();

        assert_eq!(cache.put(entry), Err(Error::InvalidEntry));
        assert_eq!(keys(&cache), vec![0]);
    }

    #[test]
    fn test_remove() {
        let mut cache = filled(3, 3);

        assert_eq!(cache.remove(&1), Ok(Some(1)));
        assert_eq!(cache.remove(&1), Ok(None));
        assert_eq!(keys(&cache), vec![0, 2]);
        cache.check_invariants().unwrap();

        cache.remove(&0).unwrap();
        cache.remove(&2).unwrap();
        assert!(cache.is_empty());
        assert!(cache.head().is_none());
        assert!(cache.tail().is_none());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = filled(3, 3);
        assert_eq!(cache.peek(&0).unwrap().value(), Some(&0));
        assert_eq!(*cache.head().unwrap().key(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = filled(3, 3);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.iter().count(), 0);
        cache.check_invariants().unwrap();

        cache.insert(9, 9).unwrap();
        assert_eq!(keys(&cache), vec![9]);
    }

    #[test]
    fn test_put_typed_rejects_kind_change() {
        let mut cache: Cache<&str, Value> = Cache::new(2).unwrap();
        cache.put_typed(Entry::new("a", Value::Int(1))).unwrap();
        cache.put_typed(Entry::new("b", Value::from("x"))).unwrap();

        let err = cache.put_typed(Entry::new("a", Value::from("oops"))).unwrap_err();
        assert_eq!(err, Error::TypeMismatch { expected: "int", found: "str" });
        assert_eq!(*cache.head().unwrap().key(), "a");
        assert_eq!(cache.peek("a").unwrap().value(), Some(&Value::Int(1)));

        cache.put_typed(Entry::new("a", Value::Int(2))).unwrap();
        assert_eq!(*cache.tail().unwrap().key(), "a");
        assert_eq!(cache.peek("a").unwrap().value(), Some(&Value::Int(2)));
    }

    #[test]
    fn test_plain_put_replaces_kind() {
        let mut cache: Cache<&str, Value> = Cache::new(2).unwrap();
        cache.put(Entry::new("a", Value::Int(1))).unwrap();
        cache.put(Entry::new("a", Value::from("text"))).unwrap();
        assert_eq!(cache.peek("a").unwrap().value(), Some(&Value::from("text")));

        let err = cache.put_typed(Entry::new("a", Value::Int(2))).unwrap_err();
        assert_eq!(err.code().as_u16(), 2001);
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let mut cache: Cache<u32, u32> = Cache::new(usize::MAX).unwrap();
        for k in 0..10 {
            cache.insert(k, k).unwrap();
        }
        assert_eq!(cache.capacity(), usize::MAX);
        assert_eq!(cache.len(), 10);
        cache.check_invariants().unwrap();

        let mut cache: Cache<u32, u32> = Cache::new(usize::MAX / 2).unwrap();
        cache.insert(1, 1).unwrap();
        assert_eq!(cache.get(&1).unwrap().value(), Some(&1));
    }

    #[test]
    fn test_remove_of_dangling_slot_keeps_index() {
        let mut cache = filled(3, 3);
        let id = cache.peek(&1).unwrap().id().unwrap();
        cache.list.remove(id).unwrap();

        assert_eq!(cache.remove(&1), Err(Error::InvalidLink(id.index())));
        assert!(cache.contains(&1));
    }

    #[test]
    fn test_mismatched_index_reported() {
        let mut cache = filled(3, 3);
        cache.index.remove(&2);

        let err = cache.check_invariants().unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
        assert_eq!(err.code().as_u16(), 1001);
    }

    #[test]
    fn test_iter_len_is_exact() {
        let mut cache = filled(4, 4);
        cache.remove(&1).unwrap();

        let mut iter = cache.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_stats() {
        let mut cache = filled(2, 3);
        cache.get(&2).unwrap();
        let _ = cache.get(&0);

        let stats = cache.stats();
        assert_eq!(stats.inserts(), 3);
        assert_eq!(stats.evictions(), 1);
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);

        cache.reset_stats();
        assert_eq!(cache.stats().hits(), 0);
    }
}
