//! Cache entries and their ordering links
//!
//! Links are arena handles ([`EntryId`]) rather than references. Keeping the
//! reciprocal side of a link consistent is the job of the owning list, which
//! holds both entries; an entry only validates and writes its own fields.

use crate::error::{Error, Result};
use crate::value::Value;

/// Stable handle to an entry slot in the ordering list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// Slot index inside the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of an entry: `Unattached -> Linked -> Invalidated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Created but not yet inserted into a cache
    Unattached,
    /// Member of a cache's index and ordering list
    Linked,
    /// Evicted or removed; never usable again
    Invalidated,
}

/// A key-value unit participating in the recency order
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    key: K,
    value: Option<V>,
    id: Option<EntryId>,
    prev: Option<EntryId>,
    next: Option<EntryId>,
    state: EntryState,
}

impl<K, V> Entry<K, V> {
    /// Create an unattached entry
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value: Some(value),
            id: None,
            prev: None,
            next: None,
            state: EntryState::Unattached,
        }
    }

    /// The entry's key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The stored value, `None` once invalidated
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Handle of the previous (less recently used) entry
    pub fn prev(&self) -> Option<EntryId> {
        self.prev
    }

    /// Handle of the next (more recently used) entry
    pub fn next(&self) -> Option<EntryId> {
        self.next
    }

    /// Own handle while linked into a cache
    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> EntryState {
        self.state
    }

    /// True while the entry is a cache member
    pub fn is_linked(&self) -> bool {
        self.state == EntryState::Linked
    }

    /// Point `next` at another entry.
    ///
    /// Fails with [`Error::SelfLink`] if `next` is this entry's own handle.
    pub fn set_next(&mut self, next: Option<EntryId>) -> Result<()> {
        self.check_link(next)?;
        self.next = next;
        Ok(())
    }

    /// Point `prev` at another entry.
    ///
    /// Fails with [`Error::SelfLink`] if `prev` is this entry's own handle.
    pub fn set_prev(&mut self, prev: Option<EntryId>) -> Result<()> {
        self.check_link(prev)?;
        self.prev = prev;
        Ok(())
    }

    /// Replace the value, returning the previous one.
    ///
    /// Fails with [`Error::InvalidEntry`] on an invalidated entry. No kind
    /// check is made; for [`Value`] entries use [`Entry::set_typed_value`].
    pub fn set_value(&mut self, value: V) -> Result<V> {
        if self.state == EntryState::Invalidated {
            return Err(Error::InvalidEntry.logged());
        }
        self.value
            .replace(value)
            .ok_or_else(|| Error::InvalidEntry.logged())
    }

    /// Clear value and links. The entry can never rejoin a cache.
    pub fn invalidate(&mut self) {
        self.value = None;
        self.id = None;
        self.prev = None;
        self.next = None;
        self.state = EntryState::Invalidated;
    }

    pub(crate) fn into_value(self) -> Option<V> {
        self.value
    }

    /// Take the value out and invalidate the entry
    pub(crate) fn take_value(&mut self) -> Option<V> {
        let value = self.value.take();
        self.invalidate();
        value
    }

    pub(crate) fn attach(&mut self, id: EntryId) {
        self.id = Some(id);
        self.prev = None;
        self.next = None;
        self.state = EntryState::Linked;
    }

    fn check_link(&self, target: Option<EntryId>) -> Result<()> {
        if target.is_some() && target == self.id {
            return Err(Error::SelfLink.logged());
        }
        Ok(())
    }
}

impl<K> Entry<K, Value> {
    /// Replace the value only if it has the same kind as the current one.
    ///
    /// Fails with [`Error::TypeMismatch`] without modifying the entry.
    pub fn set_typed_value(&mut self, value: Value) -> Result<Value> {
        if let Some(current) = &self.value {
            if !current.same_kind(&value) {
                return Err(Error::TypeMismatch {
                    expected: current.kind(),
                    found: value.kind(),
                }
                .logged());
            }
        }
        self.set_value(value)
    }
}
