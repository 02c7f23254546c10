//! Recency-ordered doubly-linked list over an entry arena
//!
//! Head is the least recently used entry, tail the most recently used.
//! Slots freed by removal are recycled through a free list.

use crate::entry::{Entry, EntryId};
use crate::error::{Error, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand
pub(crate) const PREALLOC_LIMIT: usize = 4096;

pub(crate) struct EntryList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free_list: Vec<usize>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
}

impl<K, V> EntryList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            // one extra slot: an insert links in before the eviction runs
            slots: Vec::with_capacity(capacity.saturating_add(1).min(PREALLOC_LIMIT)),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> Option<EntryId> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    pub(crate) fn get(&self, id: EntryId) -> Option<&Entry<K, V>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Attach an entry at the tail and return its handle
    pub(crate) fn push_back(&mut self, mut entry: Entry<K, V>) -> Result<EntryId> {
        let id = self.alloc_slot();
        entry.attach(id);
        self.slots[id.0] = Some(entry);
        self.len += 1;
        self.append(id)?;
        Ok(id)
    }

    /// Detach an entry and free its slot. The entry comes back still linked
    /// in state; the caller decides whether to invalidate it.
    pub(crate) fn remove(&mut self, id: EntryId) -> Result<Entry<K, V>> {
        self.unlink(id)?;
        let entry = self.slots[id.0]
            .take()
            .ok_or_else(|| Error::InvalidLink(id.0).logged())?;
        self.free_list.push(id.0);
        self.len -= 1;
        Ok(entry)
    }

    /// Promote an entry to the tail.
    pub(crate) fn move_to_back(&mut self, id: EntryId) -> Result<()> {
        if self.tail == Some(id) {
            return Ok(());
        }
        self.unlink(id)?;
        self.append(id)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walk from head to tail
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Verify links and head/tail bookkeeping; returns the walked length.
    pub(crate) fn check(&self) -> Result<usize> {
        if self.head.is_none() != self.tail.is_none() || self.head.is_none() != (self.len == 0) {
            return Err(Error::Invariant(format!(
                "head {:?}, tail {:?} and len {} disagree",
                self.head, self.tail, self.len
            ))
            .logged());
        }

        let mut walked = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if walked == self.len {
                return Err(Error::Invariant(format!(
                    "walk from head exceeds len {}",
                    self.len
                ))
                .logged());
            }
            let entry = self
                .get(id)
                .ok_or_else(|| Error::Invariant(format!("dangling link to slot {}", id.0)).logged())?;
            if entry.id() != Some(id) || !entry.is_linked() {
                return Err(
                    Error::Invariant(format!("slot {} holds a detached entry", id.0)).logged(),
                );
            }
            if entry.prev() != prev {
                return Err(Error::Invariant(format!(
                    "slot {} prev {:?} does not match predecessor {:?}",
                    id.0,
                    entry.prev(),
                    prev
                ))
                .logged());
            }
            if entry.next() == Some(id) || entry.prev() == Some(id) {
                return Err(Error::Invariant(format!("slot {} links to itself", id.0)).logged());
            }
            walked += 1;
            prev = Some(id);
            cursor = entry.next();
        }

        if prev != self.tail {
            return Err(Error::Invariant(format!(
                "walk ended at {:?} but tail is {:?}",
                prev, self.tail
            ))
            .logged());
        }
        if walked != self.len {
            return Err(Error::Invariant(format!(
                "walked {} entries but len is {}",
                walked, self.len
            ))
            .logged());
        }
        Ok(walked)
    }

    /// Make `a.next == b` and `b.prev == a`
    fn link(&mut self, a: EntryId, b: EntryId) -> Result<()> {
        if a == b {
            return Err(Error::SelfLink.logged());
        }
        self.entry_mut(a)?.set_next(Some(b))?;
        self.entry_mut(b)?.set_prev(Some(a))
    }

    /// Place a detached entry after the current tail
    fn append(&mut self, id: EntryId) -> Result<()> {
        match self.tail {
            Some(tail) => self.link(tail, id)?,
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        Ok(())
    }

    fn unlink(&mut self, id: EntryId) -> Result<()> {
        let (prev, next) = {
            let entry = self.entry_mut(id)?;
            (entry.prev(), entry.next())
        };

        match prev {
            Some(prev_id) => self.entry_mut(prev_id)?.set_next(next)?,
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.entry_mut(next_id)?.set_prev(prev)?,
            None => self.tail = prev,
        }

        let entry = self.entry_mut(id)?;
        entry.set_prev(None)?;
        entry.set_next(None)
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut Entry<K, V>> {
        self.get_mut(id)
            .ok_or_else(|| Error::InvalidLink(id.0).logged())
    }

    fn alloc_slot(&mut self) -> EntryId {
        if let Some(idx) = self.free_list.pop() {
            EntryId(idx)
        } else {
            self.slots.push(None);
            EntryId(self.slots.len() - 1)
        }
    }
}

/// Iterator over entries from least to most recently used
pub struct Iter<'a, K, V> {
    list: &'a EntryList<K, V>,
    cursor: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next();
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
