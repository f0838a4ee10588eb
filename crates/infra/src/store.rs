//! Item storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use courier_core::{DomainError, DomainResult, Entity, Item, ItemId, NewItem};

/// Item store abstraction.
///
/// Implementations own their items exclusively: every returned `Item` is a
/// snapshot copy, so later changes inside the store are never observed
/// through it. Each operation is atomic with respect to all others.
pub trait ItemStore: Send + Sync {
    /// Store a new item with status `Pending`.
    ///
    /// Fails with `Conflict` if the id is taken; the stored item is kept.
    fn insert(&self, new: NewItem) -> DomainResult<Item>;

    /// Set the item's status to `Approved`, whatever it was before.
    fn approve(&self, id: &ItemId) -> DomainResult<Item>;

    /// Set the item's status to `Rejected`.
    ///
    /// Fails with `NotFound` for an unknown id, then with
    /// `InvalidTransition` if the item is already approved.
    fn reject(&self, id: &ItemId) -> DomainResult<Item>;

    /// Snapshot of every stored item, in no particular order.
    fn list(&self) -> DomainResult<Vec<Item>>;

    /// Number of stored items.
    fn len(&self) -> DomainResult<usize>;

    fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    fn insert(&self, new: NewItem) -> DomainResult<Item> {
        (**self).insert(new)
    }

    fn approve(&self, id: &ItemId) -> DomainResult<Item> {
        (**self).approve(id)
    }

    fn reject(&self, id: &ItemId) -> DomainResult<Item> {
        (**self).reject(id)
    }

    fn list(&self) -> DomainResult<Vec<Item>> {
        (**self).list()
    }

    fn len(&self) -> DomainResult<usize> {
        (**self).len()
    }
}

/// In-memory item store guarded by a single mutex.
///
/// Items live for the lifetime of the process; nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: Mutex<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, HashMap<ItemId, Item>>> {
        self.items
            .lock()
            .map_err(|_| DomainError::unavailable("item store lock poisoned"))
    }
}

impl ItemStore for InMemoryItemStore {
    fn insert(&self, new: NewItem) -> DomainResult<Item> {
        let mut items = self.lock()?;
        if items.contains_key(&new.id) {
            return Err(DomainError::Conflict(new.id));
        }
        let item = Item::pending(new);
        items.insert(item.id().clone(), item.clone());
        Ok(item)
    }

    fn approve(&self, id: &ItemId) -> DomainResult<Item> {
        let mut items = self.lock()?;
        let item = items.get_mut(id).ok_or_else(|| DomainError::not_found(id))?;
        item.approve();
        Ok(item.clone())
    }

    fn reject(&self, id: &ItemId) -> DomainResult<Item> {
        let mut items = self.lock()?;
        let item = items.get_mut(id).ok_or_else(|| DomainError::not_found(id))?;
        item.reject()?;
        Ok(item.clone())
    }

    fn list(&self) -> DomainResult<Vec<Item>> {
        let items = self.lock()?;
        Ok(items.values().cloned().collect())
    }

    fn len(&self) -> DomainResult<usize> {
        Ok(self.lock()?.len())
    }
}
