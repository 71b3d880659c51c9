//! Opaque handles for values owned on behalf of a foreign caller.
//!
//! Handles index a slot arena. Each slot carries a generation counter that is
//! bumped whenever its value is removed, so a stale handle never resolves,
//! even after the slot has been reused.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

/// An opaque reference to a registry entry.
///
/// The low 32 bits hold the slot index plus one, the high 32 bits the slot
/// generation. [`Handle::NULL`] never refers to a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// The sentinel handle.
    pub const NULL: Handle = Handle(0);

    fn new(index: usize, generation: u32) -> Self {
        let low = index as u64 + 1;
        Handle((u64::from(generation) << 32) | low)
    }

    /// Returns the raw integer passed across the C ABI.
    pub fn as_raw(self) -> u64 {
        self.0
    }

    /// Wraps a raw integer received from the C ABI.
    pub fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }

    /// Returns `true` for the sentinel handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    fn index(self) -> Option<usize> {
        let low = self.0 & u64::from(u32::MAX);
        low.checked_sub(1).map(|i| i as usize)
    }

    fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<Arc<Mutex<T>>>,
}

struct Slots<T> {
    entries: Vec<Slot<T>>,
    free: Vec<usize>,
    live: usize,
}

/// A thread-safe map from [`Handle`]s to owned values.
///
/// Each value sits behind its own mutex, so operations on one entry are
/// serialized while different entries can be used concurrently.
pub struct Registry<T> {
    slots: Mutex<Slots<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Registry {
            slots: Mutex::new(Slots {
                entries: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` and returns a new handle to it.
    pub fn insert(&self, value: T) -> Handle {
        let value = Arc::new(Mutex::new(value));
        let mut slots = self.slots();
        slots.live += 1;
        if let Some(index) = slots.free.pop() {
            let slot = &mut slots.entries[index];
            slot.value = Some(value);
            return Handle::new(index, slot.generation);
        }
        let index = slots.entries.len();
        slots.entries.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle::new(index, 0)
    }

    /// Resolves `handle` to its entry.
    pub fn get(&self, handle: Handle) -> Result<Arc<Mutex<T>>> {
        let slots = self.slots();
        let index = handle.index().ok_or(Error::InvalidHandle(handle.as_raw()))?;
        match slots.entries.get(index) {
            Some(Slot {
                generation,
                value: Some(value),
            }) if *generation == handle.generation() => Ok(Arc::clone(value)),
            _ => Err(Error::InvalidHandle(handle.as_raw())),
        }
    }

    /// Removes the entry behind `handle`.
    ///
    /// The value is dropped once no caller still holds it from [`Registry::get`].
    pub fn remove(&self, handle: Handle) -> Result<()> {
        let removed = {
            let mut guard = self.slots();
            let slots = &mut *guard;
            let index = handle.index().ok_or(Error::InvalidHandle(handle.as_raw()))?;
            let slot = match slots.entries.get_mut(index) {
                Some(slot) if slot.generation == handle.generation() && slot.value.is_some() => {
                    slot
                }
                _ => return Err(Error::InvalidHandle(handle.as_raw())),
            };
            let removed = slot.value.take();
            // a retired slot stays out of the free list so its handles stay dead
            slot.generation = slot.generation.wrapping_add(1);
            if slot.generation != 0 {
                slots.free.push(index);
            }
            slots.live -= 1;
            removed
        };
        // drop outside the table lock, the value may be expensive to destroy
        drop(removed);
        Ok(())
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.slots().live
    }

    /// Returns `true` if no entry is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locks an entry obtained from [`Registry::get`].
pub fn lock<T>(entry: &Mutex<T>) -> MutexGuard<'_, T> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn insert_and_get() {
        let registry = Registry::new();
        let a = registry.insert(1);
        let b = registry.insert(2);
        assert!(!a.is_null());
        assert_ne!(a, b);
        assert_eq!(*lock(&registry.get(a).unwrap()), 1);
        assert_eq!(*lock(&registry.get(b).unwrap()), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn null_never_resolves() {
        let registry = Registry::new();
        registry.insert("value");
        assert_eq!(
            registry.get(Handle::NULL).unwrap_err(),
            Error::InvalidHandle(0)
        );
        assert_eq!(
            registry.remove(Handle::NULL).unwrap_err(),
            Error::InvalidHandle(0)
        );
    }

    #[test]
    fn removed_handle_is_invalid() {
        let registry = Registry::new();
        let h = registry.insert(10);
        registry.remove(h).unwrap();
        assert!(matches!(registry.get(h), Err(Error::InvalidHandle(_))));
        assert!(matches!(registry.remove(h), Err(Error::InvalidHandle(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let registry = Registry::new();
        let old = registry.insert(1);
        registry.remove(old).unwrap();
        let new = registry.insert(2);

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(registry.get(old).is_err());
        assert_eq!(*lock(&registry.get(new).unwrap()), 2);
    }

    #[test]
    fn unknown_handles() {
        let registry: Registry<u8> = Registry::new();
        assert!(registry.get(Handle::from_raw(1)).is_err());
        assert!(registry.get(Handle::from_raw(u64::MAX)).is_err());
        assert!(registry.get(Handle::from_raw(1 << 32)).is_err());
    }

    #[test]
    fn value_outlives_removal_while_in_use() {
        let registry = Registry::new();
        let h = registry.insert(vec![1, 2, 3]);
        let entry = registry.get(h).unwrap();
        registry.remove(h).unwrap();
        assert_eq!(lock(&entry).len(), 3);
    }

    #[test]
    fn concurrent_handles() {
        let registry = Registry::new();
        let handles: Vec<Handle> = (0..64)
            .into_par_iter()
            .map(|i| registry.insert(i))
            .collect();

        handles.par_iter().for_each(|h| {
            let entry = registry.get(*h).unwrap();
            *lock(&entry) += 1000;
        });

        let mut values: Vec<i32> = handles
            .iter()
            .map(|h| *lock(&registry.get(*h).unwrap()))
            .collect();
        values.sort();
        assert_eq!(values, (1000..1064).collect::<Vec<_>>());

        handles.par_iter().for_each(|h| registry.remove(*h).unwrap());
        assert!(registry.is_empty());
    }
}
