//! # Named Resource Cache
//!
//! Deduplicates resource loads by name (usually a file path) on top of a
//! [`SlotMap`]: the second request for `"meshes/flag.obj"` returns the handle
//! from the first.

use std::collections::HashMap;

use super::slot_map::{Handle, SlotMap};
use crate::config::StoreConfig;
use crate::error::CoreResult;

/// Name-keyed cache of `T` values stored in a slot-map.
///
/// # Example
///
/// ```rust
/// use wikigolf_core::ResourceCache;
///
/// let mut shaders: ResourceCache<String> = ResourceCache::new();
/// let a = shaders
///     .get_or_load("shaders/sky.hlsl", |path| Ok::<_, ()>(format!("compiled {path}")))
///     .unwrap();
/// let b = shaders
///     .get_or_load("shaders/sky.hlsl", |_| Err(()))
///     .unwrap();
/// assert_eq!(a, b);
/// ```
pub struct ResourceCache<T: Default> {
    slots: SlotMap<T>,
    names: HashMap<String, Handle>,
}

impl<T: Default> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> ResourceCache<T> {
    /// Creates an empty cache with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty cache whose slot-map follows `config`.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            slots: SlotMap::with_config(config),
            names: HashMap::new(),
        }
    }

    /// Wraps an existing slot-map (e.g. one built with a fallback value).
    #[must_use]
    pub fn from_slot_map(slots: SlotMap<T>) -> Self {
        Self {
            slots,
            names: HashMap::new(),
        }
    }

    /// Returns the handle cached under `name`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached in that case.
    pub fn get_or_load<E>(
        &mut self,
        name: &str,
        load: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Handle, E> {
        if let Some(handle) = self.handle_of(name) {
            tracing::trace!(resource = name, "resource cache hit");
            return Ok(handle);
        }

        let value = load(name)?;
        let handle = self.slots.add(value);
        self.names.insert(name.to_owned(), handle);
        tracing::debug!(resource = name, index = handle.index(), "resource loaded");
        Ok(handle)
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: T) -> Handle {
        if let Some(old) = self.names.remove(name) {
            self.slots.remove(old);
        }
        let handle = self.slots.add(value);
        self.names.insert(name.to_owned(), handle);
        handle
    }

    /// Live handle cached under `name`.
    #[must_use]
    pub fn handle_of(&self, name: &str) -> Option<Handle> {
        self.names
            .get(name)
            .copied()
            .filter(|&handle| self.slots.contains(handle))
    }

    /// Gets a value, applying the slot-map's invalid-handle policy.
    #[must_use]
    pub fn get(&self, handle: Handle) -> &T {
        self.slots.get(handle)
    }

    /// Gets a value, reporting invalid handles as errors.
    ///
    /// # Errors
    ///
    /// Same as [`SlotMap::try_get`].
    pub fn try_get(&self, handle: Handle) -> CoreResult<&T> {
        self.slots.try_get(handle)
    }

    /// Evicts the value cached under `name`.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let handle = self.names.remove(name)?;
        self.slots.remove(handle)
    }

    /// Number of cached values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Evicts everything.
    pub fn clear(&mut self) {
        self.names.clear();
        self.slots.clear();
    }

    /// Underlying slot-map.
    #[must_use]
    pub fn slots(&self) -> &SlotMap<T> {
        &self.slots
    }
}
