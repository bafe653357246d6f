//! # Generational Slot-Map
//!
//! Address-stable pool for externally referenced resources (meshes, shaders,
//! audio clips), one slot-map per resource kind.
//!
//! Unlike component pools, slots are never compacted. Storage is a list of
//! fixed-size boxed chunks: growing the list moves chunk pointers, never the
//! slots themselves, so a reference obtained from [`SlotMap::get`] points at
//! the same memory no matter how many values are added afterwards.
//!
//! ```text
//! chunks: [ *--> [s0 s1 s2 s3] ]
//!         [ *--> [s4 s5 s6 s7] ]   <- new chunk appended, s0..s3 untouched
//! ```

use std::cell::Cell;

use bytemuck::{Pod, Zeroable};

use crate::config::{AccessPolicy, StoreConfig};
use crate::error::{CoreError, CoreResult};

/// Handle to a value in a [`SlotMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Index value reserved for "no handle".
    pub const SENTINEL: u32 = u32::MAX;

    /// The "no handle" handle.
    pub const INVALID: Self = Self::new(Self::SENTINEL, 0);

    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Whether this is the sentinel handle.
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.index == Self::SENTINEL
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::INVALID
    }
}

#[derive(Default)]
struct Slot<T> {
    value: T,
    generation: u32,
    alive: bool,
}

/// Generational, address-stable pool of `T`.
///
/// Invalid handle policy for [`SlotMap::get`] / [`SlotMap::get_mut`]:
/// - [`AccessPolicy::Strict`]: panic, the access is a logic error
/// - [`AccessPolicy::Lenient`]: log once, return the fallback value
///
/// # Thread Safety
///
/// This slot-map is NOT thread-safe. One frame update owns it at a time.
///
/// # Example
///
/// ```rust
/// use wikigolf_core::SlotMap;
///
/// let mut meshes: SlotMap<Vec<f32>> = SlotMap::new();
/// let quad = meshes.add(vec![0.0, 1.0, 1.0, 0.0]);
/// assert_eq!(meshes.get(quad).len(), 4);
///
/// meshes.remove(quad);
/// assert!(meshes.try_get(quad).is_err());
/// ```
pub struct SlotMap<T: Default> {
    /// Fixed-size chunks; never reallocated once created.
    chunks: Vec<Box<[Slot<T>]>>,
    /// Slots per chunk.
    chunk_size: usize,
    /// Slots handed out so far (alive or free).
    slot_count: usize,
    /// Free slot indices, reused LIFO.
    free_list: Vec<u32>,
    /// Number of live values.
    live: usize,
    /// What `get` does with an invalid handle.
    policy: AccessPolicy,
    /// Returned for invalid handles under the lenient policy.
    fallback: T,
    /// Whether an invalid access has already been logged.
    warned: Cell<bool>,
}

impl<T: Default> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> SlotMap<T> {
    /// Creates an empty slot-map with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty slot-map using `config`'s chunk size and policy.
    ///
    /// # Panics
    ///
    /// Panics if `config.slot_chunk_size` is zero.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        assert!(config.slot_chunk_size > 0, "Chunk size must be greater than zero");
        Self {
            chunks: Vec::new(),
            chunk_size: config.slot_chunk_size,
            slot_count: 0,
            free_list: Vec::new(),
            live: 0,
            policy: config.access_policy,
            fallback: T::default(),
            warned: Cell::new(false),
        }
    }

    /// Replaces the value handed out for invalid handles in lenient mode.
    #[must_use]
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = fallback;
        self
    }

    /// Current invalid-handle policy.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Switches the invalid-handle policy.
    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    /// Whether an invalid access has been logged since the last reset.
    #[inline]
    #[must_use]
    pub fn has_warned(&self) -> bool {
        self.warned.get()
    }

    /// Re-arms the one-shot invalid access log.
    pub fn reset_warning(&self) {
        self.warned.set(false);
    }

    /// Number of live values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether no value is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots allocated across all chunks.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunks.len() * self.chunk_size
    }

    #[inline]
    fn slot(&self, index: usize) -> &Slot<T> {
        &self.chunks[index / self.chunk_size][index % self.chunk_size]
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        &mut self.chunks[index / self.chunk_size][index % self.chunk_size]
    }

    /// Stores `value`, reusing a freed slot if one exists.
    ///
    /// # Panics
    ///
    /// Panics if the 32-bit index space is exhausted.
    pub fn add(&mut self, value: T) -> Handle {
        let index = if let Some(index) = self.free_list.pop() {
            index
        } else {
            let index = u32::try_from(self.slot_count)
                .ok()
                .filter(|&index| index != Handle::SENTINEL)
                .unwrap_or_else(|| panic!("slot-map index space exhausted"));
            if self.slot_count == self.capacity() {
                let chunk: Box<[Slot<T>]> =
                    (0..self.chunk_size).map(|_| Slot::default()).collect();
                self.chunks.push(chunk);
            }
            self.slot_count += 1;
            index
        };

        let slot = self.slot_mut(index as usize);
        slot.value = value;
        slot.alive = true;
        let handle = Handle::new(index, slot.generation);
        self.live += 1;
        handle
    }

    /// Resolves `handle` to a slot index, or explains why it cannot.
    fn locate(&self, handle: Handle) -> CoreResult<usize> {
        let index = handle.index as usize;
        if handle.is_invalid() || index >= self.slot_count {
            return Err(CoreError::InvalidHandle {
                index: handle.index,
            });
        }
        let slot = self.slot(index);
        if slot.generation != handle.generation {
            return Err(CoreError::StaleHandle {
                index: handle.index,
                generation: handle.generation,
                current: slot.generation,
            });
        }
        if !slot.alive {
            return Err(CoreError::DeadSlot {
                index: handle.index,
            });
        }
        Ok(index)
    }

    /// Whether `handle` refers to a live value.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.locate(handle).is_ok()
    }

    /// Gets the value for `handle`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidHandle`], [`CoreError::StaleHandle`] or
    /// [`CoreError::DeadSlot`] if the handle does not refer to a live value.
    pub fn try_get(&self, handle: Handle) -> CoreResult<&T> {
        let index = self.locate(handle)?;
        Ok(&self.slot(index).value)
    }

    /// Gets the value for `handle` mutably.
    ///
    /// # Errors
    ///
    /// Same as [`SlotMap::try_get`].
    pub fn try_get_mut(&mut self, handle: Handle) -> CoreResult<&mut T> {
        let index = self.locate(handle)?;
        Ok(&mut self.slot_mut(index).value)
    }

    /// Gets the value for `handle`, applying the invalid-handle policy.
    ///
    /// # Panics
    ///
    /// Panics on an invalid handle under [`AccessPolicy::Strict`].
    #[must_use]
    pub fn get(&self, handle: Handle) -> &T {
        match self.locate(handle) {
            Ok(index) => &self.slot(index).value,
            Err(err) => {
                self.invalid_access(&err);
                &self.fallback
            }
        }
    }

    /// Gets the value for `handle` mutably, applying the invalid-handle policy.
    ///
    /// # Panics
    ///
    /// Panics on an invalid handle under [`AccessPolicy::Strict`].
    pub fn get_mut(&mut self, handle: Handle) -> &mut T {
        match self.locate(handle) {
            Ok(index) => &mut self.slot_mut(index).value,
            Err(err) => {
                self.invalid_access(&err);
                &mut self.fallback
            }
        }
    }

    fn invalid_access(&self, err: &CoreError) {
        match self.policy {
            AccessPolicy::Strict => panic!("invalid resource access: {err}"),
            AccessPolicy::Lenient => {
                if !self.warned.replace(true) {
                    tracing::error!(
                        error = %err,
                        resource = std::any::type_name::<T>(),
                        "invalid resource access, substituting fallback"
                    );
                }
            }
        }
    }

    /// Removes the value for `handle`, returning it.
    ///
    /// The slot's generation is bumped and its index goes back on the free
    /// list. Stale or dead handles are ignored.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let index = self.locate(handle).ok()?;
        let slot = self.slot_mut(index);
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        let value = std::mem::take(&mut slot.value);
        self.free_list.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    /// Removes every value. Chunks are kept, so capacity is unchanged.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for index in (0..self.slot_count).rev() {
            let slot = self.slot_mut(index);
            if slot.alive {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.value = T::default();
            }
            // slot_count never exceeds the 32-bit index space
            self.free_list.push(index as u32);
        }
        self.live = 0;
    }

    /// Iterates over live values with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .take(self.slot_count)
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| (Handle::new(index as u32, slot.generation), &slot.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(chunk_size: usize) -> StoreConfig {
        StoreConfig {
            slot_chunk_size: chunk_size,
            access_policy: AccessPolicy::Lenient,
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_add_get_remove() {
        let mut map: SlotMap<u32> = SlotMap::new();
        let h = map.add(42);
        assert_eq!(*map.get(h), 42);
        assert_eq!(map.len(), 1);

        assert_eq!(map.remove(h), Some(42));
        assert!(map.is_empty());
        assert_eq!(map.remove(h), None);
    }

    #[test]
    fn test_reuse_bumps_generation() {
        let mut map: SlotMap<u32> = SlotMap::new();
        let h1 = map.add(1);
        map.remove(h1);
        let h2 = map.add(2);

        assert_eq!(h1.index(), h2.index());
        assert_ne!(h1.generation(), h2.generation());
        assert!(!map.contains(h1));
        assert_eq!(
            map.try_get(h1),
            Err(CoreError::StaleHandle {
                index: h1.index(),
                generation: 0,
                current: 1
            })
        );
        assert_eq!(map.try_get(h2), Ok(&2));
    }

    #[test]
    fn test_out_of_range_and_sentinel() {
        let map: SlotMap<u32> = SlotMap::new();
        assert_eq!(
            map.try_get(Handle::new(7, 0)),
            Err(CoreError::InvalidHandle { index: 7 })
        );
        assert!(map.try_get(Handle::INVALID).is_err());
        assert!(Handle::default().is_invalid());
    }

    #[test]
    fn test_addresses_stable_across_growth() {
        let mut map: SlotMap<[u64; 4]> = SlotMap::with_config(&lenient(4));
        let h = map.add([1, 2, 3, 4]);
        let before: *const [u64; 4] = map.get(h);

        for i in 0..1000 {
            map.add([i; 4]);
        }
        assert!(map.capacity() > 4);

        let after: *const [u64; 4] = map.get(h);
        assert!(std::ptr::eq(before, after));
        assert_eq!(*map.get(h), [1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_releases_value() {
        use std::rc::Rc;

        let shared = Rc::new(());
        let mut map: SlotMap<Option<Rc<()>>> = SlotMap::new();
        let h = map.add(Some(Rc::clone(&shared)));
        assert_eq!(Rc::strong_count(&shared), 2);

        drop(map.remove(h));
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn test_lenient_returns_fallback_and_logs_once() {
        let mut map = SlotMap::with_config(&lenient(8)).with_fallback(-1_i32);
        let h = map.add(5);
        map.remove(h);

        assert!(!map.has_warned());
        assert_eq!(*map.get(h), -1);
        assert!(map.has_warned());
        assert_eq!(*map.get(h), -1);

        map.reset_warning();
        assert!(!map.has_warned());
        *map.get_mut(h) = 3;
        assert!(map.has_warned());
    }

    #[test]
    #[should_panic(expected = "invalid resource access")]
    fn test_strict_panics() {
        let mut map: SlotMap<u32> = SlotMap::new();
        map.set_policy(AccessPolicy::Strict);
        let h = map.add(1);
        map.remove(h);
        let _ = map.get(h);
    }

    #[test]
    fn test_clear_keeps_capacity_and_invalidates() {
        let mut map: SlotMap<u32> = SlotMap::with_config(&lenient(2));
        let handles: Vec<Handle> = (0..5).map(|i| map.add(i)).collect();
        let capacity = map.capacity();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert!(handles.iter().all(|&h| !map.contains(h)));

        let fresh = map.add(9);
        assert_eq!(fresh.index(), 0);
        assert_eq!(*map.get(fresh), 9);
    }

    #[test]
    fn test_iter_skips_dead() {
        let mut map: SlotMap<u32> = SlotMap::new();
        let a = map.add(1);
        let b = map.add(2);
        let c = map.add(3);
        map.remove(b);

        let live: Vec<(Handle, u32)> = map.iter().map(|(h, v)| (h, *v)).collect();
        assert_eq!(live, vec![(a, 1), (c, 3)]);
    }
}
