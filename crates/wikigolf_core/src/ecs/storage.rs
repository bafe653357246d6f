//! # Component Storage
//!
//! Sparse-set storage for a single component type.
//!
//! ```text
//! sparse:  [ 2 | - | 0 | - | 1 ]     entity index -> dense slot
//! owners:  [ e2, e4, e0 ]            dense slot -> owning entity
//! dense:   [ c2, c4, c0 ]            packed component values
//! ```
//!
//! - Insert, lookup and removal are O(1)
//! - Removal swaps the last element into the hole, so dense order is
//!   **not** stable across removals
//! - The sparse array only grows; it covers the highest entity index seen

use std::any::Any;

use super::component::Component;
use super::entity::Entity;

/// Sparse entry meaning "no dense slot".
const INVALID: u32 = u32::MAX;

/// Storage for one component type, keyed by entity.
///
/// Invariants:
/// - `dense.len() == owners.len()`
/// - for every entity `e` stored here, `owners[sparse[e.index()]] == e`
///
/// # Example
///
/// ```rust
/// use wikigolf_core::{Component, ComponentPool, Entity};
///
/// struct Score(u32);
/// impl Component for Score {}
///
/// let mut pool: ComponentPool<Score> = ComponentPool::new(16);
/// let e = Entity::new(3, 0);
/// pool.add(e, Score(10));
/// assert_eq!(pool.get(e).map(|s| s.0), Some(10));
/// ```
pub struct ComponentPool<T: Component> {
    /// Packed component values.
    dense: Vec<T>,
    /// Owner of each dense slot.
    owners: Vec<Entity>,
    /// Entity index -> dense slot, or `INVALID`.
    sparse: Vec<u32>,
}

impl<T: Component> ComponentPool<T> {
    /// Creates an empty pool whose sparse array starts at `initial_sparse`.
    #[must_use]
    pub fn new(initial_sparse: usize) -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: vec![INVALID; initial_sparse],
        }
    }

    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the pool holds no components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Current length of the sparse array.
    #[inline]
    #[must_use]
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    /// Dense slot for `entity`, validated against the owner table.
    #[inline]
    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(usize::from(entity.index()))?;
        if slot == INVALID {
            return None;
        }
        let slot = slot as usize;
        // A stale sparse entry must never resolve to another entity's data.
        (self.owners.get(slot) == Some(&entity)).then_some(slot)
    }

    /// Whether `entity` has a component in this pool.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Gets the component for `entity`.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.dense[slot])
    }

    /// Gets the component for `entity` mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot_of(entity).map(move |slot| &mut self.dense[slot])
    }

    /// Inserts or overwrites the component for `entity`.
    ///
    /// An existing component is replaced in place; the pool never holds two
    /// slots for the same entity.
    pub fn add(&mut self, entity: Entity, value: T) -> &mut T {
        debug_assert!(!entity.is_null(), "cannot attach a component to the null entity");
        let index = usize::from(entity.index());
        self.ensure_sparse(index);

        let slot = self.sparse[index];
        if slot != INVALID {
            let slot = slot as usize;
            if self.owners.get(slot).is_some_and(|owner| owner.index() == entity.index()) {
                self.owners[slot] = entity;
                self.dense[slot] = value;
                return &mut self.dense[slot];
            }
        }

        let slot = self.dense.len();
        self.sparse[index] = u32::try_from(slot).unwrap_or(INVALID);
        self.dense.push(value);
        self.owners.push(entity);
        &mut self.dense[slot]
    }

    /// Removes the component for `entity`, returning it.
    ///
    /// The last dense element is swapped into the vacated slot.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_of(entity)?;
        let last = self.dense.len() - 1;

        let value = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);

        if slot != last {
            let moved = self.owners[slot];
            self.sparse[usize::from(moved.index())] = slot as u32;
        }
        self.sparse[usize::from(entity.index())] = INVALID;

        Some(value)
    }

    /// Removes every component, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.owners.clear();
        self.sparse.fill(INVALID);
    }

    /// Entities owning a component, in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Owning entities as packed `u32`s, for upload into picking buffers.
    #[inline]
    #[must_use]
    pub fn entity_bits(&self) -> &[u32] {
        bytemuck::cast_slice(&self.owners)
    }

    /// Component values, in dense order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }

    /// Grows the sparse array (doubling) until `index` is covered.
    fn ensure_sparse(&mut self, index: usize) {
        if index < self.sparse.len() {
            return;
        }
        let mut len = self.sparse.len().max(1);
        while len <= index {
            len *= 2;
        }
        self.sparse.resize(len, INVALID);
    }
}

/// Type-erased view of a [`ComponentPool`], letting the world hold pools of
/// every component type in one table.
pub trait ErasedPool: Any {
    /// Removes `entity`'s component if present. Returns whether one existed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Whether `entity` has a component in this pool.
    fn contains(&self, entity: Entity) -> bool;

    /// Removes every component.
    fn clear(&mut self);

    /// Number of live components.
    fn len(&self) -> usize;

    /// Whether the pool is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Component type name for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedPool for ComponentPool<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn clear(&mut self) {
        ComponentPool::clear(self);
    }

    fn len(&self) -> usize {
        ComponentPool::len(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
