//! # ECS World
//!
//! The central container for entities, component pools and global singletons.
//!
//! Pools are created lazily on the first `add` of a type and live in a table
//! indexed by [`TypeKey`]. Globals are owned by the world, never by the
//! process, so two worlds never share state.

use std::any::Any;
use std::collections::HashMap;

use super::component::{Component, TypeKey};
use super::entity::{Entity, EntitySlot};
use super::query::{Query, View};
use super::storage::{ComponentPool, ErasedPool};
use crate::config::StoreConfig;

/// Live count for one component pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Component type name.
    pub type_name: &'static str,
    /// Number of live components.
    pub len: usize,
}

/// Health-check snapshot of a world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Entity slots ever allocated.
    pub entity_slots: usize,
    /// Entities currently alive.
    pub active_entities: usize,
    /// Number of global singletons set.
    pub globals: usize,
    /// Per-pool live counts, in type-key order.
    pub pools: Vec<PoolStats>,
}

/// The ECS World - owner of all entity and component state.
///
/// # Example
///
/// ```rust
/// use wikigolf_core::{Component, World};
///
/// struct Position(f32, f32);
/// impl Component for Position {}
///
/// let mut world = World::new();
/// let e = world.create_entity();
/// world.add(e, Position(0.0, 1.0));
/// world.destroy_entity(e);
/// assert!(!world.is_alive(e));
/// assert!(world.get::<Position>(e).is_none());
/// ```
pub struct World {
    /// Generation and liveness per entity index.
    slots: Vec<EntitySlot>,
    /// Indices of destroyed entities, reused LIFO.
    free_indices: Vec<u16>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// One pool per component type, indexed by type key.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    /// At most one value per type.
    globals: HashMap<TypeKey, Box<dyn Any>>,
    /// Sizing for lazily created pools.
    config: StoreConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty world sized by `config`.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        let hint = config.entity_capacity_hint.min(usize::from(Entity::SENTINEL));
        Self {
            slots: Vec::with_capacity(hint),
            free_indices: Vec::new(),
            alive_count: 0,
            pools: Vec::new(),
            globals: HashMap::new(),
            config,
        }
    }

    /// Returns the configuration this world was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates a new entity.
    ///
    /// Reuses the most recently freed index if one exists (keeping the
    /// generation bumped at destruction), otherwise appends a new index at
    /// generation 0.
    ///
    /// # Returns
    ///
    /// The new entity, or [`Entity::NULL`] if the 16-bit index space is full.
    pub fn create_entity(&mut self) -> Entity {
        let index = if let Some(index) = self.free_indices.pop() {
            index
        } else {
            let index = match u16::try_from(self.slots.len()) {
                Ok(index) if index != Entity::SENTINEL => index,
                _ => {
                    tracing::warn!(slots = self.slots.len(), "entity index space exhausted");
                    return Entity::NULL;
                }
            };
            self.slots.push(EntitySlot::default());
            index
        };

        let slot = &mut self.slots[usize::from(index)];
        slot.alive = true;
        self.alive_count += 1;

        Entity::new(index, slot.generation)
    }

    /// Destroys an entity, stripping it from every pool.
    ///
    /// The index's generation is bumped so every handle to the old entity
    /// stays invalid after the index is reused. No-op on dead entities.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }

        for pool in self.pools.iter_mut().flatten() {
            pool.remove_entity(entity);
        }

        let slot = &mut self.slots[usize::from(entity.index())];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.alive_count -= 1;
        self.free_indices.push(entity.index());
    }

    /// Checks if an entity is alive.
    ///
    /// False for the null entity, for indices never allocated, and for
    /// handles whose generation differs from the slot's.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        self.slots
            .get(usize::from(entity.index()))
            .is_some_and(|slot| slot.alive && slot.generation == entity.generation())
    }

    /// Entity slots ever allocated (alive or free).
    #[inline]
    #[must_use]
    pub fn entity_slots(&self) -> usize {
        self.slots.len()
    }

    /// Entities currently alive.
    #[inline]
    #[must_use]
    pub const fn active_entities(&self) -> usize {
        self.alive_count
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Returns the pool for `T`, if any `T` was ever added.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.pools
            .get(TypeKey::of::<T>().index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    /// Returns the pool for `T` mutably, if it exists.
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(TypeKey::of::<T>().index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }

    /// Returns the pool for `T`, creating it on first use.
    fn pool_or_insert<T: Component>(&mut self) -> &mut ComponentPool<T> {
        let index = TypeKey::of::<T>().index();
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }

        let initial_sparse = self.config.initial_sparse_capacity;
        self.pools[index]
            .get_or_insert_with(|| {
                tracing::trace!(component = std::any::type_name::<T>(), "component pool created");
                Box::new(ComponentPool::<T>::new(initial_sparse)) as Box<dyn ErasedPool>
            })
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .unwrap_or_else(|| unreachable!("pool slot holds a pool of another type"))
    }

    /// Attaches `value` to `entity`, overwriting any existing `T`.
    ///
    /// # Returns
    ///
    /// The stored component, or `None` if `entity` is not alive (nothing is
    /// stored in that case).
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Option<&mut T> {
        if !self.is_alive(entity) {
            tracing::debug!(
                index = entity.index(),
                generation = entity.generation(),
                component = std::any::type_name::<T>(),
                "add on dead entity ignored"
            );
            return None;
        }
        Some(self.pool_or_insert::<T>().add(entity, value))
    }

    /// Gets `entity`'s `T`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.pool::<T>()?.get(entity)
    }

    /// Gets `entity`'s `T` mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.pool_mut::<T>()?.get_mut(entity)
    }

    /// Detaches and returns `entity`'s `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.pool_mut::<T>()?.remove(entity)
    }

    /// Whether `entity` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.pool::<T>().is_some_and(|pool| pool.has(entity))
    }

    /// Number of live `T` components.
    #[must_use]
    pub fn component_count<T: Component>(&self) -> usize {
        self.pool::<T>().map_or(0, ComponentPool::len)
    }

    /// Calls `f` for every `T` in the world, in dense order.
    pub fn each_mut<T: Component>(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        if let Some(pool) = self.pool_mut::<T>() {
            for (entity, value) in pool.iter_mut() {
                f(entity, value);
            }
        }
    }

    /// Creates a view over every entity holding all of `Q`'s components.
    ///
    /// The view borrows the world, so no entity or component can be added or
    /// removed while it is alive. Collect [`View::entities`] first to mutate.
    #[must_use]
    pub fn query<Q: Query>(&self) -> View<'_, Q> {
        View::new(self)
    }

    // =========================================================================
    // Globals
    // =========================================================================

    /// Stores the world's single `T`, replacing any previous one.
    pub fn set_global<T: 'static>(&mut self, value: T) {
        self.globals.insert(TypeKey::of::<T>(), Box::new(value));
    }

    /// Gets the world's `T`.
    #[must_use]
    pub fn get_global<T: 'static>(&self) -> Option<&T> {
        self.globals.get(&TypeKey::of::<T>())?.downcast_ref::<T>()
    }

    /// Gets the world's `T` mutably.
    pub fn get_global_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.globals.get_mut(&TypeKey::of::<T>())?.downcast_mut::<T>()
    }

    /// Removes and returns the world's `T`.
    pub fn remove_global<T: 'static>(&mut self) -> Option<T> {
        let boxed = self.globals.remove(&TypeKey::of::<T>())?;
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Whether a `T` global is set.
    #[must_use]
    pub fn has_global<T: 'static>(&self) -> bool {
        self.globals.contains_key(&TypeKey::of::<T>())
    }

    // =========================================================================
    // Bulk operations and diagnostics
    // =========================================================================

    /// Clears every pool and every global and kills every entity.
    ///
    /// Entity slots are kept and their generations bumped, so handles issued
    /// before the reset never match entities created after it.
    pub fn reset(&mut self) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clear();
        }
        self.globals.clear();

        self.free_indices.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.alive {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
            }
            // slots.len() never exceeds the 16-bit index space
            self.free_indices.push(index as u16);
        }
        self.alive_count = 0;

        tracing::debug!(slots = self.slots.len(), "world reset");
    }

    /// Snapshot of entity and pool counts.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entity_slots: self.slots.len(),
            active_entities: self.alive_count,
            globals: self.globals.len(),
            pools: self
                .pools
                .iter()
                .flatten()
                .map(|pool| PoolStats {
                    type_name: pool.type_name(),
                    len: pool.len(),
                })
                .collect(),
        }
    }

    /// Logs [`World::stats`] at info level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        tracing::info!(
            entity_slots = stats.entity_slots,
            active_entities = stats.active_entities,
            globals = stats.globals,
            pools = stats.pools.len(),
            "world health"
        );
        for pool in &stats.pools {
            tracing::info!(component = pool.type_name, live = pool.len, "pool");
        }
    }
}
