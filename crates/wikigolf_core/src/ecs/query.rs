//! # Multi-Component Queries
//!
//! A [`View`] visits every entity that has *all* of the requested component
//! types. The smallest pool drives the iteration; the others are probed.
//!
//! ```text
//! query::<(Position, Velocity)>()
//!
//! Position pool: 10,000 entries
//! Velocity pool:     40 entries  <- driver
//!
//! 40 probes into Position instead of 10,000 into Velocity.
//! ```
//!
//! A view holds a shared borrow of the [`World`], so pools cannot be
//! restructured mid-iteration. To mutate the matched entities, snapshot them
//! with [`View::entities`] first and mutate after the view is dropped.

use std::slice;

use super::component::Component;
use super::entity::Entity;
use super::storage::ComponentPool;
use super::world::World;

/// A set of component types that can be queried together.
///
/// Implemented for tuples of one to six [`Component`] types.
pub trait Query {
    /// Borrowed pools, one per component type.
    type Pools<'w>: Copy;
    /// References to one entity's components.
    type Item<'w>;

    /// Looks up every pool. `None` if any type has never been added.
    fn fetch_pools(world: &World) -> Option<Self::Pools<'_>>;

    /// Owner list of the pool with the fewest live entries.
    fn driver<'w>(pools: Self::Pools<'w>) -> &'w [Entity];

    /// Fetches `entity`'s components, or `None` if any is missing.
    fn fetch<'w>(pools: Self::Pools<'w>, entity: Entity) -> Option<Self::Item<'w>>;
}

macro_rules! impl_query {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Query for ($($name,)+) {
            type Pools<'w> = ($(&'w ComponentPool<$name>,)+);
            type Item<'w> = ($(&'w $name,)+);

            fn fetch_pools(world: &World) -> Option<Self::Pools<'_>> {
                Some(($(world.pool::<$name>()?,)+))
            }

            #[allow(non_snake_case)]
            fn driver<'w>(pools: Self::Pools<'w>) -> &'w [Entity] {
                let ($($name,)+) = pools;
                [$(($name.len(), $name.entities())),+]
                    .into_iter()
                    .min_by_key(|(len, _)| *len)
                    .map_or(&[] as &[Entity], |(_, entities)| entities)
            }

            #[allow(non_snake_case)]
            fn fetch<'w>(pools: Self::Pools<'w>, entity: Entity) -> Option<Self::Item<'w>> {
                let ($($name,)+) = pools;
                Some(($($name.get(entity)?,)+))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);
impl_query!(A, B, C, D, E, F);

/// Transient view over the entities matching `Q`.
///
/// Stateless: cheap to recreate every frame.
pub struct View<'w, Q: Query> {
    pools: Option<Q::Pools<'w>>,
}

impl<'w, Q: Query> View<'w, Q> {
    pub(crate) fn new(world: &'w World) -> Self {
        Self {
            pools: Q::fetch_pools(world),
        }
    }

    /// Calls `visit` once per matching entity.
    pub fn for_each(&self, mut visit: impl FnMut(Entity, Q::Item<'w>)) {
        for (entity, item) in self.iter() {
            visit(entity, item);
        }
    }

    /// Iterates over matching entities and their components.
    #[must_use]
    pub fn iter(&self) -> ViewIter<'w, Q> {
        let driver = self.pools.map_or(&[] as &[Entity], Q::driver);
        ViewIter {
            pools: self.pools,
            driver: driver.iter(),
        }
    }

    /// Number of matching entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether no entity matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Snapshot of the matching entities, for mutation after the view is gone.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.iter().map(|(entity, _)| entity).collect()
    }
}

impl<'v, 'w, Q: Query> IntoIterator for &'v View<'w, Q> {
    type Item = (Entity, Q::Item<'w>);
    type IntoIter = ViewIter<'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`View::iter`].
pub struct ViewIter<'w, Q: Query> {
    pools: Option<Q::Pools<'w>>,
    driver: slice::Iter<'w, Entity>,
}

impl<'w, Q: Query> Iterator for ViewIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let pools = self.pools?;
        for &entity in self.driver.by_ref() {
            if let Some(item) = Q::fetch(pools, entity) {
                return Some((entity, item));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.driver.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position(i32);
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity(i32);
    impl Component for Velocity {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Frozen;
    impl Component for Frozen {}

    #[test]
    fn test_single_component_view() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        world.add(a, Position(1));
        world.add(b, Position(2));

        let mut seen = Vec::new();
        world.query::<(Position,)>().for_each(|e, (p,)| seen.push((e, p.0)));
        seen.sort();
        assert_eq!(seen, vec![(a, 1), (b, 2)]);
    }

    #[test]
    fn test_view_is_intersection() {
        let mut world = World::new();
        let mut expected = HashSet::new();
        for i in 0..20 {
            let e = world.create_entity();
            world.add(e, Position(i));
            if i % 3 == 0 {
                world.add(e, Velocity(i * 10));
                expected.insert(e);
            }
        }

        let mut visited = HashSet::new();
        for (e, (p, v)) in &world.query::<(Position, Velocity)>() {
            assert_eq!(v.0, p.0 * 10);
            assert!(visited.insert(e), "entity visited twice");
        }
        assert_eq!(visited, expected);

        // Order of the type parameters does not change the result.
        let flipped: HashSet<Entity> = world
            .query::<(Velocity, Position)>()
            .entities()
            .into_iter()
            .collect();
        assert_eq!(flipped, expected);
    }

    #[test]
    fn test_missing_pool_yields_nothing() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add(e, Position(0));

        let view = world.query::<(Position, Frozen)>();
        assert!(view.is_empty());
        assert_eq!(view.count(), 0);
    }

    #[test]
    fn test_snapshot_then_mutate() {
        let mut world = World::new();
        for i in 0..4 {
            let e = world.create_entity();
            world.add(e, Position(i));
            world.add(e, Velocity(1));
        }

        let movers = world.query::<(Position, Velocity)>().entities();
        for e in movers {
            if world.get::<Position>(e).is_some_and(|p| p.0 % 2 == 0) {
                world.remove::<Velocity>(e);
            }
        }
        assert_eq!(world.query::<(Position, Velocity)>().count(), 2);
    }

    #[test]
    fn test_three_way_view() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add(e, Position(1));
        world.add(e, Velocity(2));
        world.add(e, Frozen);
        let other = world.create_entity();
        world.add(other, Position(3));
        world.add(other, Frozen);

        let hits: Vec<_> = world
            .query::<(Position, Velocity, Frozen)>()
            .iter()
            .map(|(entity, (p, v, _))| (entity, p.0 + v.0))
            .collect();
        assert_eq!(hits, vec![(e, 3)]);
    }
}
