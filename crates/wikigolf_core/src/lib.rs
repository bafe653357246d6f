//! # WikiGolf Core Storage
//!
//! Generational, handle-addressed storage that every other WikiGolf subsystem
//! is built on:
//! - A sparse-set Entity Component System with entity recycling
//! - Type-erased global singletons owned by each [`World`]
//! - Address-stable slot-maps for meshes, shaders and audio clips
//! - A phase-ordered system [`Pipeline`]
//!
//! ## Architecture Rules
//!
//! 1. **Handles are values** - entities and resource handles never own data
//! 2. **Generations guard every lookup** - a recycled slot never answers for a stale handle
//! 3. **Single-threaded by contract** - one frame update owns the store at a time
//!
//! ## Example
//!
//! ```rust
//! use wikigolf_core::{Component, World};
//!
//! #[derive(Debug, PartialEq)]
//! struct Ball { speed: f32 }
//! impl Component for Ball {}
//!
//! let mut world = World::new();
//! let ball = world.create_entity();
//! world.add(ball, Ball { speed: 2.0 });
//! assert_eq!(world.get::<Ball>(ball), Some(&Ball { speed: 2.0 }));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;
pub mod schedule;

pub use config::{AccessPolicy, StoreConfig};
pub use ecs::{
    Component, ComponentPool, Entity, ErasedPool, PoolStats, Query, StoreStats, TypeKey, View,
    ViewIter, World,
};
pub use error::{CoreError, CoreResult};
pub use memory::{Handle, ResourceCache, SlotMap};
pub use schedule::{Access, Phase, Pipeline, System};
