//! # Entity Component System
//!
//! A sparse-set ECS with generational entity handles.
//!
//! ## Design Philosophy
//!
//! - One sparse-set pool per component type, created on first use
//! - Entity handles are 32-bit index/generation pairs
//! - A destroyed entity's generation is bumped, so stale handles never alias
//! - Globals are per-world singletons keyed by the same type registry

mod component;
mod entity;
mod query;
mod storage;
mod world;

pub use component::{Component, TypeKey};
pub use entity::Entity;
pub use query::{Query, View, ViewIter};
pub use storage::{ComponentPool, ErasedPool};
pub use world::{PoolStats, StoreStats, World};
