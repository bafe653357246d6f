//! # Resource Memory
//!
//! Generational slot-maps for resources referenced from outside the ECS.
//!
//! ## Design Philosophy
//!
//! - One slot-map per resource kind (meshes, shaders, audio clips)
//! - Slots never move, so references survive later insertions
//! - Removal releases the value immediately and bumps the slot generation

mod cache;
mod slot_map;

pub use cache::ResourceCache;
pub use slot_map::{Handle, SlotMap};
