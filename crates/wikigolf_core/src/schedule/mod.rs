//! # Scheduling
//!
//! Declarative, phase-ordered registration of per-frame systems.

mod pipeline;

pub use pipeline::{Access, Phase, Pipeline, System};
