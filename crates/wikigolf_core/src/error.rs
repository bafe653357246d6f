//! # Core Error Types
//!
//! Errors that can cross the storage boundary.
//!
//! Component lookups never produce these: absence is an `Option`. Only the
//! resource slot-map's fallible accessors and config loading return them.

use thiserror::Error;

/// Errors that can occur in the storage core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Handle index is the sentinel or past the end of the slot array.
    #[error("invalid handle: index {index} is out of range")]
    InvalidHandle {
        /// The offending slot index.
        index: u32,
    },

    /// Handle generation does not match the slot's current generation.
    #[error("stale handle: index {index} generation {generation}, slot is at generation {current}")]
    StaleHandle {
        /// The slot index.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
        /// Generation currently recorded at the slot.
        current: u32,
    },

    /// The slot exists but holds no live value.
    #[error("dead slot: index {index} has been removed")]
    DeadSlot {
        /// The slot index.
        index: u32,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(String),
}

/// Result type for storage core operations.
pub type CoreResult<T> = Result<T, CoreError>;
