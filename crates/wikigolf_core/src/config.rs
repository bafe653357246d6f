//! # Store Configuration
//!
//! Sizing and access-policy knobs for the store and the resource slot-maps.
//! Loaded once at startup from TOML; every field has a default.
//!
//! ```toml
//! initial_sparse_capacity = 128
//! entity_capacity_hint = 4096
//! slot_chunk_size = 32
//! access_policy = "lenient"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// What a slot-map does when asked for a value through an invalid handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPolicy {
    /// Treat the access as a logic error and panic.
    Strict,
    /// Log once and hand back the slot-map's fallback value.
    Lenient,
}

impl AccessPolicy {
    /// Strict in builds with debug assertions, lenient otherwise.
    #[must_use]
    pub const fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::for_build()
    }
}

/// Configuration shared by [`World`](crate::World) and
/// [`SlotMap`](crate::SlotMap).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Starting length of each component pool's sparse array.
    pub initial_sparse_capacity: usize,
    /// Number of entity slots reserved up front.
    pub entity_capacity_hint: usize,
    /// Slots per address-stable chunk in a slot-map.
    pub slot_chunk_size: usize,
    /// Invalid-handle policy for slot-maps.
    pub access_policy: AccessPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_sparse_capacity: 64,
            entity_capacity_hint: 1024,
            slot_chunk_size: 64,
            access_policy: AccessPolicy::for_build(),
        }
    }
}

impl StoreConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] on malformed TOML, unknown keys or
    /// zero-sized capacities.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigIo`] if the file cannot be read, otherwise
    /// the same errors as [`StoreConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the store cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.initial_sparse_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "initial_sparse_capacity must be greater than zero".into(),
            ));
        }
        if self.slot_chunk_size == 0 {
            return Err(CoreError::InvalidConfig(
                "slot_chunk_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
