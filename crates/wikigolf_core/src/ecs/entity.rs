//! # Entity Management
//!
//! Entities are bare 32-bit handles consisting of:
//! - An index into the store's slot table (low 16 bits)
//! - A generation counter for safe reuse (high 16 bits)

use bytemuck::{Pod, Zeroable};

/// Lightweight identifier for an entity. Owns no data.
///
/// The packed value is split into two parts:
/// - Lower 16 bits: slot index
/// - Upper 16 bits: generation counter for detecting stale references
///
/// An index of [`Entity::SENTINEL`] marks "no entity".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Index value reserved for "no entity".
    pub const SENTINEL: u16 = u16::MAX;

    /// Null/invalid entity.
    pub const NULL: Self = Self::new(Self::SENTINEL, 0);

    /// Creates an entity from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u16, generation: u16) -> Self {
        Self(((generation as u32) << 16) | index as u32)
    }

    /// Reconstructs an entity from its packed representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the packed representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Returns the index portion of the entity.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Returns the generation portion of the entity.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Checks if this entity is the null entity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index() == Self::SENTINEL
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

/// Per-index bookkeeping kept by the world.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EntitySlot {
    /// Generation of the current (or next) occupant.
    pub(crate) generation: u16,
    /// Whether an entity currently occupies this slot.
    pub(crate) alive: bool,
}
