//! Shared type definitions for the Worldtap state API.
//!
//! This crate holds the wire documents every endpoint returns and the
//! enumerations both sides of the engine boundary agree on. Document types
//! flow downstream to `TypeScript` via `ts-rs` for HTTP clients.
//!
//! # Modules
//!
//! - [`enums`] -- [`Skill`] and [`InventoryKind`]
//! - [`documents`] -- Serializer-ready response bodies, one per endpoint

pub mod documents;
pub mod enums;

// Re-export all public types at crate root for convenience.
pub use documents::{
    GroundItemEntry, ItemSlot, MousePosition, NpcEntry, ObjectEntry, PlayerDocument, PlayerState,
    ProjectileEntry, SkillEntry, TickDocument,
};
pub use enums::{InventoryKind, Skill};
