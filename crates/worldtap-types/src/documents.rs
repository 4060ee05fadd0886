//! Wire documents returned by the state API.
//!
//! Each endpoint serializes one of these types. Field names are the
//! camelCase keys clients read; fields serialize in declaration order, so
//! the same engine state always yields byte-identical JSON.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// GET /player
// ---------------------------------------------------------------------------

/// Canvas coordinates of the pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MousePosition {
    /// Horizontal canvas pixel.
    pub x: i32,
    /// Vertical canvas pixel.
    pub y: i32,
}

/// The local actor as seen at one engine instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlayerState {
    /// Display name. Omitted while the engine has not assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    /// World x coordinate.
    pub x: i32,
    /// World y coordinate.
    pub y: i32,
    /// Vertical plane (0-3).
    pub plane: i32,
    /// Current animation id, -1 when idle.
    pub animation: i32,
    /// Current (boosted) hitpoints level.
    pub health: i32,
    /// Run energy, 0-10000.
    pub run_energy: i32,
    /// Pointer position. Omitted when the pointer is outside the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub mouse: Option<MousePosition>,
}

/// Body of `GET /player`.
///
/// Serializes as an empty object when no local actor exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerDocument {
    /// A local actor is logged in.
    Present(PlayerState),
    /// No local actor this tick.
    Absent {},
}

impl PlayerDocument {
    /// The actor fields, if present.
    pub const fn state(&self) -> Option<&PlayerState> {
        match self {
            Self::Present(state) => Some(state),
            Self::Absent {} => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /npcs, /objects, /grounditems
// ---------------------------------------------------------------------------

/// One named NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NpcEntry {
    /// NPC definition id.
    pub id: i32,
    /// Display name, never empty.
    pub name: String,
    /// World x coordinate.
    pub x: i32,
    /// World y coordinate.
    pub y: i32,
    /// Vertical plane.
    pub plane: i32,
    /// Health bar ratio, -1 when no health bar is shown.
    pub health_ratio: i32,
    /// Current animation id.
    pub animation: i32,
}

/// One static or dynamic scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectEntry {
    /// Object definition id.
    pub id: i32,
    /// World x coordinate of the object.
    pub x: i32,
    /// World y coordinate of the object.
    pub y: i32,
    /// Vertical plane of the object.
    pub plane: i32,
}

/// One item stack lying on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GroundItemEntry {
    /// Item id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
    /// World x coordinate of the tile.
    pub x: i32,
    /// World y coordinate of the tile.
    pub y: i32,
}

// ---------------------------------------------------------------------------
// GET /inventory, /equipment, /bank
// ---------------------------------------------------------------------------

/// One container slot. Empty slots carry id -1 and quantity 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemSlot {
    /// Item id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
}

// ---------------------------------------------------------------------------
// GET /stats
// ---------------------------------------------------------------------------

/// Levels and experience for one trainable skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SkillEntry {
    /// Skill display name.
    pub stat: String,
    /// Real (unboosted) level.
    pub level: i32,
    /// Current level including temporary boosts and drains.
    pub boosted_level: i32,
    /// Experience points.
    pub xp: i32,
}

// ---------------------------------------------------------------------------
// GET /projectiles
// ---------------------------------------------------------------------------

/// One in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ProjectileEntry {
    /// Spot animation id.
    pub id: i32,
    /// Client cycles until impact.
    pub remaining_cycles: i32,
    /// Local x where the projectile was launched.
    pub start_x: i32,
    /// Local y where the projectile was launched.
    pub start_y: i32,
    /// Current local x.
    pub current_x: f64,
    /// Current local y.
    pub current_y: f64,
    /// Current height.
    pub z: f64,
}

// ---------------------------------------------------------------------------
// GET /tick
// ---------------------------------------------------------------------------

/// Body of `GET /tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickDocument {
    /// Ticks elapsed since process start.
    #[ts(type = "number")]
    pub tick: u64,
}
