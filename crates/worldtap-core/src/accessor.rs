//! The engine's read surface.
//!
//! [`EngineAccessor`] is everything a projector may look at. Every method
//! takes `&self`, so a projector holding only an accessor cannot mutate
//! world state. Implementations are owned by the engine thread and must
//! only be called there; the [`bridge`](crate::bridge) is how other
//! threads get a call scheduled.
//!
//! [`Simulation`] extends the accessor with the single write the engine
//! loop needs: advancing one tick.

use worldtap_types::{InventoryKind, Skill};

use crate::scene::{CanvasPoint, ItemContainer, Npc, Player, Projectile, Scene};

/// Errors raised by accessor calls that can observe inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The scene is being rebuilt (region load in progress).
    #[error("scene is not loaded")]
    SceneUnavailable,

    /// Any other engine-reported inconsistency.
    #[error("engine state inconsistent: {reason}")]
    Inconsistent {
        /// What the engine reported.
        reason: String,
    },
}

/// Errors raised while advancing the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The world could not be stepped forward.
    #[error("simulation step failed: {reason}")]
    Step {
        /// Description of the failure.
        reason: String,
    },
}

/// Read-only view of current world state.
pub trait EngineAccessor {
    /// The local player, absent while logged out.
    fn local_player(&self) -> Option<&Player>;

    /// Run energy, 0-10000.
    fn run_energy(&self) -> i32;

    /// Pointer position on the canvas, absent when outside it.
    fn mouse_canvas_position(&self) -> Option<CanvasPoint>;

    /// Unboosted level of a skill.
    fn real_skill_level(&self, skill: Skill) -> i32;

    /// Current level of a skill including boosts and drains.
    fn boosted_skill_level(&self, skill: Skill) -> i32;

    /// Experience in a skill.
    fn skill_experience(&self, skill: Skill) -> i32;

    /// NPCs currently loaded around the player.
    fn npcs(&self) -> &[Npc];

    /// The loaded region.
    fn scene(&self) -> Result<&Scene, AccessError>;

    /// An item container, `None` if the engine has never populated it.
    fn item_container(&self, kind: InventoryKind) -> Option<&ItemContainer>;

    /// Projectiles currently in flight.
    fn projectiles(&self) -> &[Projectile];
}

/// A world the engine thread can own and step.
pub trait Simulation: EngineAccessor + Send {
    /// Advance the world by exactly one tick.
    fn advance(&mut self) -> Result<(), SimulationError>;

    /// This world as a read-only accessor.
    fn accessor(&self) -> &dyn EngineAccessor;
}
