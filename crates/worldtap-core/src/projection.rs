//! Snapshot projectors: engine state to wire documents.
//!
//! One function per endpoint. Each reads only what its document needs and
//! returns an owned value, so nothing borrowed from the engine escapes the
//! engine thread. Projectors must run inside a single
//! [`EngineBridge`](crate::bridge::EngineBridge) call; that is what makes
//! every field of one document come from the same engine instant.
//!
//! | Projector | Document |
//! |-----------|----------|
//! | [`project_player`] | [`PlayerDocument`] |
//! | [`project_npcs`] | `Vec<NpcEntry>` |
//! | [`project_objects`] | `Vec<ObjectEntry>` |
//! | [`project_ground_items`] | `Vec<GroundItemEntry>` |
//! | [`project_items`] | `Option<Vec<ItemSlot>>` (`None` = no content) |
//! | [`project_stats`] | `Vec<SkillEntry>` |
//! | [`project_projectiles`] | `Vec<ProjectileEntry>` |
//! | [`project_tick`] | [`TickDocument`] |

use worldtap_types::{
    GroundItemEntry, InventoryKind, ItemSlot, MousePosition, NpcEntry, ObjectEntry,
    PlayerDocument, PlayerState, ProjectileEntry, Skill, SkillEntry, TickDocument,
};

use crate::accessor::{AccessError, EngineAccessor};
use crate::tick::TickCounter;

/// Failure while building a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// An accessor call reported inconsistent engine state.
    #[error("engine access failed: {source}")]
    Access {
        /// The accessor failure.
        #[from]
        source: AccessError,
    },
}

/// `/player`: the local actor, or an empty document when logged out.
pub fn project_player(world: &dyn EngineAccessor) -> Result<PlayerDocument, ProjectionError> {
    let Some(player) = world.local_player() else {
        return Ok(PlayerDocument::Absent {});
    };

    let mouse = world
        .mouse_canvas_position()
        .map(|p| MousePosition { x: p.x, y: p.y });

    Ok(PlayerDocument::Present(PlayerState {
        name: player.name.clone(),
        x: player.location.x,
        y: player.location.y,
        plane: player.location.plane,
        animation: player.animation,
        health: world.boosted_skill_level(Skill::Hitpoints),
        run_energy: world.run_energy(),
        mouse,
    }))
}

/// `/npcs`: every NPC that has a name.
pub fn project_npcs(world: &dyn EngineAccessor) -> Result<Vec<NpcEntry>, ProjectionError> {
    Ok(world
        .npcs()
        .iter()
        .filter_map(|npc| {
            let name = npc.name.as_deref().filter(|n| !n.is_empty())?;
            Some(NpcEntry {
                id: npc.id,
                name: name.to_owned(),
                x: npc.location.x,
                y: npc.location.y,
                plane: npc.location.plane,
                health_ratio: npc.health_ratio,
                animation: npc.animation,
            })
        })
        .collect())
}

/// `/objects`: every game object on every loaded tile.
pub fn project_objects(world: &dyn EngineAccessor) -> Result<Vec<ObjectEntry>, ProjectionError> {
    let scene = world.scene()?;
    Ok(scene
        .tiles()
        .flat_map(|tile| tile.game_objects.iter().flatten())
        .map(|obj| ObjectEntry {
            id: obj.id,
            x: obj.location.x,
            y: obj.location.y,
            plane: obj.location.plane,
        })
        .collect())
}

/// `/grounditems`: every item stack, positioned at its tile.
pub fn project_ground_items(
    world: &dyn EngineAccessor,
) -> Result<Vec<GroundItemEntry>, ProjectionError> {
    let scene = world.scene()?;
    let mut entries = Vec::new();
    for tile in scene.tiles() {
        let Some(items) = &tile.ground_items else {
            continue;
        };
        entries.extend(items.iter().map(|item| GroundItemEntry {
            id: item.id,
            quantity: item.quantity,
            x: tile.location.x,
            y: tile.location.y,
        }));
    }
    Ok(entries)
}

/// `/inventory`, `/equipment`, `/bank`: every slot of the container.
///
/// Returns `Ok(None)` when the engine has never populated the container,
/// which is distinct from a container with no slots.
pub fn project_items(
    world: &dyn EngineAccessor,
    kind: InventoryKind,
) -> Result<Option<Vec<ItemSlot>>, ProjectionError> {
    Ok(world.item_container(kind).map(|container| {
        container
            .items
            .iter()
            .map(|item| ItemSlot {
                id: item.id,
                quantity: item.quantity,
            })
            .collect()
    }))
}

/// `/stats`: every trainable skill in engine order.
pub fn project_stats(world: &dyn EngineAccessor) -> Result<Vec<SkillEntry>, ProjectionError> {
    Ok(Skill::trainable()
        .map(|skill| SkillEntry {
            stat: skill.name().to_owned(),
            level: world.real_skill_level(skill),
            boosted_level: world.boosted_skill_level(skill),
            xp: world.skill_experience(skill),
        })
        .collect())
}

/// `/projectiles`: every projectile in flight.
pub fn project_projectiles(
    world: &dyn EngineAccessor,
) -> Result<Vec<ProjectileEntry>, ProjectionError> {
    Ok(world
        .projectiles()
        .iter()
        .map(|p| ProjectileEntry {
            id: p.id,
            remaining_cycles: p.remaining_cycles,
            start_x: p.x1,
            start_y: p.y1,
            current_x: p.x,
            current_y: p.y,
            z: p.z,
        })
        .collect())
}

/// `/tick`: the completed tick count.
pub fn project_tick(ticks: &TickCounter) -> TickDocument {
    TickDocument { tick: ticks.get() }
}
