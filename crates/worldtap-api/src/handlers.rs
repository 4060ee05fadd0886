//! REST endpoint handlers for the state API.
//!
//! Every handler submits exactly one projector through
//! [`AppState::query`] and serializes whatever it returns. Nothing is
//! cached between requests.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/player` | Local player, `{}` while logged out |
//! | `GET` | `/npcs` | Named NPCs in the scene |
//! | `GET` | `/objects` | Game objects on every loaded tile |
//! | `GET` | `/grounditems` | Items lying on loaded tiles |
//! | `GET` | `/inventory` | Inventory slots, 204 if never populated |
//! | `GET` | `/equipment` | Worn-item slots, 204 if never populated |
//! | `GET` | `/bank` | Bank slots, 204 until the bank is opened |
//! | `GET` | `/stats` | Level, boosted level, and xp per skill |
//! | `GET` | `/projectiles` | Projectiles in flight |
//! | `GET` | `/tick` | Ticks completed since start |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use worldtap_core::projection;
use worldtap_types::{
    GroundItemEntry, InventoryKind, NpcEntry, ObjectEntry, PlayerDocument, ProjectileEntry,
    SkillEntry, TickDocument,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// Local player position, vitals, and pointer.
pub async fn get_player(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayerDocument>, ApiError> {
    let doc = state
        .query("/player", |ctx| projection::project_player(ctx.world()))
        .await?;
    Ok(Json(doc))
}

/// NPCs that carry a display name.
pub async fn get_npcs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NpcEntry>>, ApiError> {
    let npcs = state
        .query("/npcs", |ctx| projection::project_npcs(ctx.world()))
        .await?;
    Ok(Json(npcs))
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Game objects across all planes of the loaded region.
pub async fn get_objects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ObjectEntry>>, ApiError> {
    let objects = state
        .query("/objects", |ctx| projection::project_objects(ctx.world()))
        .await?;
    Ok(Json(objects))
}

/// Ground items across all planes of the loaded region.
pub async fn get_ground_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GroundItemEntry>>, ApiError> {
    let items = state
        .query("/grounditems", |ctx| {
            projection::project_ground_items(ctx.world())
        })
        .await?;
    Ok(Json(items))
}

/// Projectiles currently in flight.
pub async fn get_projectiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectileEntry>>, ApiError> {
    let projectiles = state
        .query("/projectiles", |ctx| {
            projection::project_projectiles(ctx.world())
        })
        .await?;
    Ok(Json(projectiles))
}

// ---------------------------------------------------------------------------
// Item containers
// ---------------------------------------------------------------------------

/// Inventory slots.
pub async fn get_inventory(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    container(&state, InventoryKind::Inventory).await
}

/// Equipment slots.
pub async fn get_equipment(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    container(&state, InventoryKind::Equipment).await
}

/// Bank slots.
pub async fn get_bank(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    container(&state, InventoryKind::Bank).await
}

/// Slots of one container, or 204 with an empty body if the engine has
/// never populated it. An empty container is still `200 []`.
async fn container(state: &AppState, kind: InventoryKind) -> Result<Response, ApiError> {
    let slots = state
        .query(kind.path(), move |ctx| {
            projection::project_items(ctx.world(), kind)
        })
        .await?;
    Ok(match slots {
        Some(slots) => Json(slots).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Every trainable skill, in engine order.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SkillEntry>>, ApiError> {
    let stats = state
        .query("/stats", |ctx| projection::project_stats(ctx.world()))
        .await?;
    Ok(Json(stats))
}

/// Ticks completed since the process started.
pub async fn get_tick(State(state): State<Arc<AppState>>) -> Result<Json<TickDocument>, ApiError> {
    let tick = state
        .query("/tick", |ctx| Ok(projection::project_tick(ctx.ticks())))
        .await?;
    Ok(Json(tick))
}
