//! Axum router construction for the state API.
//!
//! Assembles the ten document routes into a single [`Router`] with CORS
//! middleware enabled so browser tools on other origins can poll it.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the state API.
///
/// The router includes:
/// - `GET /player` -- local player
/// - `GET /npcs` -- named NPCs
/// - `GET /objects` -- scene objects
/// - `GET /grounditems` -- ground items
/// - `GET /inventory`, `/equipment`, `/bank` -- item containers
/// - `GET /stats` -- skills
/// - `GET /projectiles` -- projectiles in flight
/// - `GET /tick` -- tick counter
///
/// Any other path is a 404 and any other method a 405; both come from
/// Axum and never reach the engine.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Actors
        .route("/player", get(handlers::get_player))
        .route("/npcs", get(handlers::get_npcs))
        // Scene
        .route("/objects", get(handlers::get_objects))
        .route("/grounditems", get(handlers::get_ground_items))
        .route("/projectiles", get(handlers::get_projectiles))
        // Item containers
        .route("/inventory", get(handlers::get_inventory))
        .route("/equipment", get(handlers::get_equipment))
        .route("/bank", get(handlers::get_bank))
        // Progress
        .route("/stats", get(handlers::get_stats))
        .route("/tick", get(handlers::get_tick))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
