//! Integration tests for the state API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Each test runs a real engine thread, so every
//! request goes through the bridge exactly as in production.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use worldtap_api::router::build_router;
use worldtap_api::state::AppState;
use worldtap_core::accessor::{AccessError, EngineAccessor, Simulation, SimulationError};
use worldtap_core::bridge::{self, EngineBridge};
use worldtap_core::runner::{EngineHandle, EngineSettings, NoOpCallback, spawn_engine};
use worldtap_core::scene::{
    CanvasPoint, GameObject, Item, ItemContainer, Npc, Player, Projectile, Scene, Tile, TileItem,
    WorldPoint,
};
use worldtap_core::world::SceneWorld;
use worldtap_types::{InventoryKind, Skill};

const STILL: EngineSettings = EngineSettings {
    tick_interval: Duration::from_secs(3600),
};
const FAST: EngineSettings = EngineSettings {
    tick_interval: Duration::from_millis(2),
};

// =========================================================================
// Harness
// =========================================================================

struct Harness {
    router: Router,
    engine: EngineHandle,
}

impl Harness {
    fn start(world: Box<dyn Simulation>, settings: EngineSettings) -> Self {
        let engine = spawn_engine(world, settings, Box::new(NoOpCallback)).unwrap();
        let state = Arc::new(AppState::new(
            engine.bridge().clone(),
            Some(Duration::from_secs(5)),
        ));
        Self {
            router: build_router(state),
            engine,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    async fn get_json(&self, path: &str) -> Value {
        let (status, bytes) = self.get(path).await;
        assert_eq!(status, StatusCode::OK, "GET {path}");
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn stop(self) {
        let engine = self.engine;
        tokio::task::spawn_blocking(move || engine.shutdown())
            .await
            .unwrap()
            .unwrap();
    }
}

/// A logged-in world with one of everything.
fn populated_world() -> SceneWorld {
    let mut world = SceneWorld::empty();
    world.player = Some(Player {
        name: Some(String::from("X")),
        location: WorldPoint::new(100, 200, 0),
        animation: -1,
    });
    world.set_skill(Skill::Hitpoints, 60, 50, 273_742);
    world.set_skill(Skill::Attack, 40, 42, 37_224);
    world.npcs = vec![
        Npc {
            id: 3106,
            name: Some(String::from("Man")),
            location: WorldPoint::new(101, 200, 0),
            health_ratio: -1,
            animation: 808,
        },
        Npc {
            id: 7,
            name: None,
            location: WorldPoint::new(102, 200, 0),
            health_ratio: -1,
            animation: -1,
        },
    ];

    let scene = world.scene_mut().unwrap();
    *scene.cell_mut(0, 2, 3).unwrap() = Some(Tile {
        location: WorldPoint::new(102, 203, 0),
        game_objects: vec![
            None,
            Some(GameObject {
                id: 1276,
                location: WorldPoint::new(101, 202, 0),
            }),
        ],
        ground_items: Some(vec![TileItem {
            id: 995,
            quantity: 250,
        }]),
    });

    world.set_container(
        InventoryKind::Inventory,
        ItemContainer {
            items: vec![
                Item {
                    id: 1351,
                    quantity: 1,
                },
                Item::EMPTY,
            ],
        },
    );
    world.projectiles.push(Projectile {
        id: 27,
        remaining_cycles: 40,
        x1: 6400,
        y1: 6400,
        x: 6464.5,
        y: 6400.0,
        z: -300.0,
        velocity_x: 1.0,
        velocity_y: 0.0,
    });
    world
}

// =========================================================================
// Endpoints
// =========================================================================

#[tokio::test]
async fn test_player_document() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let (status, body) = harness.get("/player").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        r#"{"name":"X","x":100,"y":200,"plane":0,"animation":-1,"health":50,"runEnergy":10000}"#
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_player_includes_mouse_when_on_canvas() {
    let mut world = populated_world();
    world.mouse = Some(CanvasPoint { x: 412, y: 230 });
    let harness = Harness::start(Box::new(world), STILL);

    let json = harness.get_json("/player").await;
    assert_eq!(json["mouse"]["x"], 412);
    assert_eq!(json["mouse"]["y"], 230);

    harness.stop().await;
}

#[tokio::test]
async fn test_player_logged_out_is_empty_object() {
    let harness = Harness::start(Box::new(SceneWorld::empty()), STILL);

    let (status, body) = harness.get("/player").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"{}");

    harness.stop().await;
}

#[tokio::test]
async fn test_npcs_skip_unnamed() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/npcs").await;
    let npcs = json.as_array().unwrap();
    assert_eq!(npcs.len(), 1);
    assert_eq!(npcs[0]["id"], 3106);
    assert_eq!(npcs[0]["name"], "Man");
    assert_eq!(npcs[0]["healthRatio"], -1);
    assert_eq!(npcs[0]["animation"], 808);

    harness.stop().await;
}

#[tokio::test]
async fn test_objects_use_object_location() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/objects").await;
    assert_eq!(
        json,
        serde_json::json!([{ "id": 1276, "x": 101, "y": 202, "plane": 0 }])
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_ground_items_use_tile_location() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/grounditems").await;
    assert_eq!(
        json,
        serde_json::json!([{ "id": 995, "quantity": 250, "x": 102, "y": 203 }])
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_no_ground_items_is_empty_array() {
    let harness = Harness::start(Box::new(SceneWorld::empty()), STILL);

    let (status, body) = harness.get("/grounditems").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");

    harness.stop().await;
}

#[tokio::test]
async fn test_inventory_lists_every_slot() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/inventory").await;
    assert_eq!(
        json,
        serde_json::json!([
            { "id": 1351, "quantity": 1 },
            { "id": -1, "quantity": 0 }
        ])
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_unpopulated_containers_are_no_content() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    for path in ["/bank", "/equipment"] {
        let (status, body) = harness.get(path).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "GET {path}");
        assert!(body.is_empty(), "GET {path}");
    }

    harness.stop().await;
}

#[tokio::test]
async fn test_populated_equipment_lists_worn_items() {
    let mut world = populated_world();
    world.set_container(
        InventoryKind::Equipment,
        ItemContainer {
            items: vec![
                Item {
                    id: 1155,
                    quantity: 1,
                },
                Item::EMPTY,
                Item {
                    id: 882,
                    quantity: 150,
                },
            ],
        },
    );
    let harness = Harness::start(Box::new(world), STILL);

    let json = harness.get_json("/equipment").await;
    assert_eq!(
        json,
        serde_json::json!([
            { "id": 1155, "quantity": 1 },
            { "id": -1, "quantity": 0 },
            { "id": 882, "quantity": 150 }
        ])
    );
    // Each kind reads its own container.
    let json = harness.get_json("/inventory").await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    harness.stop().await;
}

#[tokio::test]
async fn test_empty_container_is_not_no_content() {
    let mut world = SceneWorld::empty();
    world.set_container(InventoryKind::Bank, ItemContainer::default());
    let harness = Harness::start(Box::new(world), STILL);

    let (status, body) = harness.get("/bank").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");

    harness.stop().await;
}

#[tokio::test]
async fn test_stats_exclude_overall() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/stats").await;
    let stats = json.as_array().unwrap();
    assert_eq!(stats.len(), 23);
    assert!(stats.iter().all(|s| s["stat"] != "Overall"));
    assert_eq!(
        stats[0],
        serde_json::json!({ "stat": "Attack", "level": 40, "boostedLevel": 42, "xp": 37224 })
    );
    let hitpoints = stats.iter().find(|s| s["stat"] == "Hitpoints").unwrap();
    assert_eq!(hitpoints["boostedLevel"], 50);

    harness.stop().await;
}

#[tokio::test]
async fn test_projectiles_document() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    let json = harness.get_json("/projectiles").await;
    assert_eq!(
        json,
        serde_json::json!([{
            "id": 27,
            "remainingCycles": 40,
            "startX": 6400,
            "startY": 6400,
            "currentX": 6464.5,
            "currentY": 6400.0,
            "z": -300.0
        }])
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_every_endpoint_is_idempotent() {
    let harness = Harness::start(Box::new(populated_world()), STILL);

    for path in [
        "/player",
        "/npcs",
        "/objects",
        "/grounditems",
        "/inventory",
        "/equipment",
        "/bank",
        "/stats",
        "/projectiles",
        "/tick",
    ] {
        let first = harness.get(path).await;
        let second = harness.get(path).await;
        assert_eq!(first, second, "GET {path}");
    }

    harness.stop().await;
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let harness = Harness::start(Box::new(SceneWorld::empty()), STILL);

    let (status, _) = harness.get("/teleport").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    harness.stop().await;
}

// =========================================================================
// Tick counter
// =========================================================================

#[tokio::test]
async fn test_tick_starts_at_zero() {
    let harness = Harness::start(Box::new(SceneWorld::empty()), STILL);

    let json = harness.get_json("/tick").await;
    assert_eq!(json, serde_json::json!({ "tick": 0 }));

    harness.stop().await;
}

#[tokio::test]
async fn test_tick_is_monotonic() {
    let harness = Harness::start(Box::new(SceneWorld::empty()), FAST);

    let mut last = 0;
    for _ in 0..20 {
        let json = harness.get_json("/tick").await;
        let tick = json["tick"].as_u64().unwrap();
        assert!(tick >= last, "tick went from {last} to {tick}");
        last = tick;
        tokio::time::sleep(Duration::from_millis(3)).await;
    }
    assert!(last > 0);

    let counter = harness.engine.ticks();
    let json = harness.get_json("/tick").await;
    assert!(json["tick"].as_u64().unwrap() <= counter.get());

    harness.stop().await;
}

// =========================================================================
// Consistency under concurrency
// =========================================================================

/// A world where every observable field carries the current tick number.
///
/// `advance` rewrites the fields one at a time; a document mixing two
/// markers would mean a query observed a half-applied tick.
struct MarkerWorld {
    marker: i32,
    player: Player,
    energy: i32,
    hitpoints: i32,
    npcs: Vec<Npc>,
    scene: Scene,
    panic_on_npcs: Arc<AtomicBool>,
}

impl MarkerWorld {
    fn new() -> Self {
        Self {
            marker: 0,
            player: Player {
                name: Some(String::from("marker")),
                location: WorldPoint::new(0, 0, 0),
                animation: 0,
            },
            energy: 0,
            hitpoints: 0,
            npcs: Vec::new(),
            scene: Scene::empty(1, 1, 1),
            panic_on_npcs: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl EngineAccessor for MarkerWorld {
    fn local_player(&self) -> Option<&Player> {
        Some(&self.player)
    }
    fn run_energy(&self) -> i32 {
        self.energy
    }
    fn mouse_canvas_position(&self) -> Option<CanvasPoint> {
        None
    }
    fn real_skill_level(&self, _skill: Skill) -> i32 {
        self.hitpoints
    }
    fn boosted_skill_level(&self, _skill: Skill) -> i32 {
        self.hitpoints
    }
    fn skill_experience(&self, _skill: Skill) -> i32 {
        self.marker
    }
    fn npcs(&self) -> &[Npc] {
        assert!(
            !self.panic_on_npcs.load(Ordering::Relaxed),
            "npc table corrupted"
        );
        &self.npcs
    }
    fn scene(&self) -> Result<&Scene, AccessError> {
        Ok(&self.scene)
    }
    fn item_container(&self, _kind: InventoryKind) -> Option<&ItemContainer> {
        None
    }
    fn projectiles(&self) -> &[Projectile] {
        &[]
    }
}

impl Simulation for MarkerWorld {
    fn advance(&mut self) -> Result<(), SimulationError> {
        self.marker = self.marker.saturating_add(1);
        self.player.location.x = self.marker;
        self.player.location.y = self.marker;
        self.player.animation = self.marker;
        self.energy = self.marker;
        self.hitpoints = self.marker;
        Ok(())
    }

    fn accessor(&self) -> &dyn EngineAccessor {
        self
    }
}

#[tokio::test]
async fn test_concurrent_documents_are_consistent() {
    let harness = Harness::start(Box::new(MarkerWorld::new()), FAST);

    for _ in 0..10 {
        let requests = (0..16).map(|i| {
            let path = if i % 2 == 0 { "/player" } else { "/stats" };
            harness.get(path)
        });
        for (status, body) in futures::future::join_all(requests).await {
            assert_eq!(status, StatusCode::OK);
            let json: Value = serde_json::from_slice(&body).unwrap();
            if let Some(player) = json.as_object() {
                let marker = &player["x"];
                for field in ["y", "animation", "health", "runEnergy"] {
                    assert_eq!(&player[field], marker, "field {field} in {json}");
                }
            } else {
                let stats = json.as_array().unwrap();
                let marker = &stats[0]["xp"];
                for stat in stats {
                    assert_eq!(&stat["level"], marker, "{json}");
                    assert_eq!(&stat["boostedLevel"], marker, "{json}");
                    assert_eq!(&stat["xp"], marker, "{json}");
                }
            }
        }
    }

    harness.stop().await;
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn test_scene_failure_is_server_error() {
    let mut world = populated_world();
    world.scene = None;
    let harness = Harness::start(Box::new(world), STILL);

    for path in ["/objects", "/grounditems"] {
        let (status, body) = harness.get(path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "GET {path}");
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 500);
        assert!(json["error"].as_str().unwrap().contains(path));
    }

    // Other endpoints are unaffected.
    let json = harness.get_json("/player").await;
    assert_eq!(json["x"], 100);

    harness.stop().await;
}

#[tokio::test]
async fn test_projector_panic_is_server_error() {
    let world = MarkerWorld::new();
    let trip = Arc::clone(&world.panic_on_npcs);
    let harness = Harness::start(Box::new(world), STILL);

    trip.store(true, Ordering::Relaxed);
    let (status, _) = harness.get("/npcs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // The engine thread survived the panic.
    trip.store(false, Ordering::Relaxed);
    let json = harness.get_json("/npcs").await;
    assert_eq!(json, serde_json::json!([]));

    harness.stop().await;
}

#[tokio::test]
async fn test_stopped_engine_is_unavailable() {
    let engine = spawn_engine(
        Box::new(SceneWorld::empty()),
        STILL,
        Box::new(NoOpCallback),
    )
    .unwrap();
    let state = Arc::new(AppState::new(engine.bridge().clone(), None));
    tokio::task::spawn_blocking(move || engine.shutdown())
        .await
        .unwrap()
        .unwrap();

    let response = build_router(state)
        .oneshot(Request::get("/tick").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_stalled_engine_times_out() {
    // Nothing drains this queue.
    let (queue, _jobs) = bridge::queue();
    let state = Arc::new(AppState::new(
        EngineBridge::new(queue),
        Some(Duration::from_millis(20)),
    ));

    let response = build_router(state)
        .oneshot(Request::get("/player").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], 503);
}
