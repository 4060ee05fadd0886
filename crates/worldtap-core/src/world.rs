//! In-memory reference world.
//!
//! [`SceneWorld`] implements [`EngineAccessor`] and [`Simulation`] over
//! plain owned data. The binary runs a seeded demo world; tests build
//! worlds field by field from [`SceneWorld::empty`].
//!
//! Per tick the world:
//!
//! 1. Lets each NPC wander at most one tile, staying inside the region
//! 2. Moves projectiles along their velocity and retires spent ones
//! 3. Regenerates run energy
//! 4. Every [`BOOST_DRIFT_TICKS`] ticks, moves boosted levels one point
//!    back toward the real level

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use worldtap_types::{InventoryKind, Skill};

use crate::accessor::{AccessError, EngineAccessor, Simulation, SimulationError};
use crate::config::WorldConfig;
use crate::scene::{
    CanvasPoint, GameObject, Item, ItemContainer, Npc, Player, Projectile, Scene, Tile, TileItem,
    WorldPoint,
};

/// World x of the region's south-west corner.
const REGION_BASE_X: i32 = 3200;
/// World y of the region's south-west corner.
const REGION_BASE_Y: i32 = 3200;
/// Client cycles that elapse per tick.
const CYCLES_PER_TICK: i32 = 30;
/// Maximum run energy.
const MAX_RUN_ENERGY: i32 = 10_000;
/// Run energy regained per tick.
const RUN_ENERGY_REGEN: i32 = 8;
/// Ticks between boosted-level drift steps.
pub const BOOST_DRIFT_TICKS: u64 = 100;
/// Local units per tile.
const LOCAL_UNITS_PER_TILE: i32 = 128;
/// Inventory slot count.
const INVENTORY_SLOTS: usize = 28;
/// Equipment slot count.
const EQUIPMENT_SLOTS: usize = 14;

const NPC_NAMES: [&str; 6] = ["Man", "Woman", "Guard", "Goblin", "Rat", "Banker"];
const OBJECT_IDS: [i32; 4] = [1276, 1278, 11_364, 2_092];
const GROUND_ITEM_IDS: [i32; 3] = [995, 526, 1_511];

/// Real and boosted level plus experience for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillLevels {
    /// Unboosted level.
    pub real: i32,
    /// Current level.
    pub boosted: i32,
    /// Experience points.
    pub xp: i32,
}

impl Default for SkillLevels {
    fn default() -> Self {
        Self {
            real: 1,
            boosted: 1,
            xp: 0,
        }
    }
}

/// A self-contained world model.
#[derive(Debug, Clone)]
pub struct SceneWorld {
    /// The local player, `None` while logged out.
    pub player: Option<Player>,
    /// Run energy, 0-10000.
    pub run_energy: i32,
    /// Pointer position, `None` when outside the canvas.
    pub mouse: Option<CanvasPoint>,
    /// Loaded NPCs.
    pub npcs: Vec<Npc>,
    /// The loaded region, `None` while a region load is in progress.
    pub scene: Option<Scene>,
    /// Projectiles in flight.
    pub projectiles: Vec<Projectile>,
    containers: BTreeMap<u32, ItemContainer>,
    skills: BTreeMap<Skill, SkillLevels>,
    projectile_budget: usize,
    scene_size: i32,
    ticks_elapsed: u64,
    rng: StdRng,
}

impl SceneWorld {
    /// A logged-out world with an empty 4x16x16 region.
    pub fn empty() -> Self {
        Self {
            player: None,
            run_energy: MAX_RUN_ENERGY,
            mouse: None,
            npcs: Vec::new(),
            scene: Some(Scene::empty(4, 16, 16)),
            containers: BTreeMap::new(),
            projectiles: Vec::new(),
            skills: BTreeMap::new(),
            projectile_budget: 0,
            scene_size: 16,
            ticks_elapsed: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// A populated, logged-in world generated from `config.seed`.
    pub fn demo(config: &WorldConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let size = i32::from(config.scene_size.max(1));
        let centre = WorldPoint::new(
            REGION_BASE_X.saturating_add(size / 2),
            REGION_BASE_Y.saturating_add(size / 2),
            0,
        );

        let scene = build_scene(&mut rng, config.planes, config.scene_size);

        let npcs = (0..config.npc_count)
            .map(|i| {
                let idx = usize::from(i);
                // Every fifth NPC is an unnamed helper actor.
                let name = if idx % 5 == 4 {
                    None
                } else {
                    NPC_NAMES
                        .get(idx % NPC_NAMES.len())
                        .map(|n| (*n).to_owned())
                };
                Npc {
                    id: 3_000_i32.saturating_add(i32::from(i)),
                    name,
                    location: WorldPoint::new(
                        REGION_BASE_X.saturating_add(rng.random_range(0..size)),
                        REGION_BASE_Y.saturating_add(rng.random_range(0..size)),
                        0,
                    ),
                    health_ratio: -1,
                    animation: -1,
                }
            })
            .collect();

        let mut skills = BTreeMap::new();
        for skill in Skill::trainable() {
            let level = if skill == Skill::Hitpoints {
                rng.random_range(10..=99)
            } else {
                rng.random_range(1..=99)
            };
            skills.insert(
                skill,
                SkillLevels {
                    real: level,
                    boosted: level,
                    xp: experience_for_level(level),
                },
            );
        }

        let mut containers = BTreeMap::new();
        let mut inventory = vec![Item::EMPTY; INVENTORY_SLOTS];
        for (slot, item) in inventory.iter_mut().enumerate().take(6) {
            *item = Item {
                id: GROUND_ITEM_IDS
                    .get(slot % GROUND_ITEM_IDS.len())
                    .copied()
                    .unwrap_or(995),
                quantity: rng.random_range(1..=50),
            };
        }
        containers.insert(
            InventoryKind::Inventory.container_id(),
            ItemContainer { items: inventory },
        );
        let mut equipment = vec![Item::EMPTY; EQUIPMENT_SLOTS];
        if let Some(weapon) = equipment.get_mut(3) {
            *weapon = Item {
                id: 1_277,
                quantity: 1,
            };
        }
        containers.insert(
            InventoryKind::Equipment.container_id(),
            ItemContainer { items: equipment },
        );

        let mut world = Self {
            player: Some(Player {
                name: Some(String::from("Worldtap")),
                location: centre,
                animation: -1,
            }),
            run_energy: MAX_RUN_ENERGY,
            mouse: None,
            npcs,
            scene: Some(scene),
            containers,
            projectiles: Vec::new(),
            skills,
            projectile_budget: usize::from(config.projectile_count),
            scene_size: size,
            ticks_elapsed: 0,
            rng,
        };
        world.refill_projectiles();
        world
    }

    /// Populate a container, as the engine does when the client first
    /// receives its contents.
    pub fn set_container(&mut self, kind: InventoryKind, container: ItemContainer) {
        self.containers.insert(kind.container_id(), container);
    }

    /// Set the levels of one skill.
    pub fn set_skill(&mut self, skill: Skill, real: i32, boosted: i32, xp: i32) {
        self.skills.insert(skill, SkillLevels { real, boosted, xp });
    }

    /// Mutable access to the loaded region.
    pub const fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Ticks this world has advanced.
    pub const fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    fn levels(&self, skill: Skill) -> SkillLevels {
        if skill.is_aggregate() {
            return self.skills.iter().filter(|(s, _)| !s.is_aggregate()).fold(
                SkillLevels {
                    real: 0,
                    boosted: 0,
                    xp: 0,
                },
                |acc, (_, l)| SkillLevels {
                    real: acc.real.saturating_add(l.real),
                    boosted: acc.boosted.saturating_add(l.boosted),
                    xp: acc.xp.saturating_add(l.xp),
                },
            );
        }
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    fn wander_npcs(&mut self) {
        let max_x = REGION_BASE_X.saturating_add(self.scene_size.saturating_sub(1));
        let max_y = REGION_BASE_Y.saturating_add(self.scene_size.saturating_sub(1));
        for npc in &mut self.npcs {
            if !self.rng.random_bool(0.5) {
                continue;
            }
            let dx = self.rng.random_range(-1..=1);
            let dy = self.rng.random_range(-1..=1);
            npc.location.x = npc.location.x.saturating_add(dx).clamp(REGION_BASE_X, max_x);
            npc.location.y = npc.location.y.saturating_add(dy).clamp(REGION_BASE_Y, max_y);
        }
    }

    fn move_projectiles(&mut self) {
        let cycles = f64::from(CYCLES_PER_TICK);
        for p in &mut self.projectiles {
            p.remaining_cycles = p.remaining_cycles.saturating_sub(CYCLES_PER_TICK);
            p.x += p.velocity_x * cycles;
            p.y += p.velocity_y * cycles;
        }
        self.projectiles.retain(|p| p.remaining_cycles > 0);
        self.refill_projectiles();
    }

    fn refill_projectiles(&mut self) {
        let Some(origin) = self.player.as_ref().map(|p| p.location) else {
            return;
        };
        while self.projectiles.len() < self.projectile_budget {
            let x1 = local_coordinate(origin.x.saturating_sub(REGION_BASE_X));
            let y1 = local_coordinate(origin.y.saturating_sub(REGION_BASE_Y));
            let flight = self.rng.random_range(60..=180);
            let velocity_x = f64::from(self.rng.random_range(-8_i32..=8));
            let velocity_y = f64::from(self.rng.random_range(-8_i32..=8));
            self.projectiles.push(Projectile {
                id: self.rng.random_range(1..=1_500),
                remaining_cycles: flight,
                x1,
                y1,
                x: f64::from(x1),
                y: f64::from(y1),
                z: -f64::from(self.rng.random_range(0_i32..=1_600)),
                velocity_x,
                velocity_y,
            });
        }
    }

    fn drift_boosts(&mut self) {
        for levels in self.skills.values_mut() {
            levels.boosted = match levels.boosted.cmp(&levels.real) {
                std::cmp::Ordering::Greater => levels.boosted.saturating_sub(1),
                std::cmp::Ordering::Less => levels.boosted.saturating_add(1),
                std::cmp::Ordering::Equal => levels.boosted,
            };
        }
    }
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::empty()
    }
}

impl EngineAccessor for SceneWorld {
    fn local_player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    fn run_energy(&self) -> i32 {
        self.run_energy
    }

    fn mouse_canvas_position(&self) -> Option<CanvasPoint> {
        self.mouse
    }

    fn real_skill_level(&self, skill: Skill) -> i32 {
        self.levels(skill).real
    }

    fn boosted_skill_level(&self, skill: Skill) -> i32 {
        self.levels(skill).boosted
    }

    fn skill_experience(&self, skill: Skill) -> i32 {
        self.levels(skill).xp
    }

    fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    fn scene(&self) -> Result<&Scene, AccessError> {
        self.scene.as_ref().ok_or(AccessError::SceneUnavailable)
    }

    fn item_container(&self, kind: InventoryKind) -> Option<&ItemContainer> {
        self.containers.get(&kind.container_id())
    }

    fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }
}

impl Simulation for SceneWorld {
    fn advance(&mut self) -> Result<(), SimulationError> {
        self.ticks_elapsed = self
            .ticks_elapsed
            .checked_add(1)
            .ok_or_else(|| SimulationError::Step {
                reason: "tick overflow".to_owned(),
            })?;

        self.wander_npcs();
        self.move_projectiles();
        self.run_energy = self
            .run_energy
            .saturating_add(RUN_ENERGY_REGEN)
            .min(MAX_RUN_ENERGY);
        if self.ticks_elapsed % BOOST_DRIFT_TICKS == 0 {
            self.drift_boosts();
        }
        Ok(())
    }

    fn accessor(&self) -> &dyn EngineAccessor {
        self
    }
}

/// Centre of a tile offset in local units.
const fn local_coordinate(tile_offset: i32) -> i32 {
    tile_offset
        .saturating_mul(LOCAL_UNITS_PER_TILE)
        .saturating_add(LOCAL_UNITS_PER_TILE / 2)
}

/// Coarse experience curve: enough to keep xp monotonic in level.
const fn experience_for_level(level: i32) -> i32 {
    let above_one = level.saturating_sub(1);
    above_one.saturating_mul(above_one).saturating_mul(above_one).saturating_mul(12)
}

/// Build a region with tiles on the ground plane and a sparse upper floor.
fn build_scene(rng: &mut StdRng, planes: u8, size: u16) -> Scene {
    let tiles = (0..planes)
        .map(|plane| {
            (0..size)
                .map(|x| {
                    (0..size)
                        .map(|y| {
                            // Upper planes only exist over a small building footprint.
                            if plane > 0 && (x >= size / 4 || y >= size / 4) {
                                return None;
                            }
                            Some(build_tile(rng, plane, x, y))
                        })
                        .collect()
                })
                .collect()
        })
        .collect();
    Scene::from_tiles(tiles)
}

fn build_tile(rng: &mut StdRng, plane: u8, x: u16, y: u16) -> Tile {
    let location = WorldPoint::new(
        REGION_BASE_X.saturating_add(i32::from(x)),
        REGION_BASE_Y.saturating_add(i32::from(y)),
        i32::from(plane),
    );

    let mut game_objects = vec![None; 5];
    if rng.random_ratio(1, 8) {
        let id = OBJECT_IDS
            .get(rng.random_range(0..OBJECT_IDS.len()))
            .copied()
            .unwrap_or(1276);
        if let Some(slot) = game_objects.first_mut() {
            *slot = Some(GameObject { id, location });
        }
    }

    let ground_items = rng.random_ratio(1, 20).then(|| {
        let id = GROUND_ITEM_IDS
            .get(rng.random_range(0..GROUND_ITEM_IDS.len()))
            .copied()
            .unwrap_or(995);
        vec![TileItem {
            id,
            quantity: rng.random_range(1..=100),
        }]
    });

    Tile {
        location,
        game_objects,
        ground_items,
    }
}
