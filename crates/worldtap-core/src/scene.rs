//! Engine-side view types.
//!
//! These are the shapes the [`EngineAccessor`](crate::accessor::EngineAccessor)
//! hands out. They belong to the engine; projectors only ever borrow them
//! while running on the engine thread.

/// A world tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldPoint {
    /// World x.
    pub x: i32,
    /// World y.
    pub y: i32,
    /// Vertical plane (0-3).
    pub plane: i32,
}

impl WorldPoint {
    /// Construct a point.
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }
}

/// A pixel position on the game canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasPoint {
    /// Horizontal pixel.
    pub x: i32,
    /// Vertical pixel.
    pub y: i32,
}

/// The local player actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name; `None` until the login handshake has completed.
    pub name: Option<String>,
    /// Current tile.
    pub location: WorldPoint,
    /// Current animation id, -1 when idle.
    pub animation: i32,
}

/// A non-player actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Npc {
    /// Definition id.
    pub id: i32,
    /// Display name; `None` for unnamed helper actors.
    pub name: Option<String>,
    /// Current tile.
    pub location: WorldPoint,
    /// Health bar ratio, -1 when no bar is displayed.
    pub health_ratio: i32,
    /// Current animation id.
    pub animation: i32,
}

/// A game object placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameObject {
    /// Definition id.
    pub id: i32,
    /// South-west tile of the object, which may differ from the owning tile.
    pub location: WorldPoint,
}

/// An item stack lying on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileItem {
    /// Item id.
    pub id: i32,
    /// Stack size.
    pub quantity: i32,
}

/// One scene tile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tile {
    /// World location of the tile.
    pub location: WorldPoint,
    /// Object slots; unused slots are `None`.
    pub game_objects: Vec<Option<GameObject>>,
    /// Ground items, `None` when nothing has ever been dropped here.
    pub ground_items: Option<Vec<TileItem>>,
}

impl Default for WorldPoint {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// The loaded region as a `[plane][x][y]` tile grid.
///
/// Cells are `None` where the region has no tile (unloaded or out of bounds).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    tiles: Vec<Vec<Vec<Option<Tile>>>>,
}

impl Scene {
    /// Build a scene from a prepared grid.
    pub const fn from_tiles(tiles: Vec<Vec<Vec<Option<Tile>>>>) -> Self {
        Self { tiles }
    }

    /// Build an empty grid of the given dimensions.
    pub fn empty(planes: usize, width: usize, height: usize) -> Self {
        Self {
            tiles: vec![vec![vec![None; height]; width]; planes],
        }
    }

    /// Iterate every present tile, plane by plane, then x, then y.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles
            .iter()
            .flat_map(|plane| plane.iter())
            .flat_map(|column| column.iter())
            .filter_map(Option::as_ref)
    }

    /// Mutable access to the cell at `(plane, x, y)`, if within the grid.
    pub fn cell_mut(&mut self, plane: usize, x: usize, y: usize) -> Option<&mut Option<Tile>> {
        self.tiles.get_mut(plane)?.get_mut(x)?.get_mut(y)
    }

    /// Number of planes in the grid.
    pub fn planes(&self) -> usize {
        self.tiles.len()
    }
}

/// One container slot as the engine stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    /// Item id, -1 for an empty slot.
    pub id: i32,
    /// Stack size, 0 for an empty slot.
    pub quantity: i32,
}

impl Item {
    /// The placeholder occupying an empty slot.
    pub const EMPTY: Self = Self { id: -1, quantity: 0 };
}

/// An ordered set of item slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemContainer {
    /// Slots in display order.
    pub items: Vec<Item>,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Spot animation id.
    pub id: i32,
    /// Client cycles until impact.
    pub remaining_cycles: i32,
    /// Launch x (local units).
    pub x1: i32,
    /// Launch y (local units).
    pub y1: i32,
    /// Current x (local units).
    pub x: f64,
    /// Current y (local units).
    pub y: f64,
    /// Current height.
    pub z: f64,
    /// Horizontal velocity per client cycle.
    pub velocity_x: f64,
    /// Vertical velocity per client cycle.
    pub velocity_y: f64,
}
