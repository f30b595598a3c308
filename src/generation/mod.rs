//! # Generation Module
//!
//! Procedural generation of floors and the content that populates them.
//!
//! Floor 0 is the surface: open ground with a single walled structure built by
//! binary space partitioning. Every deeper floor is a room-and-tunnel dungeon.
//! Both are driven by a [`GenerationConfig`] and a caller-supplied RNG, so the
//! same seed always yields the same floor.

pub mod content;
pub mod dungeon;
pub mod spawns;
pub mod structure;
pub mod surface;

pub use content::*;
pub use dungeon::*;
pub use spawns::*;
pub use structure::*;
pub use surface::*;

use crate::config::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_MAX_ATTEMPTS};
use crate::{Agent, DelveError, DelveResult, GameMap, Position, TileKind};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for floor generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    pub map_width: u32,
    pub map_height: u32,
    /// Rooms placed on every dungeon floor
    pub max_rooms: u32,
    /// Smallest room side, walls included
    pub room_min_size: u32,
    /// Largest room side, walls included
    pub room_max_size: u32,
    /// Budget for any rejection-sampling loop during generation
    pub max_placement_attempts: u32,
    /// Smallest side of the surface structure
    pub structure_min_size: u32,
    /// Largest side of the surface structure
    pub structure_max_size: u32,
    /// Distance from the map edge at which the player lands on the surface
    pub surface_edge_offset: u32,
    pub partition: PartitionConfig,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.room_max_size >= config.room_min_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            max_rooms: 12,
            room_min_size: 6,
            room_max_size: 10,
            max_placement_attempts: DEFAULT_MAX_ATTEMPTS,
            structure_min_size: 20,
            structure_max_size: 30,
            surface_edge_offset: 10,
            partition: PartitionConfig::default(),
        }
    }

    /// Creates a configuration for testing with smaller, simpler floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            map_width: 60,
            map_height: 40,
            max_rooms: 6,
            room_min_size: 5,
            room_max_size: 8,
            structure_min_size: 16,
            structure_max_size: 20,
            surface_edge_offset: 5,
            ..Self::new(seed)
        }
    }

    /// Loads a configuration from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that cannot produce a floor.
    pub fn validate(&self) -> DelveResult<()> {
        let fail = |message: String| Err(DelveError::InvalidConfig(message));

        if self.max_rooms < 2 {
            return fail(format!(
                "max_rooms must be at least 2 to hold a start and stairs, got {}",
                self.max_rooms
            ));
        }
        if self.room_min_size < 4 || self.room_max_size < self.room_min_size {
            return fail(format!(
                "room sizes {}..={} leave no interior",
                self.room_min_size, self.room_max_size
            ));
        }
        if self.room_max_size + 2 > self.map_width || self.room_max_size + 2 > self.map_height {
            return fail(format!(
                "rooms up to {} tiles do not fit a {}x{} map",
                self.room_max_size, self.map_width, self.map_height
            ));
        }
        if self.structure_max_size < self.structure_min_size
            || self.structure_min_size < 2 * self.partition.min_leaf_width.max(self.partition.min_leaf_height)
        {
            return fail(format!(
                "structure sizes {}..={} cannot be partitioned",
                self.structure_min_size, self.structure_max_size
            ));
        }
        let surface_span = self.structure_max_size + 2;
        if surface_span > self.map_width || surface_span > self.map_height {
            return fail(format!(
                "structures up to {} tiles do not fit a {}x{} map",
                self.structure_max_size, self.map_width, self.map_height
            ));
        }
        // The far-edge start is `width - offset`, so zero would land off the map
        if self.surface_edge_offset == 0
            || 2 * self.surface_edge_offset >= self.map_width.min(self.map_height)
        {
            return fail(format!(
                "surface edge offset {} is too large",
                self.surface_edge_offset
            ));
        }
        if self.max_placement_attempts == 0 {
            return fail("max_placement_attempts must be positive".to_string());
        }
        self.partition.validate()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Axis-aligned rectangle of a room. `(x1, y1)` and `(x2, y2)` are the wall
/// corners; the carvable interior lies strictly between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    /// Creates a room from its top-left corner and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let room = Room::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.inner_contains(Position::new(6, 6)));
    /// assert!(!room.inner_contains(Position::new(5, 6)));
    /// ```
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width as i32,
            y2: y + height as i32,
        }
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Interior cells, row by row.
    pub fn inner_positions(&self) -> impl Iterator<Item = Position> {
        let (x1, y1, x2, y2) = (self.x1, self.y1, self.x2, self.y2);
        (y1 + 1..y2).flat_map(move |y| (x1 + 1..x2).map(move |x| Position::new(x, y)))
    }

    pub fn inner_contains(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Whether `pos` lies on the rectangle or its border.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    /// True when the rectangles, each grown by one cell, overlap.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 - 1 <= other.x2
            && self.x2 + 1 >= other.x1
            && self.y1 - 1 <= other.y2
            && self.y2 + 1 >= other.y1
    }

    pub fn translate(&self, offset: Position) -> Room {
        Room {
            x1: self.x1 + offset.x,
            y1: self.y1 + offset.y,
            x2: self.x2 + offset.x,
            y2: self.y2 + offset.y,
        }
    }
}

/// A way of producing a complete floor.
pub trait FloorGenerator {
    /// Generates floor number `floor` with `player` placed on it.
    fn generate(&self, floor: u32, player: Agent, rng: &mut StdRng) -> DelveResult<GameMap>;

    /// Checks that a generated floor meets the basic requirements.
    fn validate(&self, map: &GameMap) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates floor `floor`, dispatching to the surface or dungeon generator.
pub fn generate_floor(
    floor: u32,
    config: &GenerationConfig,
    content: &ContentCatalog,
    player: Agent,
    rng: &mut StdRng,
) -> DelveResult<GameMap> {
    let generator: Box<dyn FloorGenerator + '_> = if floor == 0 {
        Box::new(SurfaceGenerator::new(config))
    } else {
        Box::new(DungeonGenerator::new(config, content))
    };
    info!("Generating floor {} with {}", floor, generator.generator_type());
    let map = generator.generate(floor, player, rng)?;
    generator.validate(&map)?;
    Ok(map)
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

/// Checks the properties every floor must have: walkable ground under the
/// player and a way further down.
pub fn validate_floor(map: &GameMap) -> DelveResult<()> {
    if map.grid.count_kind(TileKind::Floor) + map.grid.count_kind(TileKind::SurfaceFloor) == 0 {
        return Err(DelveError::GenerationFailed(
            "floor has no walkable ground".to_string(),
        ));
    }
    if !map.grid.is_walkable(map.player_start) {
        return Err(DelveError::GenerationFailed(format!(
            "player start {:?} is not walkable",
            map.player_start
        )));
    }
    match map.downstairs_location {
        Some(pos) if map.grid.get(pos).map(|tile| tile.kind) == Some(TileKind::DownStairs) => Ok(()),
        Some(pos) => Err(DelveError::GenerationFailed(format!(
            "down stairs at {:?} were not placed",
            pos
        ))),
        None => Err(DelveError::GenerationFailed(
            "floor has no down stairs".to_string(),
        )),
    }
}
