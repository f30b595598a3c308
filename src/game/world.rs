//! # World Module
//!
//! Tiles, tile grids, boolean masks, single floors and the multi-floor world.
//!
//! A [`TileGrid`] is plain data: generation writes tile records into it and
//! everything else only reads it. A [`GameMap`] pairs a grid with the agents
//! and items standing on it plus the player's `visible`/`explored` masks that
//! a renderer consumes. A [`GameWorld`] owns every floor generated so far.

use crate::{
    compute_fov, generate_floor, Agent, ContentCatalog, DelveError, DelveResult, EntityId,
    GameEvent, GenerationConfig, Item, Position, RenderOrder, Room,
};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Glyph and colors used to draw a tile or entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    pub glyph: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

impl Graphic {
    pub const fn new(glyph: char, fg: [u8; 3], bg: [u8; 3]) -> Self {
        Self { glyph, fg, bg }
    }
}

/// Drawn for cells the player has never seen.
pub const SHROUD: Graphic = Graphic::new(' ', [255, 255, 255], [0, 0, 0]);

/// The kinds of tile a floor is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    DownStairs,
    UpStairs,
    SurfaceFloor,
}

/// A single grid cell.
///
/// `dark` is drawn when the cell is explored but not in view, `light` when it
/// is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
    pub transparent: bool,
    pub dark: Graphic,
    pub light: Graphic,
}

impl Tile {
    /// Builds the canonical tile record for a tile kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Tile, TileKind};
    ///
    /// let wall = Tile::new(TileKind::Wall);
    /// assert!(!wall.walkable);
    /// assert!(!wall.transparent);
    /// assert!(Tile::new(TileKind::DownStairs).walkable);
    /// ```
    pub fn new(kind: TileKind) -> Self {
        match kind {
            TileKind::Floor => Self {
                kind,
                walkable: true,
                transparent: true,
                dark: Graphic::new(' ', [255, 255, 255], [184, 94, 130]),
                light: Graphic::new(' ', [255, 255, 255], [255, 169, 198]),
            },
            TileKind::Wall => Self {
                kind,
                walkable: false,
                transparent: false,
                dark: Graphic::new(' ', [255, 255, 255], [143, 0, 31]),
                light: Graphic::new(' ', [255, 255, 255], [255, 33, 81]),
            },
            TileKind::DownStairs => Self {
                kind,
                walkable: true,
                transparent: true,
                dark: Graphic::new('>', [0, 0, 100], [50, 50, 150]),
                light: Graphic::new('>', [255, 255, 255], [200, 180, 50]),
            },
            TileKind::UpStairs => Self {
                kind,
                walkable: true,
                transparent: true,
                dark: Graphic::new('<', [0, 0, 100], [50, 50, 150]),
                light: Graphic::new('<', [255, 255, 255], [200, 180, 50]),
            },
            TileKind::SurfaceFloor => Self {
                kind,
                walkable: true,
                transparent: true,
                dark: Graphic::new(' ', [255, 255, 255], [3, 33, 0]),
                light: Graphic::new(' ', [255, 255, 255], [9, 94, 0]),
            },
        }
    }

    pub fn floor() -> Self {
        Self::new(TileKind::Floor)
    }

    pub fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    pub fn surface_floor() -> Self {
        Self::new(TileKind::SurfaceFloor)
    }
}

/// A fixed-size boolean grid: transparency input, visibility output, explored memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Mask {
    /// Creates a mask with every cell set to `fill`.
    pub fn new(width: u32, height: u32, fill: bool) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Reads a cell; anything outside the mask reads as `false`.
    pub fn get(&self, pos: Position) -> bool {
        self.index(pos).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// Writes a cell, failing on out-of-bounds positions.
    pub fn set(&mut self, pos: Position, value: bool) -> DelveResult<()> {
        let index = self
            .index(pos)
            .ok_or(DelveError::OutOfBounds { x: pos.x, y: pos.y })?;
        self.cells[index] = value;
        Ok(())
    }

    /// Sets a cell to `true` if it lies inside the mask. Returns whether it did.
    pub fn mark(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(index) => {
                self.cells[index] = true;
                true
            }
            None => false,
        }
    }

    /// In-place logical OR with a mask of the same shape.
    pub fn union_with(&mut self, other: &Mask) -> DelveResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(DelveError::InvalidConfig(format!(
                "cannot merge a {}x{} mask into a {}x{} mask",
                other.width, other.height, self.width, self.height
            )));
        }
        for (cell, other) in self.cells.iter_mut().zip(&other.cells) {
            *cell |= *other;
        }
        Ok(())
    }

    /// Number of `true` cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Positions of every `true` cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(move |(i, _)| Position::new((i % width) as i32, (i / width) as i32))
    }
}

/// Fixed-size 2D array of tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled with a single tile.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Tile, TileGrid, TileKind};
    ///
    /// let mut grid = TileGrid::new(10, 5, Tile::wall());
    /// grid.set(Position::new(3, 2), Tile::floor()).unwrap();
    /// assert_eq!(grid.get(Position::new(3, 2)).unwrap().kind, TileKind::Floor);
    /// assert!(grid.get(Position::new(10, 0)).is_none());
    /// ```
    pub fn new(width: u32, height: u32, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    /// Like [`TileGrid::get`] but treats a missing cell as a fault.
    pub fn tile(&self, pos: Position) -> DelveResult<&Tile> {
        self.get(pos)
            .ok_or(DelveError::OutOfBounds { x: pos.x, y: pos.y })
    }

    pub fn set(&mut self, pos: Position, tile: Tile) -> DelveResult<()> {
        let index = self
            .index(pos)
            .ok_or(DelveError::OutOfBounds { x: pos.x, y: pos.y })?;
        self.tiles[index] = tile;
        Ok(())
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).map(|tile| tile.walkable).unwrap_or(false)
    }

    /// Writes `tile` into the interior of a room.
    pub fn carve_room(&mut self, room: &Room, tile: Tile) -> DelveResult<()> {
        for pos in room.inner_positions() {
            self.set(pos, tile)?;
        }
        Ok(())
    }

    /// Copies `source` into this grid with its top-left corner at `offset`.
    pub fn blit(&mut self, source: &TileGrid, offset: Position) -> DelveResult<()> {
        for y in 0..source.height as i32 {
            for x in 0..source.width as i32 {
                let tile = *source.tile(Position::new(x, y))?;
                self.set(offset + Position::new(x, y), tile)?;
            }
        }
        Ok(())
    }

    pub fn transparency_mask(&self) -> Mask {
        self.mask_of(|tile| tile.transparent)
    }

    pub fn walkable_mask(&self) -> Mask {
        self.mask_of(|tile| tile.walkable)
    }

    fn mask_of(&self, predicate: impl Fn(&Tile) -> bool) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            cells: self.tiles.iter().map(predicate).collect(),
        }
    }

    /// Number of cells of a given kind.
    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }
}

/// What a renderer needs to draw one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: [u8; 3],
    pub order: RenderOrder,
}

/// One generated floor and everything standing on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    /// Depth of this floor; 0 is the surface
    pub floor: u32,
    pub grid: TileGrid,
    /// Agents in insertion order; this order is the turn order
    pub agents: Vec<Agent>,
    pub items: Vec<Item>,
    /// Cells the player can currently see
    pub visible: Mask,
    /// Cells the player has ever seen
    pub explored: Mask,
    /// Rooms carved while generating this floor
    pub rooms: Vec<Room>,
    pub player_start: Position,
    pub downstairs_location: Option<Position>,
    pub upstairs_location: Option<Position>,
}

impl GameMap {
    /// Creates an empty floor filled with `fill`.
    pub fn new(floor: u32, width: u32, height: u32, fill: Tile) -> Self {
        Self {
            floor,
            grid: TileGrid::new(width, height, fill),
            agents: Vec::new(),
            items: Vec::new(),
            visible: Mask::new(width, height, false),
            explored: Mask::new(width, height, false),
            rooms: Vec::new(),
            player_start: Position::origin(),
            downstairs_location: None,
            upstairs_location: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    /// Appends an agent to the turn order and returns its id.
    pub fn add_agent(&mut self, agent: Agent) -> EntityId {
        let id = agent.id;
        debug!("Placing {} at {:?} on floor {}", agent.name, agent.position, self.floor);
        self.agents.push(agent);
        id
    }

    /// Removes an agent, preserving the order of the rest.
    pub fn remove_agent(&mut self, id: EntityId) -> Option<Agent> {
        let index = self.agents.iter().position(|agent| agent.id == id)?;
        Some(self.agents.remove(index))
    }

    pub fn add_item(&mut self, item: Item) -> EntityId {
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn agent(&self, id: EntityId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    /// Like [`GameMap::agent`] but an unknown id is an error.
    pub fn require_agent(&self, id: EntityId) -> DelveResult<&Agent> {
        self.agent(id).ok_or(DelveError::UnknownEntity(id))
    }

    pub fn require_agent_mut(&mut self, id: EntityId) -> DelveResult<&mut Agent> {
        self.agent_mut(id).ok_or(DelveError::UnknownEntity(id))
    }

    /// The agent blocking movement into `pos`, if any.
    pub fn blocking_agent_at(&self, pos: Position) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|agent| agent.blocks_movement && agent.position == pos)
    }

    /// The living agent standing on `pos`, if any.
    pub fn agent_at(&self, pos: Position) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|agent| agent.is_alive() && agent.position == pos)
    }

    /// Whether any agent, corpse or item already sits on `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.agents.iter().any(|agent| agent.position == pos)
            || self.items.iter().any(|item| item.position == pos)
    }

    pub fn living_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|agent| agent.is_alive())
    }

    /// Ids of living agents in turn order.
    pub fn living_agent_ids(&self) -> Vec<EntityId> {
        self.living_agents().map(|agent| agent.id).collect()
    }

    /// Entities sorted by render order (corpses, then items, then actors).
    pub fn render_list(&self) -> Vec<RenderEntry> {
        let mut entries: Vec<RenderEntry> = self
            .items
            .iter()
            .map(|item| RenderEntry {
                id: item.id,
                position: item.position,
                glyph: item.glyph,
                color: item.color,
                order: RenderOrder::Item,
            })
            .chain(self.agents.iter().map(|agent| RenderEntry {
                id: agent.id,
                position: agent.position,
                glyph: agent.glyph,
                color: agent.color,
                order: agent.render_order,
            }))
            .collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    /// Re-stamps the stair tiles so they match the recorded stair locations.
    pub fn update_stairs(&mut self) -> DelveResult<()> {
        if let Some(pos) = self.upstairs_location {
            self.grid.set(pos, Tile::new(TileKind::UpStairs))?;
        }
        if let Some(pos) = self.downstairs_location {
            self.grid.set(pos, Tile::new(TileKind::DownStairs))?;
        }
        Ok(())
    }

    /// Recomputes `visible` from the viewer's vision and folds it into `explored`.
    pub fn update_fov(&mut self, viewer: EntityId) -> DelveResult<()> {
        let agent = self.require_agent(viewer)?;
        let visible = compute_fov(
            &self.grid.transparency_mask(),
            agent.position,
            agent.vision.radius,
            agent.vision.algorithm,
        );
        self.explored.union_with(&visible)?;
        self.visible = visible;
        Ok(())
    }
}

/// Which way a staircase leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StairDirection {
    Up,
    Down,
}

/// Every floor generated so far plus the settings used to make new ones.
#[derive(Debug, Clone)]
pub struct GameWorld {
    pub config: GenerationConfig,
    pub content: ContentCatalog,
    pub floors: Vec<GameMap>,
    pub current_floor: usize,
}

impl GameWorld {
    /// Creates a world with no floors yet.
    pub fn new(config: GenerationConfig, content: ContentCatalog) -> Self {
        Self {
            config,
            content,
            floors: Vec::new(),
            current_floor: 0,
        }
    }

    pub fn current_map(&self) -> Option<&GameMap> {
        self.floors.get(self.current_floor)
    }

    pub fn current_map_mut(&mut self) -> Option<&mut GameMap> {
        self.floors.get_mut(self.current_floor)
    }

    pub fn require_current_map(&self) -> DelveResult<&GameMap> {
        self.current_map()
            .ok_or_else(|| DelveError::GenerationFailed("no floor has been generated".to_string()))
    }

    pub fn require_current_map_mut(&mut self) -> DelveResult<&mut GameMap> {
        self.floors
            .get_mut(self.current_floor)
            .ok_or_else(|| DelveError::GenerationFailed("no floor has been generated".to_string()))
    }

    /// Generates the next floor below the deepest one and places `player` on it.
    pub fn generate_next_floor(&mut self, player: Agent, rng: &mut StdRng) -> DelveResult<()> {
        let floor = self.floors.len() as u32;
        let map = generate_floor(floor, &self.config, &self.content, player, rng)?;
        info!(
            "Generated floor {} with {} rooms and {} agents",
            floor,
            map.rooms.len(),
            map.agents.len()
        );
        self.floors.push(map);
        self.current_floor = floor as usize;
        Ok(())
    }

    /// Moves `actor` up or down a staircase it is standing on.
    pub fn take_stairs(
        &mut self,
        actor: EntityId,
        direction: StairDirection,
        rng: &mut StdRng,
        events: &mut Vec<GameEvent>,
    ) -> DelveResult<()> {
        let map = self.require_current_map()?;
        let position = map.require_agent(actor)?.position;

        match direction {
            StairDirection::Down => {
                if map.downstairs_location != Some(position) {
                    return Err(DelveError::invalid_action("There are no stairs here"));
                }
                let previous = self.current_floor;
                let next = previous + 1;
                if next < self.floors.len() {
                    let agent = self.take_agent(actor)?;
                    self.current_floor = next;
                    let map = self.require_current_map_mut()?;
                    let arrival = map.upstairs_location.unwrap_or(map.player_start);
                    map.add_agent(Agent { position: arrival, ..agent });
                } else {
                    // The actor only leaves its floor once the new one exists
                    let traveller = map.require_agent(actor)?.clone();
                    self.generate_next_floor(traveller, rng)?;
                    if let Some(old) = self.floors.get_mut(previous) {
                        old.remove_agent(actor);
                    }
                    let map = self.require_current_map_mut()?;
                    let arrival = map.require_agent(actor)?.position;
                    map.upstairs_location = Some(arrival);
                    map.update_stairs()?;
                }
                events.push(GameEvent::Descended {
                    agent: actor,
                    floor: self.current_floor as u32,
                });
            }
            StairDirection::Up => {
                if self.current_floor == 0 || map.upstairs_location != Some(position) {
                    return Err(DelveError::invalid_action("There are no stairs here"));
                }
                let agent = self.take_agent(actor)?;
                self.current_floor -= 1;
                let map = self.require_current_map_mut()?;
                let arrival = map.downstairs_location.unwrap_or(map.player_start);
                map.add_agent(Agent { position: arrival, ..agent });
                events.push(GameEvent::Ascended {
                    agent: actor,
                    floor: self.current_floor as u32,
                });
            }
        }

        Ok(())
    }

    fn take_agent(&mut self, actor: EntityId) -> DelveResult<Agent> {
        self.require_current_map_mut()?
            .remove_agent(actor)
            .ok_or(DelveError::UnknownEntity(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentTemplate, HostilityTable};

    fn open_map(width: u32, height: u32) -> GameMap {
        let mut map = GameMap::new(1, width, height, Tile::wall());
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                map.grid.set(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        map
    }

    #[test]
    fn test_tile_records() {
        let floor = Tile::floor();
        assert!(floor.walkable && floor.transparent);
        let stairs = Tile::new(TileKind::DownStairs);
        assert_eq!(stairs.light.glyph, '>');
        assert_eq!(Tile::new(TileKind::UpStairs).dark.glyph, '<');
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = TileGrid::new(4, 3, Tile::wall());
        assert!(grid.in_bounds(Position::new(3, 2)));
        assert!(!grid.in_bounds(Position::new(4, 2)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(matches!(
            grid.set(Position::new(0, 3), Tile::floor()),
            Err(DelveError::OutOfBounds { x: 0, y: 3 })
        ));
        assert!(!grid.is_walkable(Position::new(9, 9)));
    }

    #[test]
    fn test_grid_blit() {
        let mut target = TileGrid::new(6, 6, Tile::surface_floor());
        let source = TileGrid::new(2, 2, Tile::wall());
        target.blit(&source, Position::new(3, 4)).unwrap();
        assert_eq!(target.count_kind(TileKind::Wall), 4);
        assert_eq!(target.get(Position::new(4, 5)).unwrap().kind, TileKind::Wall);
        assert!(target.blit(&source, Position::new(5, 5)).is_err());
    }

    #[test]
    fn test_mask_operations() {
        let mut a = Mask::new(3, 3, false);
        let mut b = Mask::new(3, 3, false);
        a.set(Position::new(0, 0), true).unwrap();
        b.set(Position::new(2, 1), true).unwrap();
        assert!(!a.mark(Position::new(3, 0)));
        a.union_with(&b).unwrap();
        assert_eq!(a.count(), 2);
        assert_eq!(
            a.positions().collect::<Vec<_>>(),
            vec![Position::new(0, 0), Position::new(2, 1)]
        );
        assert!(!a.get(Position::new(-1, -1)));
        assert!(a.union_with(&Mask::new(2, 2, true)).is_err());
    }

    #[test]
    fn test_agent_queries() {
        let table = HostilityTable::standard();
        let mut map = open_map(8, 8);
        let orc = AgentTemplate::orc().spawn(Position::new(2, 2), &table);
        let orc_id = map.add_agent(orc);

        assert_eq!(map.agent_at(Position::new(2, 2)).map(|a| a.id), Some(orc_id));
        assert!(map.blocking_agent_at(Position::new(2, 2)).is_some());
        assert!(map.is_occupied(Position::new(2, 2)));
        assert!(!map.is_occupied(Position::new(3, 3)));

        map.agent_mut(orc_id).unwrap().die();
        assert!(map.agent_at(Position::new(2, 2)).is_none());
        assert!(map.blocking_agent_at(Position::new(2, 2)).is_none());
        assert!(map.is_occupied(Position::new(2, 2)));
        assert!(map.living_agent_ids().is_empty());
    }

    #[test]
    fn test_render_list_orders_corpses_first() {
        let table = HostilityTable::standard();
        let mut map = open_map(8, 8);
        map.add_agent(AgentTemplate::orc().spawn(Position::new(2, 2), &table));
        let corpse_id = map.add_agent(AgentTemplate::troll().spawn(Position::new(3, 3), &table));
        map.agent_mut(corpse_id).unwrap().die();

        let list = map.render_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, corpse_id);
        assert_eq!(list[1].order, RenderOrder::Actor);
    }

    #[test]
    fn test_update_fov_accumulates_explored() {
        let table = HostilityTable::standard();
        let mut map = open_map(30, 10);
        let player_id = map.add_agent(AgentTemplate::player().spawn(Position::new(2, 5), &table));

        map.update_fov(player_id).unwrap();
        let first_view = map.visible.count();
        assert!(map.visible.get(Position::new(2, 5)));
        assert!(!map.visible.get(Position::new(27, 5)));

        map.agent_mut(player_id).unwrap().position = Position::new(26, 5);
        map.update_fov(player_id).unwrap();
        assert!(map.explored.get(Position::new(2, 5)));
        assert!(map.explored.get(Position::new(27, 5)));
        assert!(!map.visible.get(Position::new(2, 5)));
        assert!(map.explored.count() > first_view);
    }

    #[test]
    fn test_update_stairs_stamps_tiles() {
        let mut map = open_map(8, 8);
        map.downstairs_location = Some(Position::new(5, 5));
        map.upstairs_location = Some(Position::new(2, 2));
        map.update_stairs().unwrap();
        assert_eq!(map.grid.count_kind(TileKind::DownStairs), 1);
        assert_eq!(map.grid.count_kind(TileKind::UpStairs), 1);
    }
}
