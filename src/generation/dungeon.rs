//! # Dungeon Generation
//!
//! Room-and-tunnel layouts for every floor below the surface.
//!
//! Rooms are placed by bounded rejection sampling. Each new room is joined to
//! the previous one by a winding tunnel, so the whole floor forms one chain. The
//! first room holds the player and the second-to-last holds the stairs down.

use crate::{
    roll_count, validate_floor, Agent, ContentCatalog, DelveError, DelveResult, FloorGenerator,
    GameMap, GenerationConfig, Position, Room, Tile,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds dungeon floors from a configuration and a content catalog.
pub struct DungeonGenerator<'a> {
    config: &'a GenerationConfig,
    content: &'a ContentCatalog,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(config: &'a GenerationConfig, content: &'a ContentCatalog) -> Self {
        Self { config, content }
    }

    /// Samples rooms until one fits among `existing`.
    ///
    /// A candidate is rejected if it intersects an accepted room or if its
    /// centre lands on the map boundary.
    fn place_room(&self, existing: &[Room], rng: &mut StdRng) -> DelveResult<Room> {
        let config = self.config;
        let (map_w, map_h) = (config.map_width as i32, config.map_height as i32);

        for _ in 0..config.max_placement_attempts {
            let width = rng.gen_range(config.room_min_size..=config.room_max_size);
            let height = rng.gen_range(config.room_min_size..=config.room_max_size);
            let x = rng.gen_range(0..=map_w - width as i32 - 1);
            let y = rng.gen_range(0..=map_h - height as i32 - 1);
            let room = Room::new(x, y, width, height);

            let center = room.center();
            let on_boundary =
                center.x == 0 || center.y == 0 || center.x == map_w - 1 || center.y == map_h - 1;
            if on_boundary || existing.iter().any(|other| room.intersects(other)) {
                continue;
            }
            return Ok(room);
        }

        Err(DelveError::GenerationFailed(format!(
            "could not place room {} after {} attempts",
            existing.len() + 1,
            config.max_placement_attempts
        )))
    }

    /// Drops monsters and items on free interior cells of `room`.
    fn populate_room(&self, map: &mut GameMap, room: &Room, rng: &mut StdRng) -> DelveResult<()> {
        let floor = map.floor;
        let content = self.content;

        let monster_count = roll_count(&content.max_monsters, floor, rng);
        let item_count = roll_count(&content.max_items, floor, rng);
        let monsters = content.monster_table.choose(floor, monster_count, rng);
        let items = content.item_table.choose(floor, item_count, rng);

        for template_id in monsters {
            let pos = random_inner_cell(room, rng);
            if !map.is_occupied(pos) {
                map.add_agent(content.spawn_agent(&template_id, pos)?);
            }
        }
        for template_id in items {
            let pos = random_inner_cell(room, rng);
            if !map.is_occupied(pos) {
                map.add_item(content.spawn_item(&template_id, pos)?);
            }
        }
        Ok(())
    }

    fn place_starter_kit(&self, map: &mut GameMap, center: Position) -> DelveResult<()> {
        let dagger = self.content.spawn_item("dagger", center + Position::new(1, 0))?;
        let armor = self.content.spawn_item("leather_armor", center - Position::new(1, 0))?;
        map.add_item(dagger);
        map.add_item(armor);
        Ok(())
    }
}

impl FloorGenerator for DungeonGenerator<'_> {
    fn generate(&self, floor: u32, mut player: Agent, rng: &mut StdRng) -> DelveResult<GameMap> {
        let config = self.config;
        let mut map = GameMap::new(floor, config.map_width, config.map_height, Tile::wall());
        let mut rooms: Vec<Room> = Vec::with_capacity(config.max_rooms as usize);
        let stairs_room = config.max_rooms.saturating_sub(2) as usize;

        for index in 0..config.max_rooms as usize {
            let room = self.place_room(&rooms, rng)?;
            map.grid.carve_room(&room, Tile::floor())?;

            match rooms.last() {
                None => {
                    player.position = room.center();
                    map.player_start = room.center();
                    map.add_agent(player.clone());
                    if floor == 1 {
                        self.place_starter_kit(&mut map, room.center())?;
                    }
                }
                Some(previous) => {
                    for pos in winding_tunnel(previous.center(), room.center(), rng) {
                        map.grid.set(pos, Tile::floor())?;
                    }
                }
            }

            if index == stairs_room {
                map.downstairs_location = Some(room.center());
                map.update_stairs()?;
            }

            self.populate_room(&mut map, &room, rng)?;
            rooms.push(room);
        }

        debug!("Placed {} rooms on floor {}", rooms.len(), floor);
        map.rooms = rooms;
        map.update_stairs()?;
        Ok(map)
    }

    fn validate(&self, map: &GameMap) -> DelveResult<()> {
        validate_floor(map)
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

fn random_inner_cell(room: &Room, rng: &mut StdRng) -> Position {
    Position::new(
        rng.gen_range(room.x1 + 1..room.x2),
        rng.gen_range(room.y1 + 1..room.y2),
    )
}

/// A meandering tunnel from `start` to `end`, excluding `start`.
///
/// Every step goes to a random neighbour that closes the gap on at least one
/// axis without widening it on the other, so the tunnel always arrives and
/// never leaves the bounding box of its endpoints.
///
/// # Examples
///
/// ```
/// use delve::{winding_tunnel, Position};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(5);
/// let tunnel = winding_tunnel(Position::new(2, 2), Position::new(9, 5), &mut rng);
/// assert_eq!(tunnel.last(), Some(&Position::new(9, 5)));
/// assert!(!tunnel.contains(&Position::new(2, 2)));
/// ```
pub fn winding_tunnel(start: Position, end: Position, rng: &mut StdRng) -> Vec<Position> {
    let mut current = start;
    let mut cells = Vec::new();

    while current != end {
        let gap_x = (end.x - current.x).abs();
        let gap_y = (end.y - current.y).abs();
        let steps: Vec<Position> = current
            .adjacent_positions()
            .into_iter()
            .filter(|next| {
                let next_x = (end.x - next.x).abs();
                let next_y = (end.y - next.y).abs();
                next_x <= gap_x && next_y <= gap_y && (next_x < gap_x || next_y < gap_y)
            })
            .collect();

        // A straight step towards the end always qualifies, so `steps` is never empty
        current = match steps.choose(rng) {
            Some(next) => *next,
            None => break,
        };
        cells.push(current);
    }

    cells
}
