//! # Surface Generation
//!
//! Floor 0: open ground, the player near an edge, and one walled structure
//! whose innermost room holds the way down.

use crate::{
    validate_floor, Agent, DelveError, DelveResult, FloorGenerator, GameMap, GenerationConfig,
    Position, Room, Structure, Tile,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds the surface floor.
pub struct SurfaceGenerator<'a> {
    config: &'a GenerationConfig,
}

impl<'a> SurfaceGenerator<'a> {
    pub fn new(config: &'a GenerationConfig) -> Self {
        Self { config }
    }

    fn player_start(&self, rng: &mut StdRng) -> Position {
        let offset = self.config.surface_edge_offset as i32;
        let (w, h) = (self.config.map_width as i32, self.config.map_height as i32);
        let x = *[offset, w - offset].choose(rng).unwrap_or(&offset);
        let y = *[offset, h - offset].choose(rng).unwrap_or(&offset);
        Position::new(x, y)
    }

    /// Picks a corner for a `width` x `height` structure whose outline, grown by
    /// one cell, stays clear of the player.
    fn structure_corner(
        &self,
        width: u32,
        height: u32,
        player: Position,
        rng: &mut StdRng,
    ) -> DelveResult<Position> {
        let max_x = self.config.map_width as i32 - width as i32 - 1;
        let max_y = self.config.map_height as i32 - height as i32 - 1;
        if max_x < 1 || max_y < 1 {
            return Err(DelveError::InvalidConfig(format!(
                "a {}x{} structure does not fit the surface",
                width, height
            )));
        }

        for _ in 0..self.config.max_placement_attempts {
            let corner = Position::new(rng.gen_range(1..=max_x), rng.gen_range(1..=max_y));
            let footprint = Room::new(corner.x - 1, corner.y - 1, width + 1, height + 1);
            if !footprint.contains(player) {
                return Ok(corner);
            }
        }
        Err(DelveError::GenerationFailed(
            "no room for the surface structure away from the player".to_string(),
        ))
    }
}

impl FloorGenerator for SurfaceGenerator<'_> {
    fn generate(&self, floor: u32, mut player: Agent, rng: &mut StdRng) -> DelveResult<GameMap> {
        let config = self.config;
        let mut map = GameMap::new(floor, config.map_width, config.map_height, Tile::surface_floor());

        let start = self.player_start(rng);
        map.player_start = start;

        let width = rng.gen_range(config.structure_min_size..=config.structure_max_size);
        let height = rng.gen_range(config.structure_min_size..=config.structure_max_size);
        let corner = self.structure_corner(width, height, start, rng)?;
        let structure = Structure::generate(width, height, &config.partition, rng)?;

        map.grid.blit(&structure.grid, corner)?;
        map.rooms = structure
            .rooms
            .iter()
            .map(|room| room.translate(corner))
            .collect();
        map.downstairs_location = Some(structure.downstairs + corner);
        map.update_stairs()?;
        debug!(
            "Surface structure {}x{} at {:?}, stairs at {:?}",
            width, height, corner, map.downstairs_location
        );

        player.position = start;
        map.add_agent(player);
        Ok(map)
    }

    fn validate(&self, map: &GameMap) -> DelveResult<()> {
        validate_floor(map)
    }

    fn generator_type(&self) -> &'static str {
        "SurfaceGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentTemplate, HostilityTable, TileKind};
    use rand::SeedableRng;

    fn player() -> Agent {
        AgentTemplate::player().spawn(Position::new(0, 0), &HostilityTable::standard())
    }

    #[test]
    fn test_surface_layout() {
        let config = GenerationConfig::for_testing(21);
        let generator = SurfaceGenerator::new(&config);
        let mut rng = StdRng::seed_from_u64(21);

        let map = generator.generate(0, player(), &mut rng).unwrap();
        generator.validate(&map).unwrap();

        let offset = config.surface_edge_offset as i32;
        let start = map.player_start;
        assert!(start.x == offset || start.x == config.map_width as i32 - offset);
        assert!(start.y == offset || start.y == config.map_height as i32 - offset);
        assert_eq!(map.grid.tile(start).unwrap().kind, TileKind::SurfaceFloor);
        assert_eq!(map.agents.len(), 1);
        assert_eq!(map.agents[0].position, start);

        assert_eq!(map.grid.count_kind(TileKind::DownStairs), 1);
        assert!(map.grid.count_kind(TileKind::Wall) > 0);
        assert!(!map.rooms.is_empty());
        let stairs = map.downstairs_location.unwrap();
        assert!(map.rooms.iter().any(|room| room.inner_contains(stairs)));
    }

    #[test]
    fn test_smallest_edge_offset_stays_on_map() {
        let config = GenerationConfig {
            surface_edge_offset: 1,
            ..GenerationConfig::for_testing(3)
        };
        config.validate().unwrap();
        let generator = SurfaceGenerator::new(&config);

        for seed in 0..8 {
            let map = generator
                .generate(0, player(), &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert!(map.in_bounds(map.player_start));
            assert_eq!(map.agents[0].position, map.player_start);
        }
    }

    #[test]
    fn test_surface_is_deterministic_per_seed() {
        let config = GenerationConfig::for_testing(3);
        let generator = SurfaceGenerator::new(&config);

        let a = generator.generate(0, player(), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = generator.generate(0, player(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.downstairs_location, b.downstairs_location);
    }
}
