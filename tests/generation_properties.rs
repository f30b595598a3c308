//! Property tests for floor generation, field of view and pathfinding.

use delve::{
    compute_fov, generate_floor, AgentTemplate, ContentCatalog, FovAlgorithm, GenerationConfig,
    HostilityTable, Mask, PathCostField, Pathfinder, Position, TileKind,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mask_from(cells: &[bool], width: u32, height: u32) -> Mask {
    let mut mask = Mask::new(width, height, false);
    for (index, open) in cells.iter().enumerate() {
        let pos = Position::new((index as u32 % width) as i32, (index as u32 / width) as i32);
        mask.set(pos, *open).unwrap();
    }
    mask
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_dungeon_floor_invariants(seed in any::<u64>(), floor in 1u32..8) {
        let config = GenerationConfig::for_testing(seed);
        let content = ContentCatalog::standard();
        let player = AgentTemplate::player().spawn(Position::origin(), &HostilityTable::standard());
        let player_id = player.id;
        let mut rng = StdRng::seed_from_u64(seed);

        let map = generate_floor(floor, &config, &content, player, &mut rng).unwrap();

        prop_assert_eq!(map.rooms.len(), config.max_rooms as usize);
        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                prop_assert!(!a.intersects(b));
            }
        }

        prop_assert!(map.rooms[0].inner_contains(map.player_start));
        prop_assert_eq!(map.agent(player_id).unwrap().position, map.player_start);

        let stairs = map.downstairs_location.unwrap();
        prop_assert_eq!(stairs, map.rooms[map.rooms.len() - 2].center());
        prop_assert_eq!(map.grid.count_kind(TileKind::DownStairs), 1);

        // Every room is reachable from the start
        let field = PathCostField::from_grid(&map.grid);
        let pathfinder = Pathfinder::default();
        for room in &map.rooms {
            let target = room.center();
            if target != map.player_start {
                prop_assert!(!pathfinder.path(&field, map.player_start, target).is_empty());
            }
        }
    }

    #[test]
    fn test_surface_stairs_reachable(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing(seed);
        let content = ContentCatalog::standard();
        let player = AgentTemplate::player().spawn(Position::origin(), &HostilityTable::standard());
        let mut rng = StdRng::seed_from_u64(seed);

        let map = generate_floor(0, &config, &content, player, &mut rng).unwrap();
        let stairs = map.downstairs_location.unwrap();
        let field = PathCostField::from_grid(&map.grid);
        let path = Pathfinder::default().path(&field, map.player_start, stairs);
        prop_assert_eq!(path.last(), Some(&stairs));
    }

    #[test]
    fn test_fov_properties(
        cells in proptest::collection::vec(prop::bool::weighted(0.75), 16 * 12),
        ox in 0i32..16,
        oy in 0i32..12,
        radius in 0u32..10,
    ) {
        let transparency = mask_from(&cells, 16, 12);
        let origin = Position::new(ox, oy);

        let visible = compute_fov(&transparency, origin, radius, FovAlgorithm::SymmetricShadowcast);
        let again = compute_fov(&transparency, origin, radius, FovAlgorithm::SymmetricShadowcast);
        prop_assert_eq!(&visible, &again);
        prop_assert!(visible.get(origin));

        let r2 = (radius * radius) as i32;
        for pos in visible.positions() {
            let (dx, dy) = (pos.x - ox, pos.y - oy);
            prop_assert!(dx * dx + dy * dy <= r2);
        }

        // Symmetric between transparent cells
        if transparency.get(origin) {
            for pos in visible.positions() {
                if pos != origin && transparency.get(pos) {
                    let back = compute_fov(&transparency, pos, radius, FovAlgorithm::SymmetricShadowcast);
                    prop_assert!(back.get(origin), "{:?} sees {:?} but not back", origin, pos);
                }
            }
        }

        let basic = compute_fov(&transparency, origin, radius, FovAlgorithm::Basic);
        prop_assert!(basic.get(origin));
        for pos in basic.positions() {
            let (dx, dy) = (pos.x - ox, pos.y - oy);
            prop_assert!(dx * dx + dy * dy <= r2);
        }
    }

    #[test]
    fn test_open_field_path_is_chebyshev(
        sx in 0i32..20, sy in 0i32..20, gx in 0i32..20, gy in 0i32..20,
    ) {
        let grid = delve::TileGrid::new(20, 20, delve::Tile::floor());
        let field = PathCostField::from_grid(&grid);
        let (start, goal) = (Position::new(sx, sy), Position::new(gx, gy));

        let path = Pathfinder::default().path(&field, start, goal);
        prop_assert_eq!(path.len() as u32, start.chebyshev_distance(goal));
        let mut previous = start;
        for step in &path {
            prop_assert_eq!(previous.chebyshev_distance(*step), 1);
            previous = *step;
        }
    }
}
