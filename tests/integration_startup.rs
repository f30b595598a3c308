//! Integration tests to ensure a game can start and run without errors.

use delve::{
    Action, AiConfig, ContentCatalog, DelveError, DelveResult, GameState, GenerationConfig,
    PlayerAction, TileKind,
};
use std::io::Write;

#[test]
fn test_basic_startup() -> DelveResult<()> {
    let state = GameState::new(
        GenerationConfig::new(12345),
        ContentCatalog::standard(),
        AiConfig::default(),
    )?;

    assert_eq!(state.turn_number, 0);
    assert_eq!(state.world.floors.len(), 1);

    let map = state.current_map()?;
    let player = state.player()?;
    assert_eq!(player.position, map.player_start);
    assert_eq!(map.grid.tile(player.position)?.kind, TileKind::SurfaceFloor);
    assert!(map.visible.get(player.position));
    assert!(map.explored.count() >= map.visible.count());

    Ok(())
}

#[test]
fn test_waiting_out_turns() -> DelveResult<()> {
    let mut state = GameState::new(
        GenerationConfig::for_testing(99),
        ContentCatalog::standard(),
        AiConfig::default(),
    )?;

    for _ in 0..20 {
        state.perform_player_action(PlayerAction::Act(Action::Wait))?;
    }
    assert_eq!(state.turn_number, 20);
    Ok(())
}

#[test]
fn test_same_seed_same_world() -> DelveResult<()> {
    let build = || {
        GameState::new(
            GenerationConfig::for_testing(4242),
            ContentCatalog::standard(),
            AiConfig::default(),
        )
    };
    let a = build()?;
    let b = build()?;
    assert_eq!(a.current_map()?.grid, b.current_map()?.grid);
    assert_eq!(a.current_map()?.player_start, b.current_map()?.player_start);
    Ok(())
}

#[test]
fn test_config_loaded_from_file() -> DelveResult<()> {
    let config = GenerationConfig {
        max_rooms: 7,
        ..GenerationConfig::for_testing(2024)
    };
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(serde_json::to_string_pretty(&config)?.as_bytes())?;

    let loaded = GenerationConfig::from_json_file(file.path())?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_invalid_config_file_is_rejected() -> DelveResult<()> {
    let dir = tempfile::tempdir()?;

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "{ not json")?;
    assert!(matches!(
        GenerationConfig::from_json_file(&garbage),
        Err(DelveError::Serde(_))
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        GenerationConfig::from_json_file(&missing),
        Err(DelveError::Io(_))
    ));

    let bad = GenerationConfig {
        room_min_size: 12,
        room_max_size: 4,
        ..GenerationConfig::for_testing(1)
    };
    let result = GameState::new(bad, ContentCatalog::standard(), AiConfig::default());
    assert!(matches!(result, Err(DelveError::InvalidConfig(_))));
    Ok(())
}
