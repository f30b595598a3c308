//! Integration tests for moving between floors.

use delve::{
    AiConfig, ContentCatalog, DelveError, DelveResult, GameEvent, GameState, GenerationConfig,
    PlayerAction, Position, StairDirection, TileKind,
};

fn new_game(seed: u64) -> DelveResult<GameState> {
    GameState::new(
        GenerationConfig::for_testing(seed),
        ContentCatalog::standard(),
        AiConfig::default(),
    )
}

fn place_player(state: &mut GameState, pos: Position) -> DelveResult<()> {
    let player_id = state.player_id;
    state.current_map_mut()?.require_agent_mut(player_id)?.position = pos;
    Ok(())
}

fn downstairs(state: &GameState) -> Position {
    state
        .current_map()
        .expect("current floor")
        .downstairs_location
        .expect("every floor has a way down")
}

#[test]
fn test_descend_from_surface() -> DelveResult<()> {
    let mut state = new_game(98765)?;
    let player_id = state.player_id;
    let stairs = downstairs(&state);

    place_player(&mut state, stairs)?;
    let events = state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down))?;

    assert_eq!(state.world.current_floor, 1);
    assert!(events.contains(&GameEvent::Descended {
        agent: player_id,
        floor: 1
    }));

    let map = state.current_map()?;
    assert_eq!(map.floor, 1);
    assert_eq!(map.upstairs_location, Some(map.player_start));
    assert_eq!(map.grid.tile(map.player_start)?.kind, TileKind::UpStairs);
    assert!(map.rooms[0].inner_contains(map.player_start));
    assert!(state.world.floors[0].agent(player_id).is_none());
    Ok(())
}

#[test]
fn test_stairs_round_trip_reuses_floors() -> DelveResult<()> {
    let mut state = new_game(54321)?;
    let player_id = state.player_id;
    let surface_stairs = downstairs(&state);

    place_player(&mut state, surface_stairs)?;
    state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down))?;
    let floor_one = state.current_map()?.grid.clone();
    let arrival = state.current_map()?.upstairs_location.expect("arrived by stairs");

    // Monsters may have shuffled the player; step back onto the stairs
    place_player(&mut state, arrival)?;
    let events = state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Up))?;
    assert!(events.contains(&GameEvent::Ascended {
        agent: player_id,
        floor: 0
    }));
    assert_eq!(state.world.current_floor, 0);
    assert_eq!(state.player()?.position, surface_stairs);

    state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down))?;
    assert_eq!(state.world.floors.len(), 2);
    assert_eq!(state.current_map()?.grid, floor_one);
    assert_eq!(state.player()?.position, arrival);
    Ok(())
}

#[test]
fn test_no_way_up_from_surface() -> DelveResult<()> {
    let mut state = new_game(7)?;
    let start = state.player()?.position;

    let result = state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Up));
    assert!(result.unwrap_err().is_recoverable());
    assert_eq!(state.turn_number, 0);
    assert_eq!(state.player()?.position, start);
    Ok(())
}

#[test]
fn test_deep_descent() -> DelveResult<()> {
    let mut state = new_game(31337)?;

    for expected in 1..=6u32 {
        let stairs = downstairs(&state);
        place_player(&mut state, stairs)?;
        state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down))?;
        assert_eq!(state.current_map()?.floor, expected);
    }

    for map in &state.world.floors[1..] {
        let stairs = map.downstairs_location.expect("way down");
        let expected_room = &map.rooms[map.rooms.len() - 2];
        assert_eq!(stairs, expected_room.center());
    }
    Ok(())
}

#[test]
fn test_failed_descent_keeps_player_upstairs() -> DelveResult<()> {
    let mut state = new_game(24680)?;
    let player_id = state.player_id;
    let stairs = downstairs(&state);
    place_player(&mut state, stairs)?;

    // Too many large rooms for the map: the next floor cannot be built
    state.world.config = GenerationConfig {
        map_width: 14,
        map_height: 14,
        max_rooms: 10,
        room_min_size: 8,
        room_max_size: 10,
        max_placement_attempts: 50,
        ..state.world.config.clone()
    };

    let result = state.perform_player_action(PlayerAction::TakeStairs(StairDirection::Down));
    assert!(matches!(result, Err(DelveError::GenerationFailed(_))));

    assert_eq!(state.world.current_floor, 0);
    assert_eq!(state.world.floors.len(), 1);
    assert_eq!(state.turn_number, 0);
    let player = state.player()?;
    assert_eq!(player.position, stairs);
    assert!(player.is_alive());
    assert_eq!(
        state.current_map()?.agents.iter().filter(|agent| agent.id == player_id).count(),
        1
    );
    Ok(())
}
