//! # Game State Module
//!
//! The turn driver tying the world, the player and the AI together.
//!
//! A turn is: resolve the player's action, let every other living agent act
//! once in turn order, recompute the player's field of view. An action the
//! player cannot perform is handed back as an error and costs no turn.

use crate::{
    create_rng, Action, Agent, AiConfig, AiEngine, ContentCatalog, DelveError, DelveResult,
    EntityId, GameEvent, GameMap, GameWorld, GenerationConfig, Position, StairDirection,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// What the player can do with a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Act(Action),
    TakeStairs(StairDirection),
}

impl From<Action> for PlayerAction {
    fn from(action: Action) -> Self {
        PlayerAction::Act(action)
    }
}

/// Everything needed to play: the world, who the player is and the RNG.
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: GameWorld,
    pub player_id: EntityId,
    /// Completed turns
    pub turn_number: u64,
    pub ai: AiEngine,
    rng: StdRng,
}

impl GameState {
    /// Starts a new game on a freshly generated surface.
    pub fn new(
        config: GenerationConfig,
        content: ContentCatalog,
        ai_config: AiConfig,
    ) -> DelveResult<Self> {
        config.validate()?;
        content.validate()?;
        ai_config.validate()?;

        let mut rng = create_rng(&config);
        let player = content.spawn_player(Position::origin())?;
        let player_id = player.id;

        let mut world = GameWorld::new(config, content);
        world.generate_next_floor(player, &mut rng)?;

        let mut state = Self {
            world,
            player_id,
            turn_number: 0,
            ai: AiEngine::new(ai_config),
            rng,
        };
        state.update_fov()?;
        info!("New game started with seed {}", state.world.config.seed);
        Ok(state)
    }

    /// Wraps an already built floor, mainly for tests and scripted scenarios.
    ///
    /// `player_id` must name an agent on `map`.
    pub fn with_map(
        map: GameMap,
        player_id: EntityId,
        config: GenerationConfig,
        content: ContentCatalog,
        ai_config: AiConfig,
    ) -> DelveResult<Self> {
        map.require_agent(player_id)?;
        let rng = StdRng::seed_from_u64(config.seed);
        let mut world = GameWorld::new(config, content);
        world.floors = vec![map];

        let mut state = Self {
            world,
            player_id,
            turn_number: 0,
            ai: AiEngine::new(ai_config),
            rng,
        };
        state.update_fov()?;
        Ok(state)
    }

    pub fn current_map(&self) -> DelveResult<&GameMap> {
        self.world.require_current_map()
    }

    pub fn current_map_mut(&mut self) -> DelveResult<&mut GameMap> {
        self.world.require_current_map_mut()
    }

    pub fn player(&self) -> DelveResult<&Agent> {
        self.current_map()?.require_agent(self.player_id)
    }

    /// Resolves one player action and, if it succeeded, the rest of the turn.
    ///
    /// Returns the events raised during the turn. An [`DelveError::InvalidAction`]
    /// means nothing happened and the player may try something else.
    pub fn perform_player_action(&mut self, action: PlayerAction) -> DelveResult<Vec<GameEvent>> {
        if !self.player()?.is_alive() {
            return Err(DelveError::invalid_action("You are dead."));
        }

        let mut events = Vec::new();
        match action {
            PlayerAction::Act(action) => {
                let map = self.world.require_current_map_mut()?;
                action.perform(map, self.player_id, &mut events)?;
            }
            PlayerAction::TakeStairs(direction) => {
                self.world
                    .take_stairs(self.player_id, direction, &mut self.rng, &mut events)?;
            }
        }

        self.handle_agent_turns(&mut events)?;
        self.update_fov()?;
        self.turn_number += 1;
        Ok(events)
    }

    /// Lets every living non-player agent on the current floor act once.
    ///
    /// An agent whose action turns out to be impossible just loses its turn;
    /// any other error aborts the turn.
    pub fn handle_agent_turns(&mut self, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        let map = self.world.require_current_map_mut()?;
        for id in map.living_agent_ids() {
            if id == self.player_id || !map.agent(id).map_or(false, |agent| agent.is_alive()) {
                continue;
            }
            match self.ai.take_turn(map, id, &mut self.rng, events) {
                Ok(()) => {}
                Err(err) if err.is_recoverable() => debug!("{} loses its turn: {}", id, err),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Recomputes the player's view of the current floor.
    pub fn update_fov(&mut self) -> DelveResult<()> {
        let player_id = self.player_id;
        self.current_map_mut()?.update_fov(player_id)
    }

    /// Confuses an AI-driven agent for `turns` turns.
    pub fn confuse(&mut self, target: EntityId, turns: u32) -> DelveResult<()> {
        let agent = self.current_map_mut()?.require_agent_mut(target)?;
        match agent.ai.as_mut() {
            Some(ai) => {
                ai.confuse(turns);
                debug!("{} is confused for {} turns", agent.name, turns);
                Ok(())
            }
            None => Err(DelveError::invalid_action("That target cannot be confused.")),
        }
    }
}
