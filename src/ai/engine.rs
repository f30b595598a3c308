//! # Decision Engine
//!
//! Chooses one action per AI-driven agent per turn.
//!
//! [`AiEngine::decide`] is read-only with respect to the map: it returns the
//! chosen [`Action`] together with the agent's updated [`AiState`].
//! [`AiEngine::take_turn`] stores that state and performs the action.

use crate::{
    compute_fov, Action, Agent, AiConfig, AiProfile, AiState, Behavior, DelveResult, Direction,
    EntityId, GameEvent, GameMap, HostilityResolver, Mask, PathCostField, Pathfinder, Position,
};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// The outcome of one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    /// The agent's AI state after deciding
    pub state: AiState,
    /// Notifications raised by the decision itself, such as confusion wearing off
    pub events: Vec<GameEvent>,
}

impl Decision {
    fn new(action: Action, state: AiState) -> Self {
        Self {
            action,
            state,
            events: Vec::new(),
        }
    }
}

/// Whether a retreating agent should draw a fresh destination this turn.
///
/// # Examples
///
/// ```
/// use delve::needs_new_retreat_destination;
///
/// assert!(!needs_new_retreat_destination(4, false, false));
/// assert!(needs_new_retreat_destination(0, false, false));
/// assert!(needs_new_retreat_destination(4, true, false));
/// assert!(needs_new_retreat_destination(4, false, true));
/// ```
pub fn needs_new_retreat_destination(cooldown: u32, attacker_visible: bool, arrived: bool) -> bool {
    cooldown == 0 || attacker_visible || arrived
}

/// Runs the per-agent behaviour state machine.
#[derive(Debug, Clone, Default)]
pub struct AiEngine {
    pub config: AiConfig,
}

impl AiEngine {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    fn pathfinder(&self) -> Pathfinder {
        Pathfinder::new(self.config.cardinal_step_cost, self.config.diagonal_step_cost)
    }

    /// Decides what agent `id` does this turn.
    ///
    /// Returns `None` for agents without AI and for corpses.
    pub fn decide(
        &self,
        map: &GameMap,
        id: EntityId,
        rng: &mut StdRng,
    ) -> DelveResult<Option<Decision>> {
        let agent = map.require_agent(id)?;
        let Some(state) = agent.ai.clone().filter(|_| agent.is_alive()) else {
            return Ok(None);
        };

        if let Behavior::Confused { turns_remaining } = state.behavior {
            return Ok(Some(self.confused(agent, state, turns_remaining, rng)));
        }

        let visible = compute_fov(
            &map.grid.transparency_mask(),
            agent.position,
            agent.vision.radius,
            agent.vision.algorithm,
        );

        if let AiProfile::Retreating {
            health_threshold,
            cooldown_ticks,
        } = state.profile
        {
            if agent.health_fraction() <= health_threshold {
                return Ok(Some(self.retreat(map, agent, state, cooldown_ticks, &visible, rng)));
            }
        }

        let mut state = state;
        state.retreat_cooldown = 0;

        let hostiles = HostilityResolver::resolve(
            agent,
            map.living_agents().filter(|other| visible.get(other.position)),
        );
        match hostiles.first() {
            Some(&target) => {
                state.behavior = Behavior::Pursue { target };
                let action = self.pursue(map, agent, target);
                Ok(Some(Decision::new(action, state)))
            }
            None => {
                state.behavior = Behavior::Wander;
                Ok(Some(Decision::new(self.wander(rng), state)))
            }
        }
    }

    /// Decides for agent `id`, stores its new state and performs the action.
    pub fn take_turn(
        &self,
        map: &mut GameMap,
        id: EntityId,
        rng: &mut StdRng,
        events: &mut Vec<GameEvent>,
    ) -> DelveResult<()> {
        let Some(decision) = self.decide(map, id, rng)? else {
            return Ok(());
        };
        debug!("{} decides {:?} ({:?})", id, decision.action, decision.state.behavior);

        map.require_agent_mut(id)?.ai = Some(decision.state);
        events.extend(decision.events);
        decision.action.perform(map, id, events)
    }

    fn confused(
        &self,
        agent: &Agent,
        mut state: AiState,
        turns_remaining: u32,
        rng: &mut StdRng,
    ) -> Decision {
        if turns_remaining == 0 {
            state.behavior = state.previous.take().unwrap_or(Behavior::Wander);
            let mut decision = Decision::new(Action::Wait, state);
            decision
                .events
                .push(GameEvent::NoLongerConfused { agent: agent.id });
            return decision;
        }

        state.behavior = Behavior::Confused {
            turns_remaining: turns_remaining - 1,
        };
        Decision::new(Action::Bump(random_direction(rng)), state)
    }

    fn wander(&self, rng: &mut StdRng) -> Action {
        if rng.gen_bool(self.config.wander_pass_chance) {
            Action::Wait
        } else {
            Action::Bump(random_direction(rng))
        }
    }

    fn pursue(&self, map: &GameMap, agent: &Agent, target: EntityId) -> Action {
        let Some(target) = map.agent(target) else {
            return Action::Wait;
        };
        let delta = target.position - agent.position;
        if agent.position.chebyshev_distance(target.position) <= 1 {
            if let Some(direction) = Direction::from_delta(delta) {
                return Action::Melee(direction);
            }
        }
        self.step_towards(map, agent, target.position)
    }

    fn retreat(
        &self,
        map: &GameMap,
        agent: &Agent,
        mut state: AiState,
        cooldown_ticks: u32,
        visible: &Mask,
        rng: &mut StdRng,
    ) -> Decision {
        let attacker = agent
            .last_attacker
            .and_then(|id| map.agent(id))
            .filter(|attacker| attacker.is_alive());
        let attacker_visible = attacker
            .map(|attacker| visible.get(attacker.position))
            .unwrap_or(false);

        let current = match state.behavior {
            Behavior::Retreat { destination } => Some(destination),
            _ => None,
        };
        let arrived = current == Some(agent.position);

        let destination = match current {
            Some(destination)
                if !needs_new_retreat_destination(
                    state.retreat_cooldown,
                    attacker_visible,
                    arrived,
                ) =>
            {
                state.retreat_cooldown -= 1;
                destination
            }
            _ => {
                let from = attacker.map(|attacker| attacker.position);
                match self.sample_retreat_destination(map, agent.position, from, rng) {
                    Some(destination) => {
                        debug!("{} retreats towards {:?}", agent.name, destination);
                        state.retreat_cooldown = cooldown_ticks;
                        destination
                    }
                    None => {
                        warn!("{} found nowhere to retreat to", agent.name);
                        state.behavior = Behavior::Wander;
                        state.retreat_cooldown = 0;
                        return Decision::new(Action::Wait, state);
                    }
                }
            }
        };

        state.behavior = Behavior::Retreat { destination };
        let action = self.step_towards(map, agent, destination);
        Decision::new(action, state)
    }

    /// Draws a walkable cell on the far side of the map from `threat`.
    ///
    /// Each axis is sampled away from the threat (the whole axis when aligned
    /// with it). If the biased draw keeps failing the whole map is tried, and
    /// if that fails too there is nowhere to go.
    fn sample_retreat_destination(
        &self,
        map: &GameMap,
        own: Position,
        threat: Option<Position>,
        rng: &mut StdRng,
    ) -> Option<Position> {
        let full_x = 0..map.width() as i32;
        let full_y = 0..map.height() as i32;
        let (biased_x, biased_y) = match threat {
            Some(threat) => (
                away_from(own.x, threat.x, full_x.clone()),
                away_from(own.y, threat.y, full_y.clone()),
            ),
            None => (full_x.clone(), full_y.clone()),
        };

        let attempts = self.config.max_retreat_attempts;
        sample_walkable(map, own, biased_x, biased_y, attempts, rng).or_else(|| {
            warn!("Biased retreat sampling failed, trying the whole map");
            sample_walkable(map, own, full_x, full_y, attempts, rng)
        })
    }

    fn step_towards(&self, map: &GameMap, agent: &Agent, goal: Position) -> Action {
        let field = PathCostField::build(map, Some(agent.id), self.config.crowding_penalty);
        let path = self.pathfinder().path(&field, agent.position, goal);
        path.first()
            .and_then(|next| Direction::from_delta(*next - agent.position))
            .map(Action::Move)
            .unwrap_or(Action::Wait)
    }
}

fn random_direction(rng: &mut StdRng) -> Direction {
    *Direction::all()
        .choose(rng)
        .unwrap_or(&Direction::North)
}

/// The part of `full` on the opposite side of `own` from `threat`.
fn away_from(own: i32, threat: i32, full: Range<i32>) -> Range<i32> {
    let range = if threat > own {
        full.start..own
    } else if threat < own {
        own + 1..full.end
    } else {
        full.clone()
    };
    if range.is_empty() {
        full
    } else {
        range
    }
}

fn sample_walkable(
    map: &GameMap,
    own: Position,
    xs: Range<i32>,
    ys: Range<i32>,
    attempts: u32,
    rng: &mut StdRng,
) -> Option<Position> {
    if xs.is_empty() || ys.is_empty() {
        return None;
    }
    (0..attempts).find_map(|_| {
        let candidate = Position::new(rng.gen_range(xs.clone()), rng.gen_range(ys.clone()));
        (candidate != own && map.grid.is_walkable(candidate)).then_some(candidate)
    })
}
