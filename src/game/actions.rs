//! # Actions Module
//!
//! The moves an agent can make on a floor and the events they produce.
//!
//! Every failure here is an [`DelveError::InvalidAction`]: the action could not
//! happen, nothing changed, and the caller decides whether that costs a turn.

use crate::{DelveError, DelveResult, Direction, EntityId, GameMap, Position};
use log::debug;
use serde::{Deserialize, Serialize};

/// Something an agent does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Pass the turn
    Wait,
    /// Step into an adjacent free cell
    Move(Direction),
    /// Attack whoever stands in the adjacent cell
    Melee(Direction),
    /// Attack if the cell is occupied, otherwise move
    Bump(Direction),
}

/// Notifications for the message log and other observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved {
        agent: EntityId,
        from: Position,
        to: Position,
    },
    Attacked {
        attacker: EntityId,
        target: EntityId,
        damage: i32,
    },
    AgentDied {
        agent: EntityId,
        killer: Option<EntityId>,
    },
    NoLongerConfused {
        agent: EntityId,
    },
    Descended {
        agent: EntityId,
        floor: u32,
    },
    Ascended {
        agent: EntityId,
        floor: u32,
    },
}

/// Damage dealt by a melee blow.
///
/// Full power against an undefended target, otherwise power scaled by
/// `power / defense`, with the multiplier capped at 1.
///
/// # Examples
///
/// ```
/// use delve::melee_damage;
///
/// assert_eq!(melee_damage(5, 0), 5);
/// assert_eq!(melee_damage(5, 10), 2);
/// assert_eq!(melee_damage(5, 5), 5);
/// ```
pub fn melee_damage(power: i32, defense: i32) -> i32 {
    if defense <= 0 || power >= defense {
        return power.max(0);
    }
    // floor(power * power / defense), which stays below power
    let power = i64::from(power.max(0));
    (power * power / i64::from(defense)) as i32
}

impl Action {
    /// Carries out the action for `actor` on `map`.
    pub fn perform(
        self,
        map: &mut GameMap,
        actor: EntityId,
        events: &mut Vec<GameEvent>,
    ) -> DelveResult<()> {
        match self {
            Action::Wait => Ok(()),
            Action::Move(direction) => perform_move(map, actor, direction, events),
            Action::Melee(direction) => perform_melee(map, actor, direction, events),
            Action::Bump(direction) => {
                let destination = map.require_agent(actor)?.position + direction.to_delta();
                if map.agent_at(destination).is_some() {
                    perform_melee(map, actor, direction, events)
                } else {
                    perform_move(map, actor, direction, events)
                }
            }
        }
    }
}

fn perform_move(
    map: &mut GameMap,
    actor: EntityId,
    direction: Direction,
    events: &mut Vec<GameEvent>,
) -> DelveResult<()> {
    let from = map.require_agent(actor)?.position;
    let to = from + direction.to_delta();

    if !map.in_bounds(to) || !map.grid.is_walkable(to) || map.blocking_agent_at(to).is_some() {
        return Err(DelveError::invalid_action("That way is blocked."));
    }

    map.require_agent_mut(actor)?.position = to;
    events.push(GameEvent::Moved {
        agent: actor,
        from,
        to,
    });
    Ok(())
}

fn perform_melee(
    map: &mut GameMap,
    actor: EntityId,
    direction: Direction,
    events: &mut Vec<GameEvent>,
) -> DelveResult<()> {
    let attacker = map.require_agent(actor)?;
    let power = attacker.fighter.power;
    let attacker_name = attacker.name.clone();
    let destination = attacker.position + direction.to_delta();

    let target_id = map
        .agent_at(destination)
        .map(|target| target.id)
        .ok_or_else(|| DelveError::invalid_action("Nothing to attack."))?;

    let target = map.require_agent_mut(target_id)?;
    let damage = melee_damage(power, target.fighter.defense);
    debug!("{} attacks {} for {} hit points", attacker_name, target.name, damage);

    target.last_attacker = Some(actor);
    events.push(GameEvent::Attacked {
        attacker: actor,
        target: target_id,
        damage,
    });

    if damage > 0 && target.fighter.take_damage(damage) {
        target.die();
        events.push(GameEvent::AgentDied {
            agent: target_id,
            killer: Some(actor),
        });
    }

    Ok(())
}
