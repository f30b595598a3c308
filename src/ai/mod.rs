//! # AI Module
//!
//! Monster decision making.
//!
//! Each AI-driven agent carries an [`AiState`]: a fixed [`AiProfile`] saying what
//! the agent is capable of and a [`Behavior`] saying what it is doing right now.
//! The [`AiEngine`] turns that state plus the current floor into one action per
//! turn, with a fixed priority: confusion, then retreat, then pursuit, then
//! wandering.

pub mod engine;
pub mod hostility;

pub use engine::*;
pub use hostility::*;

use crate::config::{CARDINAL_STEP_COST, CROWDING_PENALTY, DEFAULT_MAX_ATTEMPTS, DIAGONAL_STEP_COST};
use crate::{DelveError, DelveResult, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Tuning knobs for the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Extra path cost for cells holding a blocking agent
    pub crowding_penalty: u32,
    pub cardinal_step_cost: u32,
    pub diagonal_step_cost: u32,
    /// Chance a wandering agent passes its turn instead of stumbling about
    pub wander_pass_chance: f64,
    /// Sampling budget when looking for a retreat destination
    pub max_retreat_attempts: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            crowding_penalty: CROWDING_PENALTY,
            cardinal_step_cost: CARDINAL_STEP_COST,
            diagonal_step_cost: DIAGONAL_STEP_COST,
            wander_pass_chance: 0.5,
            max_retreat_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> DelveResult<()> {
        if !(0.0..=1.0).contains(&self.wander_pass_chance) {
            return Err(DelveError::InvalidConfig(format!(
                "wander pass chance {} is not a probability",
                self.wander_pass_chance
            )));
        }
        if self.cardinal_step_cost == 0 || self.diagonal_step_cost == 0 {
            return Err(DelveError::InvalidConfig(
                "step costs must be positive".to_string(),
            ));
        }
        if self.max_retreat_attempts == 0 {
            return Err(DelveError::InvalidConfig(
                "retreat sampling needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }
}

/// What kind of AI an agent template is built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiProfile {
    /// Wanders until it sees something hostile, then hunts it
    Targeting,
    /// Targets like [`AiProfile::Targeting`] but flees once badly hurt
    Retreating {
        /// Health fraction at or below which the agent flees
        health_threshold: f32,
        /// Turns a chosen retreat destination is kept before resampling
        cooldown_ticks: u32,
    },
}

/// The mode an agent is in this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Wander,
    Pursue { target: EntityId },
    Retreat { destination: Position },
    Confused { turns_remaining: u32 },
}

/// Per-agent AI memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub profile: AiProfile,
    pub behavior: Behavior,
    /// Behaviour to restore when confusion wears off
    pub previous: Option<Behavior>,
    /// Turns left before a new retreat destination may be drawn
    pub retreat_cooldown: u32,
}

impl AiState {
    pub fn new(profile: AiProfile) -> Self {
        Self {
            profile,
            behavior: Behavior::Wander,
            previous: None,
            retreat_cooldown: 0,
        }
    }

    /// Confuses the agent for `turns` turns.
    ///
    /// Re-confusing an already confused agent only resets the counter; the
    /// behaviour saved by the first confusion is the one restored.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{AiProfile, AiState, Behavior};
    ///
    /// let mut state = AiState::new(AiProfile::Targeting);
    /// state.confuse(3);
    /// assert_eq!(state.behavior, Behavior::Confused { turns_remaining: 3 });
    /// assert_eq!(state.previous, Some(Behavior::Wander));
    /// ```
    pub fn confuse(&mut self, turns: u32) {
        if !self.is_confused() {
            self.previous = Some(self.behavior);
        }
        self.behavior = Behavior::Confused {
            turns_remaining: turns,
        };
    }

    pub fn is_confused(&self) -> bool {
        matches!(self.behavior, Behavior::Confused { .. })
    }

    pub fn can_retreat(&self) -> bool {
        matches!(self.profile, AiProfile::Retreating { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_wanders() {
        let state = AiState::new(AiProfile::Targeting);
        assert_eq!(state.behavior, Behavior::Wander);
        assert!(state.previous.is_none());
        assert!(!state.can_retreat());
    }

    #[test]
    fn test_reconfusing_keeps_original_behavior() {
        let mut state = AiState::new(AiProfile::Retreating {
            health_threshold: 0.5,
            cooldown_ticks: 10,
        });
        state.behavior = Behavior::Retreat {
            destination: Position::new(3, 4),
        };
        state.confuse(2);
        state.confuse(5);
        assert_eq!(
            state.behavior,
            Behavior::Confused { turns_remaining: 5 }
        );
        assert_eq!(
            state.previous,
            Some(Behavior::Retreat {
                destination: Position::new(3, 4)
            })
        );
    }

    #[test]
    fn test_ai_config_validation() {
        assert!(AiConfig::default().validate().is_ok());
        let config = AiConfig {
            wander_pass_chance: 1.5,
            ..AiConfig::default()
        };
        assert!(matches!(config.validate(), Err(DelveError::InvalidConfig(_))));
    }
}
