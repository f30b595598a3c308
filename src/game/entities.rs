//! # Entities Module
//!
//! Agents (anything that takes turns) and the items lying on a floor.
//!
//! Templates describe a kind of agent or item. Spawning clones the template
//! into a fresh instance with its own id, so no two entities ever share state.

use crate::{AiProfile, AiState, EntityId, FovAlgorithm, HostilitySet, HostilityTable, Position};
use crate::config::{PLAYER_SIGHT_RADIUS, SHORT_SIGHT_RADIUS};
use crate::new_entity_id;
use serde::{Deserialize, Serialize};

/// Coarse faction tag used for default hostility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Affiliation {
    Player,
    Einsof,
    Neutral,
    /// Plants under the nature faction
    Plants,
    /// Nature consumers that eat plants
    Tier1Consumer,
    /// Nature consumers that eat tier 1
    Tier2Consumer,
    /// Nature consumers that eat tier 2
    Tier3Consumer,
    GenericHostile,
}

impl Affiliation {
    pub fn all() -> [Affiliation; 8] {
        [
            Affiliation::Player,
            Affiliation::Einsof,
            Affiliation::Neutral,
            Affiliation::Plants,
            Affiliation::Tier1Consumer,
            Affiliation::Tier2Consumer,
            Affiliation::Tier3Consumer,
            Affiliation::GenericHostile,
        ]
    }
}

/// Combat statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    pub power: i32,
    pub defense: i32,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32) -> Self {
        Self {
            max_hp: hp,
            hp,
            power,
            defense,
        }
    }

    /// Current health as a fraction of maximum health.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Fighter;
    ///
    /// let mut fighter = Fighter::new(10, 0, 3);
    /// fighter.take_damage(6);
    /// assert!((fighter.health_fraction() - 0.4).abs() < f32::EPSILON);
    /// ```
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp.max(0) as f32 / self.max_hp as f32
    }

    /// Applies damage and reports whether this blow was fatal.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = (self.hp - amount.max(0)).max(0);
        was_alive && self.hp == 0
    }
}

/// How far, and with which algorithm, an agent sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vision {
    pub radius: u32,
    pub algorithm: FovAlgorithm,
}

impl Vision {
    /// Wide, symmetric vision used by the player.
    pub fn player() -> Self {
        Self {
            radius: PLAYER_SIGHT_RADIUS,
            algorithm: FovAlgorithm::SymmetricShadowcast,
        }
    }

    /// Cheap short-range vision used by most monsters.
    pub fn short() -> Self {
        Self {
            radius: SHORT_SIGHT_RADIUS,
            algorithm: FovAlgorithm::Basic,
        }
    }
}

/// Draw layering; later variants are drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// A mobile entity with a position, an affiliation and optionally an AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub color: [u8; 3],
    pub position: Position,
    pub affiliation: Affiliation,
    /// `None` means the agent is neutral and never picks targets
    pub hostility: Option<HostilitySet>,
    pub fighter: Fighter,
    pub vision: Vision,
    pub ai: Option<AiState>,
    /// Lookup-only reference to whoever hit this agent last
    pub last_attacker: Option<EntityId>,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
}

impl Agent {
    pub fn is_alive(&self) -> bool {
        self.fighter.hp > 0
    }

    pub fn health_fraction(&self) -> f32 {
        self.fighter.health_fraction()
    }

    /// Turns the agent into a corpse: no AI, no blocking, drawn beneath everything.
    pub fn die(&mut self) {
        self.fighter.hp = 0;
        self.glyph = '%';
        self.color = [191, 0, 0];
        self.blocks_movement = false;
        self.ai = None;
        self.render_order = RenderOrder::Corpse;
        self.name = format!("remains of {}", self.name);
    }
}

/// A statically defined kind of agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub name: String,
    pub glyph: char,
    pub color: [u8; 3],
    pub affiliation: Affiliation,
    pub fighter: Fighter,
    pub vision: Vision,
    pub ai: Option<AiProfile>,
}

impl AgentTemplate {
    pub fn player() -> Self {
        Self {
            name: "Player".to_string(),
            glyph: '@',
            color: [255, 255, 255],
            affiliation: Affiliation::Player,
            fighter: Fighter::new(30, 1, 2),
            vision: Vision::player(),
            ai: None,
        }
    }

    pub fn orc() -> Self {
        Self {
            name: "Orc".to_string(),
            glyph: 'o',
            color: [63, 127, 63],
            affiliation: Affiliation::GenericHostile,
            fighter: Fighter::new(10, 0, 3),
            vision: Vision::short(),
            ai: Some(AiProfile::Targeting),
        }
    }

    pub fn troll() -> Self {
        Self {
            name: "Troll".to_string(),
            glyph: 'T',
            color: [0, 127, 0],
            affiliation: Affiliation::GenericHostile,
            fighter: Fighter::new(16, 1, 4),
            vision: Vision::short(),
            ai: Some(AiProfile::Targeting),
        }
    }

    /// A skittish monster that runs when badly hurt.
    pub fn kobold() -> Self {
        Self {
            name: "Kobold".to_string(),
            glyph: 'k',
            color: [160, 110, 60],
            affiliation: Affiliation::GenericHostile,
            fighter: Fighter::new(6, 0, 2),
            vision: Vision::short(),
            ai: Some(AiProfile::Retreating {
                health_threshold: 0.5,
                cooldown_ticks: 10,
            }),
        }
    }

    /// Clones the template into a new agent at `position`.
    ///
    /// The hostility set is resolved from `hostilities` at creation time.
    pub fn spawn(&self, position: Position, hostilities: &HostilityTable) -> Agent {
        Agent {
            id: new_entity_id(),
            name: self.name.clone(),
            glyph: self.glyph,
            color: self.color,
            position,
            affiliation: self.affiliation,
            hostility: hostilities.default_for(self.affiliation),
            fighter: self.fighter,
            vision: self.vision,
            ai: self.ai.map(AiState::new),
            last_attacker: None,
            blocks_movement: true,
            render_order: RenderOrder::Actor,
        }
    }
}

/// An item lying on the floor. Item behaviour belongs to the embedding game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub color: [u8; 3],
    pub position: Position,
}

/// A statically defined kind of item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub name: String,
    pub glyph: char,
    pub color: [u8; 3],
}

impl ItemTemplate {
    pub fn new(name: &str, glyph: char, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            glyph,
            color,
        }
    }

    pub fn spawn(&self, position: Position) -> Item {
        Item {
            id: new_entity_id(),
            name: self.name.clone(),
            glyph: self.glyph,
            color: self.color,
            position,
        }
    }
}
