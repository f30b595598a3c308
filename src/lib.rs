//! # Delve
//!
//! Dungeon generation, field of view and monster decision making for a
//! turn-based roguelike.
//!
//! ## Architecture Overview
//!
//! The crate is the algorithmic core of the game. Rendering, input handling,
//! inventories and saving are left to the embedding application, which reads
//! the grids and masks exposed here and drives turns through [`GameState`].
//!
//! - **Game**: tile grids, floors, agents, actions and the turn driver
//! - **Generation**: room-and-tunnel dungeons, BSP structures and spawn tables
//! - **AI**: hostility resolution and the wander/pursue/retreat/confused state machine
//! - **Utils**: field of view, movement cost fields and pathfinding
//!
//! All randomness flows through a caller-supplied [`rand::rngs::StdRng`], so a
//! seed fully determines a floor and every AI decision made on it.

pub mod ai;
pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use ai::*;
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Action cannot be performed; costs the acting agent nothing but its turn
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A grid was indexed outside its bounds
    #[error("Position ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// An agent or item id did not resolve
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration values cannot produce a floor
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DelveError {
    /// Shorthand for building an [`DelveError::InvalidAction`].
    pub fn invalid_action(message: impl Into<String>) -> Self {
        DelveError::InvalidAction(message.into())
    }

    /// Whether the error is the recoverable "impossible action" kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::DelveError;
    ///
    /// assert!(DelveError::invalid_action("Nothing to attack.").is_recoverable());
    /// assert!(!DelveError::OutOfBounds { x: -1, y: 0 }.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DelveError::InvalidAction(_))
    }
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const DEFAULT_MAP_WIDTH: u32 = 80;

    /// Default map height in tiles
    pub const DEFAULT_MAP_HEIGHT: u32 = 50;

    /// Rooms requested per dungeon floor
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Extra movement cost for a tile occupied by a blocking agent
    pub const CROWDING_PENALTY: u32 = 10;

    /// Cost multiplier for a cardinal step
    pub const CARDINAL_STEP_COST: u32 = 2;

    /// Cost multiplier for a diagonal step
    pub const DIAGONAL_STEP_COST: u32 = 3;

    /// Sight radius of the player
    pub const PLAYER_SIGHT_RADIUS: u32 = 9;

    /// Sight radius of ordinary monsters
    pub const SHORT_SIGHT_RADIUS: u32 = 5;

    /// Upper bound for any rejection-sampling loop
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;
}
