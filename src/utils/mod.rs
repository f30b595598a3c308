//! # Utilities Module
//!
//! Grid algorithms shared by generation and AI: line drawing, field of view,
//! movement cost fields and pathfinding.

pub mod fov;
pub mod math;
pub mod pathing;

pub use fov::*;
pub use math::*;
pub use pathing::*;
