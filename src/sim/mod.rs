//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick constants only, no wall-clock time
//! - Seeded RNG only (separate stream for cosmetics)
//! - Fixed step order every tick
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod generator;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use effects::{ActiveEffect, EffectSlot};
pub use state::{
    CharacterKind, EndCause, GameEvent, GameState, Obstacle, Particle, Player, Playfield,
    PowerUp, PowerUpKind,
};
pub use tick::{TickInput, TickOutcome, tick};
