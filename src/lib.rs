//! Neo Flappy - an endless side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, collisions, effects)
//! - `game`: Top-level state machine driving the simulation
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Loop driver and platform abstraction
//! - `persistence`: Key/value storage for best score and settings

pub mod audio;
pub mod best_score;
pub mod color;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use best_score::BestScore;
pub use game::{Collaborators, Game, GamePhase};
pub use settings::{Settings, TickMode};

/// Game configuration constants
///
/// Gameplay values are expressed per tick and assume the nominal tick rate.
pub mod consts {
    /// Nominal simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum ticks per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield is clamped to this size
    pub const MAX_PLAYFIELD_WIDTH: f32 = 800.0;
    pub const MAX_PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const GRAVITY: f32 = 0.6;
    /// Velocity assigned on jump (negative is up)
    pub const JUMP_VELOCITY: f32 = -12.0;
    /// Degrees of tilt per unit of vertical velocity
    pub const ROTATION_FACTOR: f32 = 3.0;
    pub const MAX_ROTATION: f32 = 30.0;

    /// Obstacle (pipe pair) defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const GAP_SIZE: f32 = 180.0;
    pub const GAP_MARGIN: f32 = 100.0;
    pub const BASE_SPEED: f32 = 3.0;
    pub const OBSTACLE_COUNT: usize = 3;
    pub const OBSTACLE_SPACING: f32 = 300.0;
    /// Number of cosmetic pipe colors
    pub const OBSTACLE_PALETTE_LEN: u8 = 4;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.3;
    /// Horizontal distance from the scored obstacle's right edge
    pub const POWER_UP_SPAWN_OFFSET: f32 = 50.0;
    pub const POWER_UP_Y_MARGIN: f32 = 50.0;
    /// Degrees per tick
    pub const POWER_UP_SPIN: f32 = 2.0;
    pub const POWER_UP_DURATION_TICKS: u32 = 300;
    pub const POINTS_BONUS: u64 = 5;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const MAX_PARTICLES: usize = 512;

    /// Background scroll (pixels per tick)
    pub const BACKGROUND_SPEED: f32 = 1.0;
}
