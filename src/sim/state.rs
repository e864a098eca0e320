//! Game state and core simulation types
//!
//! Everything a single run owns lives here; a fresh `GameState` is a full reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::effects::EffectSlot;
use super::generator;
use crate::color::Rgba;
use crate::consts::*;

/// Visible simulation bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: MAX_PLAYFIELD_WIDTH,
            height: MAX_PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    /// Create a playfield clamped to the supported size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.clamp(1.0, MAX_PLAYFIELD_WIDTH),
            height: height.clamp(1.0, MAX_PLAYFIELD_HEIGHT),
        }
    }

    /// True when the configured gap plus margins no longer fits vertically
    pub fn is_degenerate(&self) -> bool {
        GAP_SIZE + 2.0 * GAP_MARGIN > self.height
    }
}

/// Cosmetic player variant (never affects physics or collision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    Classic,
    Fire,
    Ice,
    Electric,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 4] = [
        CharacterKind::Classic,
        CharacterKind::Fire,
        CharacterKind::Ice,
        CharacterKind::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Classic => "classic",
            CharacterKind::Fire => "fire",
            CharacterKind::Ice => "ice",
            CharacterKind::Electric => "electric",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(CharacterKind::Classic),
            "fire" => Some(CharacterKind::Fire),
            "ice" => Some(CharacterKind::Ice),
            "electric" => Some(CharacterKind::Electric),
            _ => None,
        }
    }
}

/// The player character
///
/// `pos` is the top-left corner. x never changes after spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels/tick, positive is down)
    pub velocity: f32,
    /// Tilt in degrees, derived from velocity
    pub rotation: f32,
}

impl Player {
    /// Spawn at the fixed column, vertically centered
    pub fn spawn(playfield: Playfield) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, playfield.height / 2.0),
            size: Vec2::splat(PLAYER_SIZE),
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// A pipe pair sharing one x and a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the top barrier
    pub gap_top: f32,
    /// Set once when the player clears it
    pub passed: bool,
    /// Palette index, cosmetic only
    pub color: u8,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, color: u8) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
            color,
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Start y of the bottom barrier; the gap size is fixed
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + GAP_SIZE
    }

    /// Top barrier rectangle
    pub fn top_bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::new(self.x, 0.0), Vec2::new(OBSTACLE_WIDTH, self.gap_top))
    }

    /// Bottom barrier rectangle, extending to the playfield floor
    pub fn bottom_bounds(&self, playfield: Playfield) -> Aabb {
        Aabb::from_pos_size(
            Vec2::new(self.x, self.gap_bottom()),
            Vec2::new(OBSTACLE_WIDTH, (playfield.height - self.gap_bottom()).max(0.0)),
        )
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halves obstacle scroll speed
    Speed,
    /// Ignores obstacle collisions (not boundary exits)
    Shield,
    /// One-shot score bonus at pickup
    Points,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Shield, PowerUpKind::Points];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Points => "points",
        }
    }

    /// Label shown by the power-up indicator
    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Slow Down",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Points => "Bonus Points",
        }
    }
}

/// A collectible power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    /// Top-left corner of the hit box
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    /// Cosmetic spin in degrees
    pub rotation: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            rotation: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(POWER_UP_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(POWER_UP_SIZE / 2.0)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgba,
    /// Ticks left
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Opacity fades linearly with remaining life
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Left the playfield through the top or bottom
    Boundary,
    /// Hit a pipe without a shield
    Obstacle,
}

/// Things that happened during a tick, drained by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// An obstacle was passed; carries the new score
    Scored { score: u64 },
    PowerUpSpawned(PowerUpKind),
    /// Carries the kind it replaced, if any
    PowerUpCollected {
        kind: PowerUpKind,
        replaced: Option<PowerUpKind>,
    },
    PowerUpExpired(PowerUpKind),
    GameOver(EndCause),
}

/// Salt separating the cosmetic RNG stream from the gameplay stream
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub playfield: Playfield,
    /// Cosmetic variant
    pub character: CharacterKind,
    pub player: Player,
    /// Always `OBSTACLE_COUNT` long
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Particle cap (0 disables particles)
    pub max_particles: usize,
    pub effect: EffectSlot,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Scroll offset for the background layers
    pub background_offset: f32,
    /// Set when the run is over; further ticks are no-ops
    pub ended: Option<EndCause>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Gameplay randomness (gaps, power-up spawns)
    pub(crate) rng: Pcg32,
    /// Cosmetic randomness (particles, palette-free effects)
    pub(crate) fx_rng: Pcg32,
}

impl GameState {
    /// Create a fresh run: player centered, initial obstacles laid out, nothing active
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        if playfield.is_degenerate() {
            log::warn!(
                "Playfield height {} cannot fit gap {} with margins; clamping gap range",
                playfield.height,
                GAP_SIZE
            );
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = generator::initial_obstacles(&mut rng, playfield);

        Self {
            seed,
            playfield,
            character: CharacterKind::default(),
            player: Player::spawn(playfield),
            obstacles,
            power_ups: Vec::new(),
            particles: Vec::new(),
            max_particles: MAX_PARTICLES,
            effect: EffectSlot::default(),
            score: 0,
            time_ticks: 0,
            background_offset: 0.0,
            ended: None,
            events: Vec::new(),
            rng,
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
        }
    }

    pub fn with_character(mut self, character: CharacterKind) -> Self {
        self.character = character;
        self
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
