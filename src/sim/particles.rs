//! Particle emitters
//!
//! Purely cosmetic. All randomness comes from the cosmetic RNG stream so
//! emitting particles never shifts gameplay rolls.

use glam::Vec2;
use rand::Rng;

use super::state::{CharacterKind, GameState, Particle};
use crate::color::{self, Rgba};

/// Parameters for a burst of identical-looking particles
struct Burst {
    count: u32,
    origin: Vec2,
    /// Random offset added to the origin, per axis in [0, spread)
    spread: Vec2,
    vx: (f32, f32),
    vy: (f32, f32),
    size: (f32, f32),
    life: u32,
    color: Rgba,
}

/// Uniform sample in [lo, hi), or `lo` when the range is empty
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

fn push_capped(state: &mut GameState, particle: Particle) {
    if state.max_particles == 0 {
        return;
    }
    state.particles.push(particle);
    let overflow = state.particles.len().saturating_sub(state.max_particles);
    if overflow > 0 {
        state.particles.drain(..overflow);
    }
}

fn emit(state: &mut GameState, burst: Burst) {
    for _ in 0..burst.count {
        let rng = &mut state.fx_rng;
        let pos = burst.origin
            + Vec2::new(
                uniform(rng, 0.0, burst.spread.x),
                uniform(rng, 0.0, burst.spread.y),
            );
        let particle = Particle {
            pos,
            vel: Vec2::new(
                uniform(rng, burst.vx.0, burst.vx.1),
                uniform(rng, burst.vy.0, burst.vy.1),
            ),
            size: uniform(rng, burst.size.0, burst.size.1),
            color: burst.color,
            life: burst.life,
            max_life: burst.life,
        };
        push_capped(state, particle);
    }
}

/// Puff under the player on jump
pub fn jump_burst(state: &mut GameState) {
    let origin = Vec2::new(state.player.pos.x, state.player.bottom());
    emit(
        state,
        Burst {
            count: 5,
            origin,
            spread: Vec2::ZERO,
            vx: (-2.0, 2.0),
            vy: (1.0, 3.0),
            size: (2.0, 6.0),
            life: 30,
            color: color::WHITE,
        },
    );
}

/// Green sparkle when an obstacle is passed
pub fn score_burst(state: &mut GameState) {
    let origin = state.player.center();
    emit(
        state,
        Burst {
            count: 10,
            origin,
            spread: Vec2::ZERO,
            vx: (-3.0, 3.0),
            vy: (-3.0, 3.0),
            size: (1.0, 4.0),
            life: 60,
            color: color::hex(0x00ff00),
        },
    );
}

/// Magenta pop where a power-up was collected
pub fn pickup_burst(state: &mut GameState, at: Vec2) {
    emit(
        state,
        Burst {
            count: 15,
            origin: at,
            spread: Vec2::ZERO,
            vx: (-4.0, 4.0),
            vy: (-4.0, 4.0),
            size: (2.0, 6.0),
            life: 40,
            color: color::hex(0xff00ff),
        },
    );
}

/// Red debris on collision
pub fn game_over_burst(state: &mut GameState) {
    let origin = state.player.center();
    emit(
        state,
        Burst {
            count: 20,
            origin,
            spread: Vec2::ZERO,
            vx: (-5.0, 5.0),
            vy: (-5.0, 5.0),
            size: (2.0, 6.0),
            life: 60,
            color: color::hex(0xff0000),
        },
    );
}

/// Confetti across the whole playfield for a new best score
pub fn celebration_burst(state: &mut GameState) {
    for _ in 0..50 {
        let rng = &mut state.fx_rng;
        let particle = Particle {
            pos: Vec2::new(
                uniform(rng, 0.0, state.playfield.width),
                uniform(rng, 0.0, state.playfield.height),
            ),
            vel: Vec2::new(uniform(rng, -3.0, 3.0), uniform(rng, -3.0, 3.0)),
            size: uniform(rng, 2.0, 8.0),
            color: color::hsl(uniform(rng, 0.0, 360.0), 1.0, 0.5),
            life: 120,
            max_life: 120,
        };
        push_capped(state, particle);
    }
}

/// Per-character trail, rolled once per tick
pub fn ambient(state: &mut GameState) {
    let player = &state.player;
    let (chance, burst) = match state.character {
        CharacterKind::Classic => return,
        CharacterKind::Fire => (
            0.3,
            Burst {
                count: 1,
                origin: Vec2::new(player.pos.x - 10.0, player.pos.y),
                spread: Vec2::new(0.0, player.size.y),
                vx: (-4.0, -1.0),
                vy: (-1.0, 1.0),
                size: (1.0, 4.0),
                life: 20,
                color: color::hex(0xff4500),
            },
        ),
        CharacterKind::Ice => (
            0.2,
            Burst {
                count: 1,
                origin: player.pos,
                spread: player.size,
                vx: (-1.0, 1.0),
                vy: (-3.0, -1.0),
                size: (1.0, 3.0),
                life: 30,
                color: color::WHITE,
            },
        ),
        CharacterKind::Electric => (
            0.4,
            Burst {
                count: 1,
                origin: player.pos,
                spread: player.size,
                vx: (-2.0, 2.0),
                vy: (-2.0, 2.0),
                size: (1.0, 1.0),
                life: 10,
                color: color::hex(0xffff00),
            },
        ),
    };

    if state.fx_rng.random_bool(chance) {
        emit(state, burst);
    }
}
