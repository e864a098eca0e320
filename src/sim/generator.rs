//! Procedural obstacle and power-up generation
//!
//! All bounds are computed from the playfield passed in (or held by the
//! state), never from a cached size, since the playfield can change between runs.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{GameState, Obstacle, Playfield, PowerUp, PowerUpKind};
use crate::consts::*;

/// Inclusive range for `gap_top`.
///
/// Falls back to a single centered value when the gap and margins do not fit.
pub fn gap_range(playfield: Playfield) -> (f32, f32) {
    let lo = GAP_MARGIN;
    let hi = playfield.height - GAP_SIZE - GAP_MARGIN;
    if hi >= lo {
        (lo, hi)
    } else {
        let centered = ((playfield.height - GAP_SIZE) / 2.0).max(0.0);
        (centered, centered)
    }
}

/// Inclusive range for a spawned power-up's y
pub fn power_up_y_range(playfield: Playfield) -> (f32, f32) {
    let lo = POWER_UP_Y_MARGIN;
    let hi = playfield.height - POWER_UP_Y_MARGIN;
    if hi >= lo {
        (lo, hi)
    } else {
        let centered = ((playfield.height - POWER_UP_SIZE) / 2.0).max(0.0);
        (centered, centered)
    }
}

/// Create an obstacle at `x` with a random gap and cosmetic color
pub fn new_obstacle<R: Rng>(rng: &mut R, x: f32, playfield: Playfield) -> Obstacle {
    let (lo, hi) = gap_range(playfield);
    let gap_top = rng.random_range(lo..=hi);
    let color = rng.random_range(0..OBSTACLE_PALETTE_LEN);
    Obstacle::new(x, gap_top, color)
}

/// The starting row: evenly spaced from the right edge of the playfield
pub fn initial_obstacles<R: Rng>(rng: &mut R, playfield: Playfield) -> Vec<Obstacle> {
    (0..OBSTACLE_COUNT)
        .map(|i| new_obstacle(rng, playfield.width + i as f32 * OBSTACLE_SPACING, playfield))
        .collect()
}

/// Replace every obstacle whose right edge has left the screen with a new one
/// one spacing beyond the current rightmost obstacle. Returns how many were recycled.
pub fn recycle_obstacles(state: &mut GameState) -> usize {
    let mut recycled = 0;

    while let Some(idx) = state.obstacles.iter().position(|o| o.right_edge() < 0.0) {
        state.obstacles.remove(idx);

        let rightmost = state
            .obstacles
            .iter()
            .map(|o| o.x)
            .fold(f32::NEG_INFINITY, f32::max);
        let x = if rightmost.is_finite() {
            rightmost + OBSTACLE_SPACING
        } else {
            state.playfield.width
        };

        let obstacle = new_obstacle(&mut state.rng, x, state.playfield);
        log::debug!("Recycled obstacle to x={} (gap_top={})", x, obstacle.gap_top);
        state.obstacles.push(obstacle);
        recycled += 1;
    }

    recycled
}

/// Drop power-ups that scrolled off the left edge or were collected
pub fn cull_power_ups(state: &mut GameState) {
    state
        .power_ups
        .retain(|p| !p.collected && p.pos.x + POWER_UP_SIZE >= 0.0);
}

/// One Bernoulli trial after an obstacle is passed. On success a power-up of a
/// uniformly chosen kind is placed ahead of that obstacle.
pub fn spawn_trial(state: &mut GameState, obstacle_right_edge: f32) -> Option<PowerUpKind> {
    if !state.rng.random_bool(POWER_UP_SPAWN_CHANCE) {
        return None;
    }

    let (lo, hi) = power_up_y_range(state.playfield);
    let y = state.rng.random_range(lo..=hi);
    let kind = *PowerUpKind::ALL.choose(&mut state.rng)?;
    let pos = Vec2::new(obstacle_right_edge + POWER_UP_SPAWN_OFFSET, y);

    log::debug!("Spawned {} power-up at ({:.0}, {:.0})", kind.as_str(), pos.x, pos.y);
    state.power_ups.push(PowerUp::new(pos, kind));
    Some(kind)
}
