//! Collision detection and scoring
//!
//! Everything is axis-aligned boxes: the player, both barriers of each pipe
//! pair, and the power-up hit boxes.

use glam::Vec2;

use super::generator;
use super::particles;
use super::state::{EndCause, GameEvent, GameState, Obstacle, Player, PowerUpKind};
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Top exit at y < 0, bottom exit once the player's bottom passes the floor
pub fn out_of_bounds(player: &Player, playfield_height: f32) -> bool {
    player.pos.y < 0.0 || player.bottom() > playfield_height
}

/// Horizontal overlap with the pipe column and vertically outside the gap
pub fn hits_obstacle(player: &Player, obstacle: &Obstacle) -> bool {
    let bounds = player.bounds();
    let horizontal = bounds.min.x < obstacle.right_edge() && bounds.max.x > obstacle.x;
    horizontal && (bounds.min.y < obstacle.gap_top || bounds.max.y > obstacle.gap_bottom())
}

/// Check boundary exit and pipe contact. Shield only protects against pipes.
pub fn check_hazards(state: &GameState) -> Option<EndCause> {
    if out_of_bounds(&state.player, state.playfield.height) {
        return Some(EndCause::Boundary);
    }

    let hit = state
        .obstacles
        .iter()
        .any(|o| hits_obstacle(&state.player, o));
    if hit {
        if state.effect.shielded() {
            log::trace!("Shield absorbed obstacle contact");
        } else {
            return Some(EndCause::Obstacle);
        }
    }

    None
}

/// Mark obstacles the player has fully cleared and award one point each.
/// Runs the power-up spawn trial once per newly passed obstacle.
pub fn score_passed_obstacles(state: &mut GameState) -> u32 {
    let player_x = state.player.pos.x;
    let mut passed = 0;

    for i in 0..state.obstacles.len() {
        let obstacle = &mut state.obstacles[i];
        if obstacle.passed || obstacle.right_edge() >= player_x {
            continue;
        }
        obstacle.passed = true;
        let right_edge = obstacle.right_edge();

        state.score += 1;
        passed += 1;
        state.events.push(GameEvent::Scored { score: state.score });
        particles::score_burst(state);

        if let Some(kind) = generator::spawn_trial(state, right_edge) {
            state.events.push(GameEvent::PowerUpSpawned(kind));
        }
    }

    passed
}

/// Collect every power-up overlapping the player
pub fn collect_power_ups(state: &mut GameState) {
    let player_bounds = state.player.bounds();

    for i in 0..state.power_ups.len() {
        let power_up = &mut state.power_ups[i];
        if power_up.collected || !player_bounds.overlaps(&power_up.bounds()) {
            continue;
        }
        power_up.collected = true;
        let kind = power_up.kind;
        let center = power_up.center();

        let replaced = state.effect.acquire(kind);
        if kind == PowerUpKind::Points {
            state.score += POINTS_BONUS;
        }
        log::debug!("Collected {} power-up (replaced {:?})", kind.as_str(), replaced);
        state
            .events
            .push(GameEvent::PowerUpCollected { kind, replaced });
        particles::pickup_burst(state, center);
    }

    state.power_ups.retain(|p| !p.collected);
}
