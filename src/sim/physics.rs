//! Per-tick movement integration
//!
//! Constants are per tick, so game speed follows the tick rate rather than
//! wall-clock time.

use super::effects::EffectSlot;
use super::state::{GameState, Obstacle, Particle, Player, PowerUp};
use crate::consts::*;

/// Set the jump velocity (replaces, does not add)
pub fn apply_jump(player: &mut Player) {
    player.velocity = JUMP_VELOCITY;
}

/// Gravity, position, and the derived tilt
pub fn step_player(player: &mut Player) {
    player.velocity += GRAVITY;
    player.pos.y += player.velocity;
    player.rotation = (player.velocity * ROTATION_FACTOR).clamp(-MAX_ROTATION, MAX_ROTATION);
}

/// Obstacle scroll speed after the active effect is applied
pub fn obstacle_speed(effect: &EffectSlot) -> f32 {
    BASE_SPEED * effect.scroll_multiplier()
}

pub fn step_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Power-ups always scroll at base speed and keep spinning
pub fn step_power_ups(power_ups: &mut [PowerUp]) {
    for power_up in power_ups {
        power_up.pos.x -= BASE_SPEED;
        power_up.rotation = (power_up.rotation + POWER_UP_SPIN) % 360.0;
    }
}

/// Move particles, apply their gravity, and drop the ones that burned out
pub fn step_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}

pub fn step_background(offset: &mut f32, playfield_width: f32) {
    *offset += BACKGROUND_SPEED;
    if *offset >= playfield_width {
        *offset = 0.0;
    }
}

/// Advance every moving entity by one tick
pub fn step(state: &mut GameState) {
    step_player(&mut state.player);
    let speed = obstacle_speed(&state.effect);
    step_obstacles(&mut state.obstacles, speed);
    step_power_ups(&mut state.power_ups);
    step_particles(&mut state.particles);
    step_background(&mut state.background_offset, state.playfield.width);
}
