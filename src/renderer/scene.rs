//! Scene building
//!
//! Turns a `GameState` into one triangle list, back to front: sky, clouds,
//! pipes, power-ups, player, particles.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::color::{self, Rgba};
use crate::consts::*;
use crate::sim::{Aabb, CharacterKind, GameState, Obstacle, Player, PowerUp, PowerUpKind};

const CLOUD_COUNT: usize = 5;
const CLOUD_SPACING: f32 = 200.0;
const CIRCLE_SEGMENTS: u32 = 24;
/// Pipe lip overhang and height
const CAP_OVERHANG: f32 = 5.0;
const CAP_HEIGHT: f32 = 30.0;
const EDGE_WIDTH: f32 = 5.0;
const SHIELD_RADIUS: f32 = 30.0;
const SHIELD_WIDTH: f32 = 3.0;

/// Sky colors for a score: hue drifts a little with every point
pub fn sky_colors(score: u64) -> (Rgba, Rgba) {
    let hue = ((score * 10) % 360) as f32;
    (
        color::hsl(200.0 + hue * 0.1, 0.7, 0.8),
        color::hsl(120.0 + hue * 0.1, 0.6, 0.7),
    )
}

/// Left x of cloud `index`. Parallax at half the background speed; the
/// remainder keeps the dividend's sign so clouds slide off the left edge.
pub fn cloud_x(index: usize, background_offset: f32, width: f32) -> f32 {
    (index as f32 * CLOUD_SPACING - background_offset * 0.5) % (width + 100.0)
}

fn character_color(character: CharacterKind) -> Rgba {
    match character {
        CharacterKind::Classic => colors::CLASSIC,
        CharacterKind::Fire => colors::FIRE,
        CharacterKind::Ice => colors::ICE,
        CharacterKind::Electric => colors::ELECTRIC,
    }
}

fn background(state: &GameState, out: &mut Vec<Vertex>) {
    let (top, bottom) = sky_colors(state.score);
    let size = Vec2::new(state.playfield.width, state.playfield.height);
    out.extend(shapes::vertical_gradient(Vec2::ZERO, size, top, bottom));

    for i in 0..CLOUD_COUNT {
        let x = cloud_x(i, state.background_offset, state.playfield.width);
        let y = 50.0 + (i as f32).sin() * 30.0;
        for (dx, r) in [(0.0, 30.0), (25.0, 35.0), (50.0, 30.0)] {
            out.extend(shapes::circle(Vec2::new(x + dx, y), r, colors::CLOUD, CIRCLE_SEGMENTS));
        }
    }
}

/// One barrier with highlight, shadow, and a lip facing the gap
fn pipe(out: &mut Vec<Vertex>, bounds: Aabb, base: Rgba, lip_at_bottom: bool) {
    let size = bounds.max - bounds.min;
    if size.y <= 0.0 {
        return;
    }
    let Vec2 { x, y } = bounds.min;
    out.extend(shapes::rect(bounds.min, size, base));
    out.extend(shapes::rect(
        bounds.min,
        Vec2::new(EDGE_WIDTH, size.y),
        colors::PIPE_HIGHLIGHT,
    ));
    out.extend(shapes::rect(
        Vec2::new(x + size.x - EDGE_WIDTH, y),
        Vec2::new(EDGE_WIDTH, size.y),
        colors::PIPE_SHADOW,
    ));

    let cap_y = if lip_at_bottom { bounds.max.y - CAP_HEIGHT } else { y };
    out.extend(shapes::rect(
        Vec2::new(x - CAP_OVERHANG, cap_y),
        Vec2::new(size.x + 2.0 * CAP_OVERHANG, CAP_HEIGHT),
        base,
    ));
}

fn obstacle(state: &GameState, o: &Obstacle, out: &mut Vec<Vertex>) {
    let base = colors::PIPES[o.color as usize % colors::PIPES.len()];
    pipe(out, o.top_bounds(), base, true);
    pipe(out, o.bottom_bounds(state.playfield), base, false);
}

fn power_up(p: &PowerUp, out: &mut Vec<Vertex>) {
    let half = POWER_UP_SIZE / 2.0;
    let center = p.center();
    match p.kind {
        PowerUpKind::Speed => {
            out.extend(shapes::rotated_rect(
                center,
                p.rotation,
                Vec2::splat(-half),
                Vec2::splat(POWER_UP_SIZE),
                colors::SPEED,
            ));
            // Motion lines
            for dy in [-6.0, 0.0, 6.0] {
                out.extend(shapes::rotated_rect(
                    center,
                    p.rotation,
                    Vec2::new(-8.0, dy - 1.5),
                    Vec2::new(16.0, 3.0),
                    color::WHITE,
                ));
            }
        }
        PowerUpKind::Shield => {
            out.extend(shapes::circle(center, half, colors::SHIELD, CIRCLE_SEGMENTS));
            out.extend(shapes::ring(center, 5.0, 8.0, color::BLACK, CIRCLE_SEGMENTS, false));
        }
        PowerUpKind::Points => {
            out.extend(shapes::circle(center, half, colors::POINTS, CIRCLE_SEGMENTS));
            out.extend(shapes::star(center, 10.0, 4.0, p.rotation, color::WHITE));
        }
    }
}

fn player(state: &GameState, player: &Player, out: &mut Vec<Vertex>) {
    let center = player.center();
    let half = player.size / 2.0;
    let rot = player.rotation;

    if state.effect.shielded() {
        out.extend(shapes::ring(
            center,
            SHIELD_RADIUS - SHIELD_WIDTH / 2.0,
            SHIELD_RADIUS + SHIELD_WIDTH / 2.0,
            colors::SHIELD_RING,
            38,
            true,
        ));
    }

    out.extend(shapes::rotated_rect(
        center,
        rot,
        -half,
        player.size,
        character_color(state.character),
    ));
    if state.character == CharacterKind::Classic {
        out.extend(shapes::rotated_rect(
            center,
            rot,
            Vec2::new(-half.x + 25.0, -5.0),
            Vec2::splat(10.0),
            colors::BEAK,
        ));
    }

    // Eye
    out.extend(shapes::rotated_rect(
        center,
        rot,
        -half + Vec2::splat(5.0),
        Vec2::splat(8.0),
        color::WHITE,
    ));
    out.extend(shapes::rotated_rect(
        center,
        rot,
        -half + Vec2::splat(7.0),
        Vec2::splat(4.0),
        color::BLACK,
    ));
}

/// Build the full frame in playfield pixels
pub fn build_frame(state: &GameState) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    background(state, &mut out);
    for o in &state.obstacles {
        obstacle(state, o, &mut out);
    }
    for p in &state.power_ups {
        power_up(p, &mut out);
    }
    player(state, &state.player, &mut out);
    for p in &state.particles {
        out.extend(shapes::rect(
            p.pos,
            Vec2::splat(p.size),
            color::with_alpha(p.color, p.alpha()),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Particle, Playfield};

    fn state() -> GameState {
        GameState::new(4, Playfield::new(800.0, 600.0))
    }

    #[test]
    fn test_frame_is_triangle_list() {
        let v = build_frame(&state());
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
    }

    #[test]
    fn test_sky_starts_with_score_hue() {
        let mut s = state();
        s.score = 12;
        let v = build_frame(&s);
        let (top, _) = sky_colors(12);
        assert_eq!(v[0].color, top);
        assert_eq!(v[0].position, [0.0, 0.0]);
        // 120 % 360 * 0.1 = 12 degrees of drift
        assert_eq!(sky_colors(12).0, color::hsl(212.0, 0.7, 0.8));
        assert_eq!(sky_colors(36).0, sky_colors(0).0);
    }

    #[test]
    fn test_cloud_parallax() {
        assert_eq!(cloud_x(1, 0.0, 800.0), 200.0);
        assert_eq!(cloud_x(1, 100.0, 800.0), 150.0);
        assert_eq!(cloud_x(4, 0.0, 800.0), 800.0);
        assert_eq!(cloud_x(0, 100.0, 800.0), -50.0);
    }

    #[test]
    fn test_shield_adds_ring() {
        let mut s = state();
        let plain = build_frame(&s).len();
        s.effect.acquire(PowerUpKind::Shield);
        let shielded = build_frame(&s).len();
        assert_eq!(shielded - plain, 19 * 6);
    }

    #[test]
    fn test_particles_fade() {
        let mut s = state();
        s.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            size: 4.0,
            color: color::WHITE,
            life: 15,
            max_life: 60,
        });
        let v = build_frame(&s);
        let last = v.last().unwrap();
        assert!((last.color[3] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_pipes_span_to_gap() {
        let mut s = state();
        s.obstacles = vec![Obstacle::new(200.0, 150.0, 1)];
        let v = build_frame(&s);
        let pipe_color = colors::PIPES[1];
        let ys: Vec<f32> = v
            .iter()
            .filter(|v| v.color == pipe_color)
            .map(|v| v.position[1])
            .collect();
        assert!(ys.contains(&150.0));
        assert!(ys.contains(&330.0));
        assert!(ys.contains(&600.0));
        // Nothing drawn inside the gap in the pipe color
        assert!(ys.iter().all(|&y| y <= 150.0 || y >= 330.0));
    }

    #[test]
    fn test_power_up_glyphs_render() {
        let mut s = state();
        let base = build_frame(&s).len();
        for kind in PowerUpKind::ALL {
            s.power_ups.push(PowerUp::new(Vec2::new(300.0, 300.0), kind));
        }
        assert!(build_frame(&s).len() > base);
    }
}
