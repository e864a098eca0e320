//! Simulation tick
//!
//! One call advances the whole run by one step, always in the same order:
//! physics, generation, collision and scoring, then effect countdown.

use super::state::{EndCause, GameEvent, GameState, Obstacle};
use super::{collision, generator, particles, physics};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested since the last tick
    pub jump: bool,
    /// Demo mode - the simulation flies itself
    pub autopilot: bool,
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Ended(EndCause),
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if let Some(cause) = state.ended {
        return TickOutcome::Ended(cause);
    }

    state.time_ticks += 1;

    let jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if jump {
        physics::apply_jump(&mut state.player);
        particles::jump_burst(state);
        state.events.push(GameEvent::Jumped);
    }

    physics::step(state);

    generator::recycle_obstacles(state);
    generator::cull_power_ups(state);

    if let Some(cause) = collision::check_hazards(state) {
        end_run(state, cause);
        return TickOutcome::Ended(cause);
    }
    collision::score_passed_obstacles(state);
    collision::collect_power_ups(state);

    if let Some(kind) = state.effect.tick() {
        log::debug!("{} power-up expired", kind.as_str());
        state.events.push(GameEvent::PowerUpExpired(kind));
    }

    particles::ambient(state);

    TickOutcome::Running
}

fn end_run(state: &mut GameState, cause: EndCause) {
    log::debug!("Run ended at tick {} ({:?})", state.time_ticks, cause);
    state.ended = Some(cause);
    particles::game_over_burst(state);
    state.events.push(GameEvent::GameOver(cause));
}

/// The nearest obstacle the player has not yet cleared
fn next_obstacle(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .filter(|o| o.right_edge() >= state.player.pos.x)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
}

/// Jump once falling and the bottom edge nears the lower lip of the next gap.
/// A jump climbs about 114 px, so it is held back until the bottom is within
/// `AUTOPILOT_WINDOW` of the lip; the peak then stays below the upper barrier.
fn autopilot_wants_jump(state: &GameState) -> bool {
    let lip = match next_obstacle(state) {
        Some(obstacle) => obstacle.gap_bottom(),
        None => state.playfield.height * 0.6,
    };
    let player = &state.player;
    player.velocity > 0.0
        && player.bottom() + player.velocity > lip - AUTOPILOT_MARGIN
        && player.bottom() >= lip - AUTOPILOT_WINDOW
}

const AUTOPILOT_MARGIN: f32 = 12.0;
const AUTOPILOT_WINDOW: f32 = 24.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{CharacterKind, Playfield, PowerUp, PowerUpKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(12345, Playfield::new(800.0, 600.0))
    }

    /// Keep the player parked in the middle of every gap, with no pickups around
    fn hold_in_gap(state: &mut GameState) {
        state.power_ups.clear();
        let target = next_obstacle(state)
            .map(|o| o.gap_top + (GAP_SIZE - PLAYER_SIZE) / 2.0)
            .unwrap_or(200.0);
        state.player.pos.y = target;
        state.player.velocity = -GRAVITY;
    }

    #[test]
    fn test_falls_to_floor() {
        let mut s = state();
        let input = TickInput::default();
        let mut ticks = 0;
        while tick(&mut s, &input) == TickOutcome::Running {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(s.ended, Some(EndCause::Boundary));
        assert!(s.events.contains(&GameEvent::GameOver(EndCause::Boundary)));

        // Further ticks do nothing
        let frozen = s.time_ticks;
        assert_eq!(tick(&mut s, &input), TickOutcome::Ended(EndCause::Boundary));
        assert_eq!(s.time_ticks, frozen);
    }

    #[test]
    fn test_jump_event() {
        let mut s = state();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.player.velocity, JUMP_VELOCITY + GRAVITY);
        assert!(s.player.pos.y < 300.0);
        assert_eq!(s.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_ceiling_exit_ends_even_with_shield() {
        let mut s = state();
        s.effect.acquire(PowerUpKind::Shield);
        s.player.pos.y = 5.0;
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut s, &input), TickOutcome::Ended(EndCause::Boundary));
    }

    #[test]
    fn test_shield_survives_pipe() {
        let mut s = state();
        s.effect.acquire(PowerUpKind::Shield);
        s.obstacles[0].x = 100.0;
        s.obstacles[0].gap_top = 100.0;
        s.player.pos.y = 400.0; // below the gap
        s.player.velocity = -GRAVITY;

        assert_eq!(tick(&mut s, &TickInput::default()), TickOutcome::Running);

        s.effect.clear();
        s.player.velocity = -GRAVITY;
        assert_eq!(
            tick(&mut s, &TickInput::default()),
            TickOutcome::Ended(EndCause::Obstacle)
        );
    }

    #[test]
    fn test_scoring_through_ticks() {
        let mut s = state();
        let input = TickInput::default();
        // First obstacle starts at 800; right edge must pass 100 -> ~261 ticks
        let mut ticks = 0;
        while s.score == 0 {
            hold_in_gap(&mut s);
            assert_eq!(tick(&mut s, &input), TickOutcome::Running);
            ticks += 1;
            assert!(ticks < 400);
        }
        assert_eq!(s.score, 1);
        assert_eq!(s.obstacles.iter().filter(|o| o.passed).count(), 1);

        // Keep flying through the next two gaps
        for _ in 0..240 {
            hold_in_gap(&mut s);
            assert_eq!(tick(&mut s, &input), TickOutcome::Running);
        }
        assert!(s.score >= 3);
        let scored = s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .count();
        assert_eq!(scored as u64, s.score);
    }

    #[test]
    fn test_points_pickup_in_tick() {
        let mut s = state();
        s.player.velocity = -GRAVITY;
        let pos = s.player.pos + Vec2::new(BASE_SPEED, 0.0);
        s.power_ups.push(PowerUp::new(pos, PowerUpKind::Points));

        tick(&mut s, &TickInput::default());

        assert_eq!(s.score, POINTS_BONUS);
        assert!(s.power_ups.is_empty());
        // Collected and counted down once within the same tick
        assert_eq!(
            s.effect.active().map(|e| e.remaining_ticks),
            Some(POWER_UP_DURATION_TICKS - 1)
        );
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let mut s = state();
        s.effect.acquire(PowerUpKind::Speed);
        let input = TickInput::default();
        for _ in 0..POWER_UP_DURATION_TICKS - 1 {
            hold_in_gap(&mut s);
            tick(&mut s, &input);
        }
        assert!(s.effect.is_active(PowerUpKind::Speed));
        hold_in_gap(&mut s);
        tick(&mut s, &input);
        assert!(s.effect.active().is_none());
        assert!(s.events.contains(&GameEvent::PowerUpExpired(PowerUpKind::Speed)));
    }

    #[test]
    fn test_autopilot_clears_gaps() {
        let mut s = state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1500 {
            s.power_ups.clear();
            assert_eq!(tick(&mut s, &input), TickOutcome::Running);
        }
        // Passes land at ticks 261, 361, 461, ...
        assert!(s.score >= 12);
    }

    #[test]
    fn test_determinism() {
        let mut a = state();
        let mut b = state();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_character_does_not_change_gameplay() {
        let mut classic = state();
        let mut fire = state().with_character(CharacterKind::Fire);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut classic, &input);
            tick(&mut fire, &input);
        }
        assert_eq!(classic.obstacles, fire.obstacles);
        assert_eq!(classic.power_ups, fire.power_ups);
        assert_eq!(classic.score, fire.score);
        assert_eq!(classic.ended, fire.ended);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_run_invariants(seed in any::<u64>(), jumps in prop::collection::vec(any::<bool>(), 1..600)) {
            let mut s = GameState::new(seed, Playfield::new(800.0, 600.0));
            let mut last_score = 0;
            for jump in jumps {
                let input = TickInput { jump, autopilot: true };
                let outcome = tick(&mut s, &input);

                prop_assert!(s.score >= last_score);
                last_score = s.score;
                prop_assert_eq!(s.obstacles.len(), OBSTACLE_COUNT);
                for o in &s.obstacles {
                    prop_assert!((o.gap_bottom() - o.gap_top - GAP_SIZE).abs() < 1e-3);
                }
                let mut xs: Vec<f32> = s.obstacles.iter().map(|o| o.x).collect();
                xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
                for pair in xs.windows(2) {
                    prop_assert!((pair[1] - pair[0] - OBSTACLE_SPACING).abs() < 1e-2);
                }
                prop_assert_eq!(s.player.pos.x, PLAYER_X);

                if outcome != TickOutcome::Running {
                    break;
                }
            }
        }
    }
}
