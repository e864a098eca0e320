//! Loop driver
//!
//! Turns display-refresh callbacks into simulation ticks. Every `start` hands
//! out a fresh token; callbacks holding an older token are stale and must stop
//! rescheduling themselves.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, TICK_RATE};
use crate::settings::TickMode;

/// Milliseconds per simulation tick
const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Identifies one run of the driver between `start` and `stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

#[derive(Debug)]
pub struct LoopDriver {
    mode: TickMode,
    generation: u64,
    running: bool,
    accumulator_ms: f64,
    last_time_ms: Option<f64>,
}

impl LoopDriver {
    pub fn new(mode: TickMode) -> Self {
        Self {
            mode,
            generation: 0,
            running: false,
            accumulator_ms: 0.0,
            last_time_ms: None,
        }
    }

    pub fn mode(&self) -> TickMode {
        self.mode
    }

    /// Takes effect on the next frame; pending time is discarded
    pub fn set_mode(&mut self, mode: TickMode) {
        self.mode = mode;
        self.accumulator_ms = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin ticking. Invalidates every token handed out before.
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.running = true;
        self.accumulator_ms = 0.0;
        self.last_time_ms = None;
        log::debug!("Loop driver started (generation {})", self.generation);
        FrameToken(self.generation)
    }

    /// Halt ticking. Outstanding tokens become stale.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Loop driver stopped (generation {})", self.generation);
        }
        self.running = false;
        self.generation += 1;
    }

    /// Whether a frame callback carrying `token` should keep going
    pub fn is_current(&self, token: FrameToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// The token for the active run, if any
    pub fn current(&self) -> Option<FrameToken> {
        self.is_running().then_some(FrameToken(self.generation))
    }

    /// Number of ticks to run for a frame at `now_ms`. Stale tokens get zero.
    pub fn advance(&mut self, token: FrameToken, now_ms: f64) -> u32 {
        if !self.is_current(token) {
            return 0;
        }

        let elapsed_ms = match self.last_time_ms.replace(now_ms) {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DT as f64 * 1000.0),
            None => TICK_MS,
        };

        match self.mode {
            TickMode::PerFrame => 1,
            TickMode::Fixed => {
                self.accumulator_ms += elapsed_ms;
                let mut ticks = 0;
                while self.accumulator_ms >= TICK_MS && ticks < MAX_SUBSTEPS {
                    self.accumulator_ms -= TICK_MS;
                    ticks += 1;
                }
                // Drop the backlog beyond the substep cap
                if ticks == MAX_SUBSTEPS {
                    self.accumulator_ms = self.accumulator_ms.min(TICK_MS);
                }
                ticks
            }
        }
    }
}

impl Default for LoopDriver {
    fn default() -> Self {
        Self::new(TickMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut driver = LoopDriver::new(TickMode::Fixed);
        let token = driver.start();
        assert_eq!(driver.advance(token, 1234.0), 1);
    }

    #[test]
    fn test_fixed_mode_tracks_wall_clock() {
        let mut driver = LoopDriver::new(TickMode::Fixed);
        let token = driver.start();
        let mut total = driver.advance(token, 0.0);
        // One second of 30 Hz frames
        for i in 1..=30 {
            total += driver.advance(token, i as f64 * 1000.0 / 30.0);
        }
        assert!((60..=61).contains(&total), "ran {total} ticks");
    }

    #[test]
    fn test_fixed_mode_caps_long_frames() {
        let mut driver = LoopDriver::new(TickMode::Fixed);
        let token = driver.start();
        driver.advance(token, 0.0);
        // A two-second hitch runs at most the substep cap
        assert_eq!(driver.advance(token, 2000.0), MAX_SUBSTEPS);
        // and does not leave a backlog that keeps the cap pinned
        assert!(driver.advance(token, 2000.0 + TICK_MS) <= 2);
    }

    #[test]
    fn test_per_frame_mode_ignores_elapsed_time() {
        let mut driver = LoopDriver::new(TickMode::PerFrame);
        let token = driver.start();
        assert_eq!(driver.advance(token, 0.0), 1);
        assert_eq!(driver.advance(token, 1.0), 1);
        assert_eq!(driver.advance(token, 500.0), 1);
    }

    #[test]
    fn test_stop_makes_token_stale() {
        let mut driver = LoopDriver::new(TickMode::Fixed);
        let token = driver.start();
        assert!(driver.is_current(token));

        driver.stop();
        assert!(!driver.is_current(token));
        assert_eq!(driver.advance(token, 100.0), 0);
        assert_eq!(driver.current(), None);
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut driver = LoopDriver::new(TickMode::PerFrame);
        let old = driver.start();
        driver.stop();
        let new = driver.start();

        assert_ne!(old, new);
        assert_eq!(driver.advance(old, 16.0), 0);
        assert_eq!(driver.advance(new, 16.0), 1);
        assert_eq!(driver.current(), Some(new));
    }
}
