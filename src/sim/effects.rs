//! Active power-up effect
//!
//! At most one effect is held at a time. Picking up any power-up replaces the
//! current one and restarts the countdown, including `Points`, which has no
//! per-tick behavior but still occupies the slot for its full duration.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;
use crate::consts::POWER_UP_DURATION_TICKS;

/// The held effect and its remaining duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
}

/// Single-slot effect holder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSlot {
    active: Option<ActiveEffect>,
}

impl EffectSlot {
    /// Take a new effect, returning the kind it replaced
    pub fn acquire(&mut self, kind: PowerUpKind) -> Option<PowerUpKind> {
        let replaced = self.kind();
        self.active = Some(ActiveEffect {
            kind,
            remaining_ticks: POWER_UP_DURATION_TICKS,
        });
        replaced
    }

    /// Count down one tick. Returns the kind that just expired, if any.
    pub fn tick(&mut self) -> Option<PowerUpKind> {
        let effect = self.active.as_mut()?;
        effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
        if effect.remaining_ticks == 0 {
            self.active.take().map(|e| e.kind)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<ActiveEffect> {
        self.active
    }

    pub fn kind(&self) -> Option<PowerUpKind> {
        self.active.map(|e| e.kind)
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Obstacle collisions are ignored while shielded
    pub fn shielded(&self) -> bool {
        self.is_active(PowerUpKind::Shield)
    }

    /// Multiplier applied to obstacle scroll speed
    pub fn scroll_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::Speed) { 0.5 } else { 1.0 }
    }

    /// Remaining duration in 0-1 (0 when nothing is active)
    pub fn remaining_fraction(&self) -> f32 {
        self.active
            .map(|e| e.remaining_ticks as f32 / POWER_UP_DURATION_TICKS as f32)
            .unwrap_or(0.0)
    }
}
