//! Audio cues
//!
//! The only sound is a short beep on jump, synthesized with Web Audio on the
//! web and silent elsewhere. Failures never reach gameplay.

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play_jump_cue(&mut self);

    /// Volume in 0.0 - 1.0 (already muted to 0.0 when needed)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Audio sink that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play_jump_cue(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::AudioSink;

    /// Jump beep pitch (Hz)
    const JUMP_FREQ: f32 = 800.0;
    /// Starting gain at full volume
    const JUMP_GAIN: f32 = 0.1;
    const JUMP_LENGTH: f64 = 0.1;

    /// Web Audio output
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 1.0 }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl AudioSink for AudioManager {
        /// Short sine blip with an exponential decay
        fn play_jump_cue(&mut self) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = Self::create_osc(ctx, JUMP_FREQ, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(JUMP_GAIN * self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + JUMP_LENGTH)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + JUMP_LENGTH).ok();
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}
