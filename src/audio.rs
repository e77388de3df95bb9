//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! Every call is fire-and-forget: failures are logged or ignored and never
//! reach game state.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types, one per game event that makes noise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct answer - ascending chirp
    Correct,
    /// Wrong answer - descending buzz
    Incorrect,
    /// Asteroid hit - falling triple
    LifeLost,
}

/// Frequency envelope applied over a tone's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// Steps up to 1.25x at the halfway point
    Ascending,
    /// Steps down to 0.75x at the halfway point
    Descending,
    /// Steps down twice: 0.83x at one third, 0.67x at two thirds
    Triple,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game runs fine without it
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, muted: false }
    }

    /// Mute/unmute all audio (driven by the sound setting)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Correct => self.play_tone(ctx, 800.0, 0.2, Envelope::Ascending),
            SoundEffect::Incorrect => self.play_tone(ctx, 200.0, 0.3, Envelope::Descending),
            SoundEffect::LifeLost => self.play_tone(ctx, 300.0, 0.4, Envelope::Triple),
        }
    }

    /// Create an oscillator wired through a gain node
    fn create_osc(
        &self,
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

    /// Synthesize one tone with the given frequency envelope
    fn play_tone(&self, ctx: &AudioContext, freq: f32, duration: f64, envelope: Envelope) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(freq, t).ok();
        match envelope {
            Envelope::Ascending => {
                osc.frequency()
                    .set_value_at_time(freq * 1.25, t + duration * 0.5)
                    .ok();
            }
            Envelope::Descending => {
                osc.frequency()
                    .set_value_at_time(freq * 0.75, t + duration * 0.5)
                    .ok();
            }
            Envelope::Triple => {
                osc.frequency()
                    .set_value_at_time(freq * 0.83, t + duration / 3.0)
                    .ok();
                osc.frequency()
                    .set_value_at_time(freq * 0.67, t + duration * 2.0 / 3.0)
                    .ok();
            }
        }

        gain.gain().set_value_at_time(0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration).ok();
    }
}
