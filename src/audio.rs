//! Audio playback using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Cue
//! rate limiting happens in the simulation core; this module only turns an
//! already-approved cue into sound.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::SoundCue;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue emitted by the core
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Jump => self.play_jump(ctx, vol),
            SoundCue::Collect => self.play_collect(ctx, vol),
            SoundCue::Crash => self.play_crash(ctx, vol),
            SoundCue::Ability => self.play_ability(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Fire an oscillator with an exponential fade over `duration` seconds
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        gain_start: f32,
        duration: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let now = ctx.current_time();
        let _ = gain.gain().set_value_at_time(gain_start, now);
        let _ = gain
            .gain()
            .exponential_ramp_to_value_at_time(0.01, now + duration);
        let _ = osc.start_with_when(now);
        let _ = osc.stop_with_when(now + duration);
    }

    /// Jump - short mid-tone blip
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 400.0, OscillatorType::Sine, 0.3 * vol, 0.1);
    }

    /// Gem collected - bright chime
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 800.0, OscillatorType::Sine, 0.3 * vol, 0.2);
    }

    /// Crash - low sawtooth buzz
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 100.0, OscillatorType::Sawtooth, 0.5 * vol, 0.3);
    }

    /// Ability fired or stage gained
    fn play_ability(&self, ctx: &AudioContext, vol: f32) {
        self.blip(ctx, 600.0, OscillatorType::Sine, 0.3 * vol, 0.25);
    }
}
