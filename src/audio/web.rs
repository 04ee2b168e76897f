//! Web Audio playback
//!
//! Effects are synthesized with oscillators, so only the music track is a file.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{MUSIC_URL, SoundEffect};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    /// Mirrors the music toggle, which silences everything
    enabled: bool,
    /// Window focus lost
    blurred: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }

        let music = match HtmlAudioElement::new_with_src(MUSIC_URL) {
            Ok(el) => {
                el.set_loop(true);
                Some(el)
            }
            Err(e) => {
                log::warn!("Failed to create music element: {:?}", e);
                None
            }
        };

        let mut manager = Self {
            ctx,
            music,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.3,
            enabled: true,
            blurred: false,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up volume and music changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.enabled = settings.music_enabled;
        self.sync_music();
    }

    /// Window focus changed
    pub fn set_blurred(&mut self, blurred: bool) {
        self.blurred = blurred;
        self.sync_music();
    }

    /// Resume audio after a user gesture (browsers start suspended)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
        self.sync_music();
    }

    fn audible(&self) -> bool {
        self.enabled && !self.blurred
    }

    fn sync_music(&self) {
        let Some(music) = &self.music else { return };
        if self.audible() {
            music.set_volume((self.master_volume * self.music_volume) as f64);
            if music.paused() {
                if let Err(e) = music.play() {
                    log::warn!("Music play failed: {:?}", e);
                }
            }
        } else if !music.paused() {
            if let Err(e) = music.pause() {
                log::warn!("Music pause failed: {:?}", e);
            }
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.audible() {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Fire => self.play_fire(ctx, vol),
            SoundEffect::Hit => self.play_hit(ctx, vol, 1.0),
            SoundEffect::LongShot => self.play_hit(ctx, vol, 1.5),
            SoundEffect::AvoidHit => self.play_avoid_hit(ctx, vol),
            SoundEffect::Win => self.play_win(ctx, vol),
            SoundEffect::Lose => self.play_lose(ctx, vol),
        }
    }

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

    /// Fire - short "bwoe" sweep down
    fn play_fire(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(180.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Hit - "shpwat" splat, pitched up for long shots
    fn play_hit(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 900.0 * pitch, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(900.0 * pitch, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        // Body
        if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }
    }

    /// FRED hit - harsh low buzz
    fn play_avoid_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(110.0, t).ok();
        osc.frequency().set_value_at_time(90.0, t + 0.1).ok();
        osc.frequency().set_value_at_time(110.0, t + 0.2).ok();
        osc.frequency().set_value_at_time(70.0, t + 0.3).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Win - rising fanfare
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Lose - sad descending
    fn play_lose(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
