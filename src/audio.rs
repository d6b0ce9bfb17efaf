//! Sound playback through HTML audio elements
//!
//! Best effort: browsers may refuse to play before a user gesture, and a
//! missing file just logs a warning.

use web_sys::HtmlAudioElement;

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundCue};

/// Audio manager for the game
pub struct AudioManager {
    /// Shot and hole-out effects; a new one cuts off the previous
    current: Option<HtmlAudioElement>,
    /// Celebration fanfare, on its own channel so it overlaps the hole-out sound
    celebration: Option<HtmlAudioElement>,
    /// Element volume, already scaled by master volume and mute
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            current: None,
            celebration: None,
            volume: Settings::default().effective_sfx_volume(),
        }
    }

    /// Take volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_sfx_volume();
    }

    /// Play whatever cue an event carries
    pub fn handle_event(&mut self, event: &GameEvent) {
        if let Some(cue) = event.sound() {
            self.play(cue);
        }
    }

    /// Play a sound cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let slot = match cue {
            SoundCue::BirdieFanfare | SoundCue::ParFanfare | SoundCue::BogeyFanfare => {
                &mut self.celebration
            }
            SoundCue::Hit | SoundCue::HoleOut => &mut self.current,
        };

        if let Some(previous) = slot.take() {
            let _ = previous.pause();
            previous.set_current_time(0.0);
        }

        let audio = match HtmlAudioElement::new_with_src(cue.file()) {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Failed to create audio for {}: {:?}", cue.file(), e);
                return;
            }
        };
        audio.set_volume(vol as f64);
        if let Err(e) = audio.play() {
            log::warn!("Sound play failed for {}: {:?}", cue.file(), e);
        }
        *slot = Some(audio);
    }

    /// Stop everything (e.g. on next hole)
    pub fn stop_all(&mut self) {
        for slot in [&mut self.current, &mut self.celebration] {
            if let Some(audio) = slot.take() {
                let _ = audio.pause();
            }
        }
    }
}
