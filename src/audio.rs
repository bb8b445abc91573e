//! Sound playback
//!
//! Plays the cues the simulation emits through macroquad's audio module.
//! Cues whose file failed to load are skipped silently after one warning.

use std::collections::HashMap;
use std::path::Path;
use macroquad::audio::{load_sound, play_sound, PlaySoundParams, Sound};
use tracing::{info, trace, warn};
use crate::game::{SoundCue, SoundEvent};

pub struct SoundBank {
    sounds: HashMap<SoundCue, Sound>,
    /// Scales every cue before the distance falloff
    pub base_volume: f32,
}

impl SoundBank {
    /// Load one file per cue from `dir`
    pub async fn load(dir: &Path) -> Self {
        let mut sounds = HashMap::new();
        for cue in SoundCue::ALL {
            let path = dir.join(cue.file_name());
            match load_sound(&path.to_string_lossy()).await {
                Ok(sound) => {
                    sounds.insert(cue, sound);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = ?e, "failed to load sound");
                }
            }
        }
        info!(loaded = sounds.len(), total = SoundCue::ALL.len(), "sounds loaded");
        Self { sounds, base_volume: 1.0 }
    }

    pub fn play(&self, event: &SoundEvent) {
        let Some(volume) = event.volume(self.base_volume) else {
            trace!(cue = ?event.cue, distance = event.distance, "too quiet, dropped");
            return;
        };
        if let Some(sound) = self.sounds.get(&event.cue) {
            play_sound(sound, PlaySoundParams { looped: false, volume });
        }
    }
}
