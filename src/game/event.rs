//! Event System
//!
//! Entities never call out of the simulation directly. Anything that has to
//! leave the tick (sound cues for the audio layer, level change requests for
//! the session manager) is queued here and drained after the update.

/// A queue for events of a single type.
/// Events are collected during the tick and drained by the owner.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all simulation events
#[derive(Debug, Default)]
pub struct Events {
    /// Sound cues to play this tick
    pub sounds: EventQueue<SoundEvent>,

    /// Level changes requested this tick
    pub level: EventQueue<LevelRequest>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sound cue heard from `distance` cells away
    pub fn sound(&mut self, cue: SoundCue, distance: f32) {
        self.sounds.send(SoundEvent { cue, distance });
    }

    pub fn clear_all(&mut self) {
        self.sounds.clear();
        self.level.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    PlayerHurt,
    PlayerDeath,
    EnemyHurt,
    EnemyDeath,
    Pickup,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Shoot,
        SoundCue::PlayerHurt,
        SoundCue::PlayerDeath,
        SoundCue::EnemyHurt,
        SoundCue::EnemyDeath,
        SoundCue::Pickup,
    ];

    /// Sound file name inside the sounds directory
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot.wav",
            SoundCue::PlayerHurt => "player-hurt.wav",
            SoundCue::PlayerDeath => "player-death.wav",
            SoundCue::EnemyHurt => "zomboid-hurt.wav",
            SoundCue::EnemyDeath => "zomboid-death.wav",
            SoundCue::Pickup => "pickup.wav",
        }
    }
}

/// A sound cue and how far away it happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    pub cue: SoundCue,
    pub distance: f32,
}

impl SoundEvent {
    /// Playback volume: `min(5 / distance * base, 1)`.
    /// None when too quiet to bother playing.
    pub fn volume(&self, base: f32) -> Option<f32> {
        let vol = (5.0 / self.distance * base).min(1.0);
        if vol.is_nan() || vol < 0.05 {
            return None;
        }
        Some(vol)
    }
}

/// Level change requested from inside the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum LevelRequest {
    /// Player died: reset to the start level
    Restart,
    /// Go to `level`, landing at `entry` (or the default entry)
    Go { level: String, entry: Option<String> },
}
