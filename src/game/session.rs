//! Session Manager
//!
//! Keeps one [`Game`] per visited level name. Leaving a level keeps its
//! session, so coming back finds enemies and pickups as they were left.
//! Only the player crosses between sessions: health, inventory and (when
//! the destination entry has none) facing carry over.

use std::collections::HashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use crate::input::InputState;
use crate::rasterizer::Vec2;
use crate::world::{LevelError, LevelSource};
use super::event::{LevelRequest, SoundEvent};
use super::player::PlayerSnapshot;
use super::runtime::{Game, TextOverlay, DEFAULT_ENTRY};

/// Result of a level switch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// The named level is now active
    Entered,
    /// The level loaded but has no such entry; nothing changed
    NoEntry,
}

/// Player state that follows the player into another session
struct Carried {
    health: i32,
    inventory: Vec<String>,
    angle: f32,
    overlay: Option<TextOverlay>,
}

pub struct SessionManager<S: LevelSource> {
    source: S,
    start_level: String,
    sessions: HashMap<String, Game>,
    active: Option<String>,
    seed: Option<u64>,
    sessions_created: u64,
}

impl<S: LevelSource> SessionManager<S> {
    /// `seed` makes every session's randomness reproducible; None seeds from entropy
    pub fn new(source: S, start_level: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            source,
            start_level: start_level.into(),
            sessions: HashMap::new(),
            active: None,
            seed,
            sessions_created: 0,
        }
    }

    fn next_rng(&mut self) -> StdRng {
        self.sessions_created += 1;
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.sessions_created)),
            None => StdRng::from_entropy(),
        }
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Game> {
        self.sessions.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Game> {
        self.sessions.get_mut(self.active.as_deref()?)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    /// Switch to `level` at `entry`, building the session on first visit.
    ///
    /// `None` resets: every cached session is dropped and the start level is
    /// rebuilt with a fresh player at its default entry. A failed load leaves
    /// the manager exactly as it was.
    pub fn load_level(&mut self, level: Option<&str>, entry: &str) -> Result<Switch, LevelError> {
        let Some(name) = level else {
            return self.reset();
        };

        if !self.sessions.contains_key(name) {
            let data = self.source.load(name)?;
            let game = Game::new(data, self.next_rng());
            info!(level = name, "new session");
            self.sessions.insert(name.to_string(), game);
        }

        let Some(target) = self.sessions.get(name).and_then(|g| g.entry(entry)) else {
            warn!(level = name, entry, "level has no such entry, staying put");
            return Ok(Switch::NoEntry);
        };

        // Pull what crosses over out of the outgoing session
        let carried = self.active_mut().map(|g| Carried {
            health: g.player.health,
            inventory: g.player.inventory.clone(),
            angle: g.player.angle,
            overlay: g.text_overlay.take(),
        });

        let Some(game) = self.sessions.get_mut(name) else {
            return Ok(Switch::NoEntry);
        };
        game.player.pos = target.pos;
        game.player.vel = Vec2::ZERO;
        game.player.dead = false;
        match carried {
            Some(carried) => {
                game.player.health = carried.health;
                game.player.inventory = carried.inventory;
                game.player.angle = target.angle.unwrap_or(carried.angle);
                if game.text_overlay.is_none() {
                    game.text_overlay = carried.overlay;
                }
            }
            None => {
                if let Some(angle) = target.angle {
                    game.player.angle = angle;
                }
            }
        }
        game.settle_triggers();
        game.events.clear_all();

        info!(level = name, entry, "entered level");
        self.active = Some(name.to_string());
        Ok(Switch::Entered)
    }

    fn reset(&mut self) -> Result<Switch, LevelError> {
        let start = self.start_level.clone();
        let data = self.source.load(&start)?;
        let game = Game::new(data, self.next_rng());

        info!(level = %start, dropped = self.sessions.len(), "resetting to start level");
        self.sessions.clear();
        self.active = None;
        self.sessions.insert(start.clone(), game);
        self.load_level(Some(&start), DEFAULT_ENTRY)
    }

    /// Advance the active session one tick and act on what it asked for.
    /// Returns the sound cues to play.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> Result<Vec<SoundEvent>, LevelError> {
        let Some(game) = self.active_mut() else {
            return Ok(Vec::new());
        };
        game.update(input, dt);
        let sounds: Vec<SoundEvent> = game.events.sounds.drain().collect();
        let requests: Vec<LevelRequest> = game.events.level.drain().collect();

        // One switch per tick; a restart beats anything else queued
        let request = requests
            .iter()
            .find(|r| **r == LevelRequest::Restart)
            .or_else(|| requests.first());
        match request {
            Some(LevelRequest::Restart) => {
                self.load_level(None, DEFAULT_ENTRY)?;
            }
            Some(LevelRequest::Go { level, entry }) => {
                self.load_level(Some(level), entry.as_deref().unwrap_or(DEFAULT_ENTRY))?;
            }
            None => {}
        }
        Ok(sounds)
    }

    /// Player state worth saving, if a session is active
    pub fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.active().map(|g| g.player.snapshot())
    }

    /// Apply a saved snapshot to the active player. False if nothing changed.
    pub fn restore(&mut self, snapshot: &PlayerSnapshot) -> bool {
        let Some(game) = self.active_mut() else {
            return false;
        };
        let applied = game.player.apply_snapshot(snapshot, &game.level.map);
        if !applied {
            warn!(x = snapshot.x, y = snapshot.y, "saved position is not walkable, ignoring");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::game::entity::EntityKind;
    use crate::game::runtime::TICK;
    use crate::rasterizer::Color;
    use crate::world::{LevelData, LevelMap, Params, Special};

    /// In-memory levels, counting loads
    #[derive(Default)]
    struct MemorySource {
        levels: HashMap<String, LevelData>,
        loads: usize,
    }

    impl LevelSource for MemorySource {
        fn load(&mut self, name: &str) -> Result<LevelData, LevelError> {
            self.loads += 1;
            self.levels
                .get(name)
                .cloned()
                .ok_or_else(|| LevelError::Validation(format!("no level {}", name)))
        }
    }

    fn special(x: usize, y: usize, params: serde_json::Value) -> Special {
        let map = params.as_object().cloned().unwrap_or_default();
        let kind = map["type"].as_str().unwrap().to_string();
        Special { x, y, kind, params: Params::new(map) }
    }

    fn level(specials: Vec<Special>) -> LevelData {
        LevelData {
            map: LevelMap::from_ascii(&[
                "##########",
                "#........#",
                "#........#",
                "#........#",
                "##########",
            ]),
            specials,
            sky: Color::BLACK,
            ground: Color::BLACK,
            entry_text: None,
        }
    }

    /// "start" has a door to "cellar" and a pickup; "cellar" has a door back
    fn world() -> MemorySource {
        let mut source = MemorySource::default();
        source.levels.insert("start".into(), level(vec![
            special(1, 2, json!({"type": "entry", "angle": 90})),
            special(3, 1, json!({"type": "entry", "name": "from-cellar"})),
            special(8, 2, json!({"type": "level-transition", "to": "cellar"})),
            special(5, 3, json!({"type": "pickup", "name": "lamp"})),
        ]));
        source.levels.insert("cellar".into(), level(vec![
            special(2, 2, json!({"type": "entry"})),
            special(8, 3, json!({"type": "level-transition", "to": "start", "entry": "from-cellar"})),
            special(6, 1, json!({"type": "zomboid"})),
        ]));
        source
    }

    fn idle() -> InputState {
        InputState::new()
    }

    #[test]
    fn test_reset_builds_start_level() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        assert!(sessions.active().is_none());
        assert_eq!(sessions.load_level(None, DEFAULT_ENTRY).unwrap(), Switch::Entered);

        let game = sessions.active().unwrap();
        assert_eq!(sessions.active_name(), Some("start"));
        assert_eq!(game.player.pos, Vec2::new(1.0, 2.0));
        assert!((game.player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();
        assert!(sessions.load_level(Some("attic"), DEFAULT_ENTRY).is_err());
        assert_eq!(sessions.active_name(), Some("start"));
        assert!(!sessions.is_cached("attic"));

        let mut broken = SessionManager::new(MemorySource::default(), "start", Some(1));
        assert!(broken.load_level(None, DEFAULT_ENTRY).is_err());
        assert!(broken.active().is_none());
    }

    #[test]
    fn test_missing_entry_aborts() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();
        let result = sessions.load_level(Some("cellar"), "nowhere").unwrap();
        assert_eq!(result, Switch::NoEntry);
        assert_eq!(sessions.active_name(), Some("start"));
        // The session was still built and cached
        assert!(sessions.is_cached("cellar"));
    }

    #[test]
    fn test_transition_carries_player_and_keeps_sessions() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();
        {
            let game = sessions.active_mut().unwrap();
            game.player.health = 7;
            // Stand on the pickup, then step onto the door next tick
            game.player.pos = Vec2::new(5.0, 3.0);
        }
        sessions.tick(&idle(), TICK).unwrap();
        sessions.active_mut().unwrap().player.pos = Vec2::new(8.0, 2.0);
        sessions.tick(&idle(), TICK).unwrap();

        assert_eq!(sessions.active_name(), Some("cellar"));
        let game = sessions.active().unwrap();
        assert_eq!(game.player.health, 7);
        assert_eq!(game.player.inventory, vec!["lamp".to_string()]);
        assert_eq!(game.player.pos, Vec2::new(2.0, 2.0));
        // Cellar's entry has no angle: keep the facing from before
        assert!((game.player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_arriving_beside_a_door_does_not_bounce_back() {
        let mut source = MemorySource::default();
        source.levels.insert("a".into(), level(vec![
            special(1, 2, json!({"type": "entry"})),
            special(8, 2, json!({"type": "level-transition", "to": "b"})),
        ]));
        source.levels.insert("b".into(), level(vec![
            special(7, 2, json!({"type": "entry"})),
            special(8, 2, json!({"type": "level-transition", "to": "a"})),
        ]));
        let mut sessions = SessionManager::new(source, "a", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();

        sessions.active_mut().unwrap().player.pos = Vec2::new(8.0, 2.0);
        sessions.tick(&idle(), TICK).unwrap();
        assert_eq!(sessions.active_name(), Some("b"));
        sessions.tick(&idle(), TICK).unwrap();
        assert_eq!(sessions.active_name(), Some("b"));

        // Stepping out and back in still works
        sessions.active_mut().unwrap().player.pos = Vec2::new(4.0, 2.0);
        sessions.tick(&idle(), TICK).unwrap();
        sessions.active_mut().unwrap().player.pos = Vec2::new(8.0, 2.0);
        sessions.tick(&idle(), TICK).unwrap();
        assert_eq!(sessions.active_name(), Some("a"));
    }

    #[test]
    fn test_revisit_keeps_dead_entities_dead() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();
        sessions.load_level(Some("cellar"), DEFAULT_ENTRY).unwrap();
        sessions
            .active_mut()
            .unwrap()
            .entities
            .retain(|e| !matches!(e.kind, EntityKind::Zomboid(_)));

        sessions.load_level(Some("start"), "from-cellar").unwrap();
        assert_eq!(sessions.active().unwrap().player.pos, Vec2::new(3.0, 1.0));
        sessions.load_level(Some("cellar"), DEFAULT_ENTRY).unwrap();

        let cellar = sessions.active().unwrap();
        assert!(!cellar.entities.iter().any(|e| matches!(e.kind, EntityKind::Zomboid(_))));
        // Both levels were loaded exactly once
        assert_eq!(sessions.source.loads, 2);
    }

    #[test]
    fn test_death_resets_everything() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();
        sessions.load_level(Some("cellar"), DEFAULT_ENTRY).unwrap();
        {
            let game = sessions.active_mut().unwrap();
            game.player.inventory.push("lamp".into());
            game.player.health = 1;
            game.player.hurt(&mut game.events);
        }
        sessions.tick(&idle(), TICK).unwrap();

        assert_eq!(sessions.active_name(), Some("start"));
        assert!(!sessions.is_cached("cellar"));
        let game = sessions.active().unwrap();
        assert!(game.player.inventory.is_empty());
        assert_eq!(game.player.health, crate::game::player::MAX_HEALTH);
        assert!(!game.player.dead);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut sessions = SessionManager::new(world(), "start", Some(1));
        assert!(sessions.snapshot().is_none());
        sessions.load_level(None, DEFAULT_ENTRY).unwrap();

        let saved = PlayerSnapshot { x: 4.0, y: 3.0, angle: -1.0 };
        assert!(sessions.restore(&saved));
        assert_eq!(sessions.snapshot(), Some(saved));
        assert!(!sessions.restore(&PlayerSnapshot { x: 0.0, y: 0.0, angle: 0.0 }));
    }
}
