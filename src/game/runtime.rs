//! Game Runtime
//!
//! One level session: the decoded level, its player, the live entities and
//! the per-frame depth buffer. A session is built once from [`LevelData`],
//! consuming the level's specials, and then advanced one fixed tick at a
//! time with [`Game::update`].

use std::collections::HashMap;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use crate::input::InputState;
use crate::rasterizer::{lookup_sprite, norm_angle, Vec2, WIDTH};
use crate::world::{LevelData, Special};
use super::enemy::{Chaser, Zomboid};
use super::entity::{Entity, EntityId, EntityKind, Others, Spawner, UpdateCtx};
use super::event::{Events, LevelRequest};
use super::pickup::Pickup;
use super::player::Player;
use super::transition::LevelTransition;

/// Simulation rate
pub const TICK_RATE: f32 = 60.0;
pub const TICK: f32 = 1.0 / TICK_RATE;

/// Entry used when none is named
pub const DEFAULT_ENTRY: &str = "default";
/// Seconds the level's entry text stays up
pub const ENTRY_TEXT_TIME: f32 = 8.0;

/// Timed lines of text drawn over the view
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub timer: f32,
    pub lines: Vec<String>,
}

impl TextOverlay {
    pub fn new(timer: f32, lines: Vec<String>) -> Self {
        Self { timer, lines }
    }
}

/// Named spawn point. `angle` is radians; None keeps the player's facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelEntry {
    pub pos: Vec2,
    pub angle: Option<f32>,
}

pub struct Game {
    pub level: LevelData,
    pub player: Player,
    pub entities: Vec<Entity>,
    /// Corrected wall distance per screen column, filled by the renderer
    pub depth_buffer: Vec<f32>,
    pub text_overlay: Option<TextOverlay>,
    pub entries: HashMap<String, LevelEntry>,
    pub events: Events,
    spawner: Spawner,
    rng: StdRng,
}

impl Game {
    pub fn new(mut level: LevelData, rng: StdRng) -> Self {
        let specials = std::mem::take(&mut level.specials);
        let text_overlay = level
            .entry_text
            .clone()
            .map(|lines| TextOverlay::new(ENTRY_TEXT_TIME, lines));

        let mut game = Self {
            level,
            player: Player::new(),
            entities: Vec::new(),
            depth_buffer: vec![f32::INFINITY; WIDTH],
            text_overlay,
            entries: HashMap::new(),
            events: Events::new(),
            spawner: Spawner::new(),
            rng,
        };
        for special in &specials {
            game.handle_special(special);
        }
        game.entities.extend(game.spawner.drain());
        debug!(entities = game.entities.len(), entries = game.entries.len(), "session built");
        game
    }

    /// Turn one level marker into an entry point or entity
    fn handle_special(&mut self, special: &Special) {
        let pos = Vec2::new(special.x as f32, special.y as f32);
        let params = &special.params;

        match special.kind.as_str() {
            "entry" => {
                let name = params.str("name").unwrap_or(DEFAULT_ENTRY).to_string();
                let angle = params.f32("angle").map(|deg| norm_angle(deg.to_radians()));
                self.entries.insert(name, LevelEntry { pos, angle });
            }
            "zomboid" | "enemy" => {
                self.spawner.spawn(pos, EntityKind::Zomboid(Zomboid::new()));
            }
            "chaser" => {
                self.spawner.spawn(pos, EntityKind::Chaser(Chaser::new()));
            }
            "level-transition" => {
                let Some(to) = params.str("to") else {
                    warn!(x = special.x, y = special.y, "level-transition without 'to'");
                    return;
                };
                let transition = LevelTransition::new(
                    to,
                    params.str("entry").map(str::to_string),
                    params.str("requires").map(str::to_string),
                );
                self.spawner.spawn(pos, EntityKind::Transition(transition));
                if let Some(sprite) = params.str("sprite") {
                    self.spawner.spawn(pos, EntityKind::Sprite(lookup_sprite(sprite)));
                }
            }
            "sprite" => {
                let visual = lookup_sprite(params.str("sprite").unwrap_or_default());
                self.spawner.spawn(pos, EntityKind::Sprite(visual));
            }
            "pickup" => {
                let Some(name) = params.str("name") else {
                    warn!(x = special.x, y = special.y, "pickup without 'name'");
                    return;
                };
                let visual = lookup_sprite(params.str("sprite").unwrap_or_default());
                self.spawner.spawn(pos, EntityKind::Pickup(Pickup::new(name, visual)));
            }
            other => {
                warn!(kind = other, x = special.x, y = special.y, "unknown special type");
            }
        }
    }

    /// Advance the session by `dt` seconds.
    ///
    /// Player first, then each live entity once in list order. Entities
    /// spawned during the pass are appended afterwards and first update on
    /// the next tick.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.player.update(input, &self.level.map, &mut self.spawner, &mut self.events, dt);

        for i in 0..self.entities.len() {
            let (before, rest) = self.entities.split_at_mut(i);
            let Some((entity, after)) = rest.split_first_mut() else { break };
            if entity.dead {
                continue;
            }
            let mut ctx = UpdateCtx {
                dt,
                level: &self.level.map,
                player: &mut self.player,
                rng: &mut self.rng,
                events: &mut self.events,
                spawner: &mut self.spawner,
                overlay: &mut self.text_overlay,
            };
            entity.update(&mut ctx, Others::new(before, after));
        }

        self.entities.retain(|e| !e.dead);
        self.entities.extend(self.spawner.drain());

        if self.player.dead {
            self.events.level.send(LevelRequest::Restart);
        }

        if let Some(overlay) = &mut self.text_overlay {
            overlay.timer -= dt;
            if overlay.timer <= 0.0 {
                self.text_overlay = None;
            }
        }
    }

    /// Add an entity directly, outside of a tick
    pub fn spawn(&mut self, pos: Vec2, kind: EntityKind) -> EntityId {
        let id = self.spawner.spawn(pos, kind);
        self.entities.extend(self.spawner.drain());
        id
    }

    /// Sync every transition with the player's current position
    pub fn settle_triggers(&mut self) {
        let player = self.player.pos;
        for entity in &mut self.entities {
            if let EntityKind::Transition(transition) = &mut entity.kind {
                transition.settle(entity.pos, player);
            }
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entry(&self, name: &str) -> Option<LevelEntry> {
        self.entries.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde_json::json;
    use crate::game::enemy::ZomboidState;
    use crate::game::event::SoundCue;
    use crate::game::projectile::Projectile;
    use crate::rasterizer::Color;
    use crate::world::{LevelMap, Params};

    fn level_from(rows: &[&str], specials: Vec<Special>) -> LevelData {
        LevelData {
            map: LevelMap::from_ascii(rows),
            specials,
            sky: Color::BLACK,
            ground: Color::BLACK,
            entry_text: None,
        }
    }

    fn special(x: usize, y: usize, params: serde_json::Value) -> Special {
        let map = params.as_object().cloned().unwrap_or_default();
        let kind = map["type"].as_str().unwrap().to_string();
        Special { x, y, kind, params: Params::new(map) }
    }

    fn room() -> Vec<&'static str> {
        vec![
            "############",
            "#..........#",
            "#..........#",
            "#..........#",
            "############",
        ]
    }

    fn game_with(specials: Vec<Special>) -> Game {
        Game::new(level_from(&room(), specials), StdRng::seed_from_u64(1))
    }

    fn idle() -> InputState {
        InputState::new()
    }

    #[test]
    fn test_specials_become_entries_and_entities() {
        let game = game_with(vec![
            special(1, 1, json!({"type": "entry", "angle": 90})),
            special(2, 2, json!({"type": "entry", "name": "back"})),
            special(5, 2, json!({"type": "zomboid"})),
            special(6, 2, json!({"type": "level-transition", "to": "pit", "sprite": "ladder"})),
            special(7, 2, json!({"type": "pickup", "name": "blue key", "sprite": "blue-key"})),
            special(8, 2, json!({"type": "teapot"})),
            special(9, 2, json!({"type": "level-transition"})),
        ]);

        let entry = game.entry(DEFAULT_ENTRY).unwrap();
        assert_eq!(entry.pos, Vec2::new(1.0, 1.0));
        assert!((entry.angle.unwrap() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(game.entry("back").unwrap().angle, None);

        // zomboid, transition + its sprite, pickup; bad specials skipped
        assert_eq!(game.entities.len(), 4);
        assert!(game.level.specials.is_empty());
    }

    #[test]
    fn test_projectile_hurts_exactly_once() {
        let mut game = game_with(vec![]);
        game.player.pos = Vec2::new(1.0, 2.0);
        let enemy = game.spawn(Vec2::new(9.0, 2.0), EntityKind::Zomboid(Zomboid::new()));
        {
            let Game { spawner, entities, .. } = &mut game;
            Projectile::fire(spawner, Vec2::new(7.5, 2.0), Vec2::new(1.0, 0.0), 0, EntityId::PLAYER);
            entities.extend(spawner.drain());
        }

        game.update(&idle(), TICK);

        let hits = game.events.sounds.iter().filter(|s| s.cue == SoundCue::EnemyHurt).count();
        assert_eq!(hits, 1);
        assert!(!game.entities.iter().any(|e| matches!(e.kind, EntityKind::Projectile(_))));
        match &game.entity(enemy).unwrap().kind {
            EntityKind::Zomboid(z) => assert_eq!(z.health, 2),
            _ => unreachable!(),
        }

        game.update(&idle(), TICK);
        assert_eq!(game.events.sounds.iter().filter(|s| s.cue == SoundCue::EnemyHurt).count(), 1);
    }

    #[test]
    fn test_projectile_skips_owner_and_dying() {
        let mut game = game_with(vec![]);
        game.player.pos = Vec2::new(1.0, 1.0);
        let shooter = game.spawn(Vec2::new(5.0, 3.0), EntityKind::Zomboid(Zomboid::new()));
        let mut dying = Zomboid::new();
        for _ in 0..3 {
            dying.hurt(&mut game.events);
        }
        game.events.clear_all();
        game.spawn(Vec2::new(7.0, 3.0), EntityKind::Zomboid(dying));
        {
            let Game { spawner, entities, .. } = &mut game;
            Projectile::fire(spawner, Vec2::new(5.5, 3.0), Vec2::new(0.0, 0.0), 3, shooter);
            entities.extend(spawner.drain());
        }

        game.update(&idle(), TICK);
        assert!(game.entities.iter().any(|e| matches!(e.kind, EntityKind::Projectile(_))));
        assert!(game.events.sounds.is_empty());
    }

    #[test]
    fn test_enemy_shot_hurts_player() {
        let mut game = game_with(vec![]);
        game.player.pos = Vec2::new(3.0, 2.0);
        let enemy = game.spawn(Vec2::new(9.0, 2.0), EntityKind::Sprite(lookup_sprite("chopper")));
        {
            let Game { spawner, entities, .. } = &mut game;
            Projectile::fire(spawner, Vec2::new(4.0, 2.0), Vec2::ZERO, 3, enemy);
            entities.extend(spawner.drain());
        }
        game.update(&idle(), TICK);
        assert_eq!(game.player.health, 9);
        game.update(&idle(), TICK);
        assert_eq!(game.player.health, 9);
    }

    #[test]
    fn test_pickup_adds_exactly_once() {
        let mut game = game_with(vec![
            special(3, 2, json!({"type": "pickup", "name": "blue key", "sprite": "blue-key"})),
        ]);
        game.player.pos = Vec2::new(3.5, 2.0);

        game.update(&idle(), TICK);
        game.update(&idle(), TICK);

        assert_eq!(game.player.inventory, vec!["blue key".to_string()]);
        assert!(game.entities.is_empty());
        let overlay = game.text_overlay.as_ref().unwrap();
        assert_eq!(overlay.lines, vec!["Picked up blue key".to_string()]);
    }

    #[test]
    fn test_gated_transition_fires_once() {
        let mut game = game_with(vec![special(
            6,
            2,
            json!({"type": "level-transition", "to": "vault", "entry": "door", "requires": "blue key"}),
        )]);
        game.player.pos = Vec2::new(2.0, 2.0);
        game.player.inventory = vec!["blue key".into()];

        game.update(&idle(), TICK);
        assert!(game.events.level.is_empty());

        game.player.pos = Vec2::new(6.0, 2.0);
        game.player.vel = Vec2::new(1.0, 0.0);
        game.update(&idle(), TICK);
        let requests: Vec<_> = game.events.level.drain().collect();
        assert_eq!(requests, vec![LevelRequest::Go { level: "vault".into(), entry: Some("door".into()) }]);
        assert!(game.player.inventory.is_empty());
        assert_eq!(game.player.vel, Vec2::ZERO);
        assert_eq!(game.text_overlay.as_ref().unwrap().lines, vec!["Used blue key".to_string()]);

        // Standing inside does not re-fire
        for _ in 0..10 {
            game.update(&idle(), TICK);
        }
        assert!(game.events.level.is_empty());
    }

    #[test]
    fn test_gated_transition_without_item() {
        let mut game = game_with(vec![special(
            6,
            2,
            json!({"type": "level-transition", "to": "vault", "requires": "blue key"}),
        )]);
        game.player.pos = Vec2::new(6.0, 2.0);
        game.update(&idle(), TICK);
        assert!(game.events.level.is_empty());
        assert_eq!(game.text_overlay.as_ref().unwrap().lines, vec!["You need blue key".to_string()]);

        // Leave, pick the key up, come back: opens
        game.player.pos = Vec2::new(2.0, 2.0);
        game.update(&idle(), TICK);
        game.player.inventory.push("blue key".into());
        game.player.pos = Vec2::new(6.0, 2.0);
        game.update(&idle(), TICK);
        assert_eq!(game.events.level.len(), 1);
    }

    #[test]
    fn test_dead_player_requests_restart() {
        let mut game = game_with(vec![]);
        game.player.pos = Vec2::new(2.0, 2.0);
        game.player.health = 1;
        game.player.hurt(&mut game.events);
        game.update(&idle(), TICK);
        assert!(game.events.level.iter().any(|r| *r == LevelRequest::Restart));
    }

    #[test]
    fn test_overlay_expires() {
        let mut level = level_from(&room(), vec![]);
        level.entry_text = Some(vec!["Welcome".into()]);
        let mut game = Game::new(level, StdRng::seed_from_u64(1));
        assert_eq!(game.text_overlay.as_ref().unwrap().timer, ENTRY_TEXT_TIME);

        for _ in 0..(ENTRY_TEXT_TIME * TICK_RATE) as usize + 2 {
            game.update(&idle(), TICK);
        }
        assert!(game.text_overlay.is_none());
    }

    #[test]
    fn test_spawned_entities_wait_for_next_tick() {
        let mut game = game_with(vec![special(3, 2, json!({"type": "zomboid"}))]);
        game.player.pos = Vec2::new(8.0, 2.0);

        // Close and visible: shooting on the first tick, fires within a second
        let mut shots = 0;
        for _ in 0..70 {
            let before = game.entities.len();
            game.update(&idle(), TICK);
            if game.entities.len() > before {
                shots += 1;
                // Fresh projectile has not moved yet
                let p = game.entities.last().unwrap();
                assert!((p.pos.x - (3.0 + 16.0 * 0.1)).abs() < 1e-3);
            }
        }
        assert!(shots >= 1);
        match &game.entities[0].kind {
            EntityKind::Zomboid(z) => assert_eq!(z.state, ZomboidState::Shooting),
            _ => unreachable!(),
        }
    }
}
