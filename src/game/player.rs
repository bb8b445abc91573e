//! Player
//!
//! Tank-style movement with velocity and friction, a shot cooldown, health
//! and a string inventory. The player lives outside the entity list so every
//! behavior can reach it directly.

use serde::{Deserialize, Serialize};
use tracing::info;
use crate::input::{Action, InputState};
use crate::rasterizer::{norm_angle, Vec2};
use crate::world::LevelMap;
use super::collision::move_and_slide;
use super::entity::{EntityId, Spawner};
use super::event::{Events, SoundCue};
use super::projectile::Projectile;

pub const MAX_HEALTH: i32 = 10;
/// Acceleration per held move key, cells/s²
pub const MOVE_SPEED: f32 = 180.0;
pub const FRICTION: f32 = 10.0;
/// Radians per second
pub const ROTATE_SPEED: f32 = 3.5;
pub const SHOOT_COOLDOWN: f32 = 0.5;
pub const PROJECTILE_SPEED: f32 = 20.0;
/// Orbs row for player shots
pub const PROJECTILE_TAG: u32 = 0;

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians, 0 faces -y
    pub angle: f32,
    pub health: i32,
    pub inventory: Vec<String>,
    pub shoot_timeout: f32,
    pub dead: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            health: MAX_HEALTH,
            inventory: Vec::new(),
            shoot_timeout: 0.0,
            dead: false,
        }
    }

    pub fn update(
        &mut self,
        input: &InputState,
        level: &LevelMap,
        spawner: &mut Spawner,
        events: &mut Events,
        dt: f32,
    ) {
        if self.dead {
            return;
        }

        if input.is_down(Action::TurnLeft) {
            self.angle = norm_angle(self.angle - ROTATE_SPEED * dt);
        }
        if input.is_down(Action::TurnRight) {
            self.angle = norm_angle(self.angle + ROTATE_SPEED * dt);
        }

        // Intent in view space: -y forward, +x right
        let mut intent = Vec2::ZERO;
        if input.is_down(Action::StrafeLeft) { intent.x -= MOVE_SPEED; }
        if input.is_down(Action::StrafeRight) { intent.x += MOVE_SPEED; }
        if input.is_down(Action::MoveForward) { intent.y -= MOVE_SPEED; }
        if input.is_down(Action::MoveBackward) { intent.y += MOVE_SPEED; }

        self.vel = self.vel + intent.rotate(self.angle) * dt;
        self.vel = self.vel - self.vel * (FRICTION * dt);

        if input.is_down(Action::Fire) && self.shoot_timeout <= 0.0 {
            let vel = Vec2::from_angle(self.angle) * PROJECTILE_SPEED;
            Projectile::fire(spawner, self.pos, vel, PROJECTILE_TAG, EntityId::PLAYER);
            self.shoot_timeout = SHOOT_COOLDOWN;
            events.sound(SoundCue::Shoot, 0.0);
        }
        self.shoot_timeout -= dt;

        move_and_slide(level, &mut self.pos, self.vel.x * dt, self.vel.y * dt);
    }

    /// Take one point of damage
    pub fn hurt(&mut self, events: &mut Events) {
        if self.dead {
            return;
        }
        self.health -= 1;
        if self.health <= 0 {
            self.dead = true;
            self.health = MAX_HEALTH;
            info!("player died");
            events.sound(SoundCue::PlayerDeath, 0.0);
        } else {
            events.sound(SoundCue::PlayerHurt, 0.0);
        }
    }

    /// Remove one copy of `name`. False if the player has none.
    pub fn take_item(&mut self, name: &str) -> bool {
        match self.inventory.iter().position(|item| item == name) {
            Some(i) => {
                self.inventory.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            x: self.pos.x,
            y: self.pos.y,
            angle: self.angle,
        }
    }

    /// Put the player where a snapshot says. Refuses spots inside walls.
    pub fn apply_snapshot(&mut self, snapshot: &PlayerSnapshot, level: &LevelMap) -> bool {
        if !snapshot.x.is_finite() || !snapshot.y.is_finite() || level.collides(snapshot.x, snapshot.y) {
            return false;
        }
        self.pos = Vec2::new(snapshot.x, snapshot.y);
        self.vel = Vec2::ZERO;
        if snapshot.angle.is_finite() {
            self.angle = norm_angle(snapshot.angle);
        }
        true
    }
}

/// Where the player stood, saved periodically and restored on startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::EntityKind;

    fn open_room() -> LevelMap {
        LevelMap::from_ascii(&[
            "##########",
            "#........#",
            "#........#",
            "#........#",
            "#........#",
            "##########",
        ])
    }

    #[test]
    fn test_forward_moves_toward_facing() {
        let level = open_room();
        let mut player = Player::new();
        player.pos = Vec2::new(5.0, 4.0);
        let mut spawner = Spawner::new();
        let mut events = Events::new();
        let input = InputState::from_actions(&[Action::MoveForward]);

        for _ in 0..10 {
            player.update(&input, &level, &mut spawner, &mut events, 1.0 / 60.0);
        }
        assert!(player.pos.y < 4.0, "angle 0 faces -y");
        assert!((player.pos.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let level = open_room();
        let mut player = Player::new();
        player.pos = Vec2::new(5.0, 3.0);
        let mut spawner = Spawner::new();
        let mut events = Events::new();
        let input = InputState::from_actions(&[Action::Fire]);

        // 0.5s at 60Hz: one shot, the cooldown blocks the rest
        for _ in 0..30 {
            player.update(&input, &level, &mut spawner, &mut events, 1.0 / 60.0);
        }
        let shots: Vec<_> = spawner.drain().collect();
        assert_eq!(shots.len(), 1);
        match &shots[0].kind {
            EntityKind::Projectile(p) => assert_eq!(p.owner, EntityId::PLAYER),
            other => panic!("expected projectile, got {:?}", other),
        }
        // Spawned a tenth of a second along its path
        assert!((shots[0].pos.y - 1.0).abs() < 1e-4);
        assert_eq!(events.sounds.len(), 1);

        // Cooldown runs out within the next two ticks
        for _ in 0..2 {
            player.update(&input, &level, &mut spawner, &mut events, 1.0 / 60.0);
        }
        assert_eq!(spawner.pending(), 1);
    }

    #[test]
    fn test_death_resets_health() {
        let mut player = Player::new();
        let mut events = Events::new();
        for _ in 0..MAX_HEALTH {
            player.hurt(&mut events);
        }
        assert!(player.dead);
        assert_eq!(player.health, MAX_HEALTH);
        // Already dead: further hits are ignored
        player.hurt(&mut events);
        assert_eq!(events.sounds.len(), MAX_HEALTH as usize);
    }

    #[test]
    fn test_take_item_removes_one_copy() {
        let mut player = Player::new();
        player.inventory = vec!["key".into(), "key".into()];
        assert!(player.take_item("key"));
        assert_eq!(player.inventory, vec!["key".to_string()]);
        assert!(player.take_item("key"));
        assert!(!player.take_item("key"));
    }

    #[test]
    fn test_snapshot_skips_walls() {
        let level = open_room();
        let mut player = Player::new();
        let good = PlayerSnapshot { x: 3.0, y: 2.0, angle: 1.0 };
        assert!(player.apply_snapshot(&good, &level));
        assert_eq!(player.snapshot(), good);

        let in_wall = PlayerSnapshot { x: 0.0, y: 0.0, angle: 0.0 };
        assert!(!player.apply_snapshot(&in_wall, &level));
        assert_eq!(player.pos, Vec2::new(3.0, 2.0));
    }
}
