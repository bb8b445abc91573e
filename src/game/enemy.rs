//! Enemies
//!
//! Two hostile behaviors share the same shape: a small state machine driven
//! by distance to the player, a health pool, and a dying state that plays
//! out before the entity is removed.
//!
//! - [`Zomboid`] needs line of sight. It wanders toward the player and
//!   shoots when close.
//! - [`Chaser`] ignores walls for sensing. It closes in to mid range, then
//!   stands and lobs slow shots.

use rand::Rng;
use crate::rasterizer::{Animation, Frame, SheetId, Vec2};
use super::collision::move_and_slide;
use super::entity::{EntityId, Fate, UpdateCtx};
use super::event::{Events, SoundCue};
use super::projectile::Projectile;

/// Orbs row used for enemy shots
pub const ENEMY_PROJECTILE_TAG: u32 = 3;

// =============================================================================
// Zomboid
// =============================================================================

pub mod zomboid {
    pub const HEALTH: i32 = 3;
    pub const WALK_SPEED: f32 = 3.0;
    pub const PROJECTILE_SPEED: f32 = 16.0;
    /// Starts shooting inside this range
    pub const SHOOT_RANGE: f32 = 20.0;
    /// Idle notices the player inside this range
    pub const NOTICE_RANGE: f32 = 35.0;
    /// Walking gives up beyond this range
    pub const GIVE_UP_RANGE: f32 = 40.0;
    /// Shooting goes back to walking beyond this range
    pub const CHASE_RANGE: f32 = 30.0;
    pub const DEATH_TIME: f32 = 5.0;
    /// Sound travels worse around corners
    pub const OCCLUDED_AUDIO_FACTOR: f32 = 2.5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZomboidState {
    Idle,
    Walking,
    Shooting,
    Dying,
}

#[derive(Debug, Clone)]
pub struct Zomboid {
    pub state: ZomboidState,
    pub health: i32,
    timer: f32,
    audio_distance: f32,
    walk: Animation,
    death: Animation,
}

impl Default for Zomboid {
    fn default() -> Self {
        Self::new()
    }
}

impl Zomboid {
    pub fn new() -> Self {
        Self {
            state: ZomboidState::Idle,
            health: zomboid::HEALTH,
            timer: 0.0,
            audio_distance: 0.0,
            walk: Animation::new(SheetId::Zomboid, 4.0, &[(0, 0), (0, 1), (0, 2), (0, 3)]),
            death: Animation::new(
                SheetId::Zomboid, 4.0, &[(1, 0), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5)]),
        }
    }

    pub fn is_dying(&self) -> bool {
        self.state == ZomboidState::Dying
    }

    pub fn frame(&self) -> Frame {
        match self.state {
            ZomboidState::Idle => Frame::new(SheetId::Zomboid, 0, 5),
            ZomboidState::Shooting => Frame::new(SheetId::Zomboid, 0, 4),
            ZomboidState::Walking => self.walk.frame(),
            ZomboidState::Dying => self.death.frame(),
        }
    }

    pub(super) fn update(&mut self, id: EntityId, pos: &mut Vec2, ctx: &mut UpdateCtx) -> Fate {
        use zomboid::*;

        if self.state == ZomboidState::Dying {
            // Hold the last frame of the death animation
            if !self.death.is_last_frame() {
                self.death.update(ctx.dt);
            }
            self.timer -= ctx.dt;
            return if self.timer <= 0.0 { Fate::Die } else { Fate::Live };
        }

        let to_player = ctx.player.pos - *pos;
        let dist = to_player.len();
        let visible = ctx.level.raycast(pos.x, pos.y, to_player.x, to_player.y, dist).is_none();
        self.audio_distance = if visible { dist } else { dist * OCCLUDED_AUDIO_FACTOR };

        match self.state {
            ZomboidState::Idle => {
                if !visible {
                    return Fate::Live;
                }
                if dist < SHOOT_RANGE {
                    self.state = ZomboidState::Shooting;
                    self.timer = ctx.rng.gen::<f32>();
                } else if dist < NOTICE_RANGE {
                    self.state = ZomboidState::Walking;
                }
            }
            ZomboidState::Walking => {
                if !visible {
                    self.state = ZomboidState::Idle;
                    return Fate::Live;
                }
                self.walk.update(ctx.dt);
                let step = to_player.normalize() * (WALK_SPEED * ctx.dt);
                move_and_slide(ctx.level, pos, step.x, step.y);

                if dist > GIVE_UP_RANGE {
                    self.state = ZomboidState::Idle;
                } else if dist < SHOOT_RANGE {
                    self.state = ZomboidState::Shooting;
                    self.timer = ctx.rng.gen::<f32>() + 0.5;
                }
            }
            ZomboidState::Shooting => {
                if !visible {
                    self.state = ZomboidState::Idle;
                    return Fate::Live;
                }
                if dist > CHASE_RANGE {
                    self.state = ZomboidState::Walking;
                    return Fate::Live;
                }
                self.timer -= ctx.dt;
                if self.timer <= 0.0 {
                    self.timer = 2.0 + ctx.rng.gen::<f32>();
                    let vel = to_player.normalize() * PROJECTILE_SPEED;
                    Projectile::fire(ctx.spawner, *pos, vel, ENEMY_PROJECTILE_TAG, id);
                    ctx.events.sound(SoundCue::Shoot, self.audio_distance);
                }
            }
            ZomboidState::Dying => {}
        }
        Fate::Live
    }

    pub fn hurt(&mut self, events: &mut Events) {
        if self.is_dying() {
            return;
        }
        self.health -= 1;
        if self.health <= 0 {
            self.state = ZomboidState::Dying;
            self.timer = zomboid::DEATH_TIME;
            events.sound(SoundCue::EnemyDeath, self.audio_distance);
        } else {
            events.sound(SoundCue::EnemyHurt, self.audio_distance);
        }
    }
}

// =============================================================================
// Chaser
// =============================================================================

pub mod chaser {
    pub const HEALTH: i32 = 3;
    pub const WALK_SPEED: f32 = 2.0;
    pub const PROJECTILE_SPEED: f32 = 4.0;
    /// Walking stops to attack inside this range
    pub const ATTACK_RANGE: f32 = 13.0;
    /// Walking loses interest beyond this range
    pub const LOSE_RANGE: f32 = 30.0;
    /// Standing starts walking again when the player is in [MIN, MAX)
    pub const PURSUE_MIN: f32 = 15.0;
    pub const PURSUE_MAX: f32 = 25.0;
    pub const DEATH_TIME: f32 = 5.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaserState {
    Walking,
    /// Standing still, shooting whenever the player is in range
    Attacking,
    Dying,
}

#[derive(Debug, Clone)]
pub struct Chaser {
    pub state: ChaserState,
    pub health: i32,
    timer: f32,
    walk: Animation,
    death: Animation,
}

impl Default for Chaser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chaser {
    pub fn new() -> Self {
        Self {
            state: ChaserState::Walking,
            health: chaser::HEALTH,
            timer: 0.0,
            walk: Animation::new(SheetId::Chaser, 4.0, &[(0, 0), (0, 1), (0, 2), (0, 3)]),
            death: Animation::new(SheetId::Chaser, 5.0, &[(1, 0), (1, 1), (1, 2), (1, 3), (1, 4)]),
        }
    }

    pub fn is_dying(&self) -> bool {
        self.state == ChaserState::Dying
    }

    pub fn frame(&self) -> Frame {
        match self.state {
            ChaserState::Walking => self.walk.frame(),
            ChaserState::Attacking => Frame::new(SheetId::Chaser, 0, 4),
            ChaserState::Dying => self.death.frame(),
        }
    }

    pub(super) fn update(&mut self, id: EntityId, pos: &mut Vec2, ctx: &mut UpdateCtx) -> Fate {
        use chaser::*;

        if self.state == ChaserState::Dying {
            if !self.death.is_last_frame() {
                self.death.update(ctx.dt);
            }
            self.timer -= ctx.dt;
            return if self.timer <= 0.0 { Fate::Die } else { Fate::Live };
        }

        let to_player = ctx.player.pos - *pos;
        let dist = to_player.len();

        match self.state {
            ChaserState::Walking => {
                if dist < ATTACK_RANGE {
                    self.state = ChaserState::Attacking;
                    self.walk.reset();
                    self.timer = 0.0;
                } else if dist > LOSE_RANGE {
                    self.state = ChaserState::Attacking;
                    self.walk.reset();
                } else {
                    self.walk.update(ctx.dt);
                    let step = to_player.normalize() * (WALK_SPEED * ctx.dt);
                    move_and_slide(ctx.level, pos, step.x, step.y);
                }
            }
            ChaserState::Attacking => {
                if (PURSUE_MIN..PURSUE_MAX).contains(&dist) {
                    self.state = ChaserState::Walking;
                } else if self.timer <= 0.0 && dist < LOSE_RANGE {
                    self.timer = 2.0 + ctx.rng.gen::<f32>();
                    let vel = to_player.normalize() * PROJECTILE_SPEED;
                    Projectile::fire(ctx.spawner, *pos, vel, ENEMY_PROJECTILE_TAG, id);
                    ctx.events.sound(SoundCue::Shoot, dist);
                } else {
                    self.timer -= ctx.dt;
                }
            }
            ChaserState::Dying => {}
        }
        Fate::Live
    }

    pub fn hurt(&mut self, events: &mut Events, distance: f32) {
        if self.is_dying() {
            return;
        }
        self.health -= 1;
        if self.health <= 0 {
            self.state = ChaserState::Dying;
            self.timer = chaser::DEATH_TIME;
            events.sound(SoundCue::EnemyDeath, distance);
        } else {
            events.sound(SoundCue::EnemyHurt, distance);
        }
    }
}
