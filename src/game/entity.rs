//! Entities
//!
//! Every non-player object in a level is an [`Entity`]: an id, a position,
//! a dead flag and one behavior variant. Entities are stored in a plain Vec
//! and updated in order; dead ones are compacted out after each tick and
//! newly spawned ones appended.

use rand::rngs::StdRng;
use crate::rasterizer::{Frame, Vec2, Visual};
use crate::world::LevelMap;
use super::enemy::{Chaser, Zomboid};
use super::event::Events;
use super::pickup::Pickup;
use super::player::Player;
use super::projectile::Projectile;
use super::runtime::TextOverlay;
use super::transition::LevelTransition;

/// Stable identifier for an entity within one level session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// The player is not stored with the entities but owns projectiles too
    pub const PLAYER: EntityId = EntityId(0);
}

/// What an update decided about the entity's future
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Live,
    Die,
}

/// Hands out ids and holds entities spawned mid-tick until the pass ends.
#[derive(Debug)]
pub struct Spawner {
    next_id: u32,
    pending: Vec<Entity>,
}

impl Spawner {
    pub fn new() -> Self {
        // 0 is the player
        Self { next_id: 1, pending: Vec::new() }
    }

    pub fn spawn(&mut self, pos: Vec2, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entity { id, pos, dead: false, kind });
        id
    }

    /// Take everything spawned since the last drain
    pub fn drain(&mut self) -> std::vec::Drain<'_, Entity> {
        self.pending.drain(..)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything an entity may touch while it updates
pub struct UpdateCtx<'a> {
    pub dt: f32,
    pub level: &'a LevelMap,
    pub player: &'a mut Player,
    pub rng: &'a mut StdRng,
    pub events: &'a mut Events,
    pub spawner: &'a mut Spawner,
    pub overlay: &'a mut Option<TextOverlay>,
}

/// The rest of the entity list, minus the one updating
pub struct Others<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Others<'a> {
    pub fn new(before: &'a mut [Entity], after: &'a mut [Entity]) -> Self {
        Self { before, after }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Zomboid(Zomboid),
    Chaser(Chaser),
    Projectile(Projectile),
    Pickup(Pickup),
    Transition(LevelTransition),
    /// Decorative only
    Sprite(Visual),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub dead: bool,
    pub kind: EntityKind,
}

impl Entity {
    /// Advance one tick. Marks the entity dead when its behavior says so.
    pub fn update(&mut self, ctx: &mut UpdateCtx, others: Others) {
        let fate = match &mut self.kind {
            EntityKind::Zomboid(z) => z.update(self.id, &mut self.pos, ctx),
            EntityKind::Chaser(c) => c.update(self.id, &mut self.pos, ctx),
            EntityKind::Projectile(p) => p.update(&mut self.pos, ctx, others),
            EntityKind::Pickup(p) => p.update(self.pos, ctx),
            EntityKind::Transition(t) => t.update(self.pos, ctx),
            EntityKind::Sprite(visual) => {
                visual.update(ctx.dt);
                Fate::Live
            }
        };
        if fate == Fate::Die {
            self.dead = true;
        }
    }

    /// Sprite tile to draw, if the entity is visible at all
    pub fn frame(&self) -> Option<Frame> {
        match &self.kind {
            EntityKind::Zomboid(z) => Some(z.frame()),
            EntityKind::Chaser(c) => Some(c.frame()),
            EntityKind::Projectile(p) => Some(p.frame()),
            EntityKind::Pickup(p) => Some(p.visual.frame()),
            EntityKind::Sprite(visual) => Some(visual.frame()),
            EntityKind::Transition(_) => None,
        }
    }

    /// Can a projectile damage this entity right now
    pub fn is_hurtable(&self) -> bool {
        match &self.kind {
            EntityKind::Zomboid(z) => !z.is_dying(),
            EntityKind::Chaser(c) => !c.is_dying(),
            _ => false,
        }
    }

    /// Apply one point of damage. `listener` is where the player stands.
    pub fn hurt(&mut self, events: &mut Events, listener: Vec2) {
        let distance = self.pos.distance(listener);
        match &mut self.kind {
            EntityKind::Zomboid(z) => z.hurt(events),
            EntityKind::Chaser(c) => c.hurt(events, distance),
            _ => {}
        }
    }

    pub fn is_dying(&self) -> bool {
        match &self.kind {
            EntityKind::Zomboid(z) => z.is_dying(),
            EntityKind::Chaser(c) => c.is_dying(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawner_ids_are_unique_and_skip_player() {
        let mut spawner = Spawner::new();
        let a = spawner.spawn(Vec2::ZERO, EntityKind::Sprite(crate::rasterizer::lookup_sprite("ladder")));
        let b = spawner.spawn(Vec2::ZERO, EntityKind::Sprite(crate::rasterizer::lookup_sprite("chopper")));
        assert_ne!(a, b);
        assert_ne!(a, EntityId::PLAYER);
        assert_eq!(spawner.pending(), 2);
        assert_eq!(spawner.drain().count(), 2);
        assert_eq!(spawner.pending(), 0);
    }
}
