//! Projectiles
//!
//! A shot flies in a straight line, dies on the first wall it touches, and
//! hurts the first hurtable thing (player first, then entities in order)
//! that is not its owner.

use crate::rasterizer::{projectile_visual, Frame, Vec2, Visual};
use super::collision::move_and_slide;
use super::entity::{EntityId, EntityKind, Fate, Others, Spawner, UpdateCtx};

/// Center-to-center distance that counts as a hit
pub const HIT_RADIUS: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub vel: Vec2,
    pub owner: EntityId,
    visual: Visual,
}

impl Projectile {
    /// Spawn a shot from `origin`, starting a tenth of a second along its path
    pub fn fire(spawner: &mut Spawner, origin: Vec2, vel: Vec2, tag: u32, owner: EntityId) -> EntityId {
        let projectile = Projectile { vel, owner, visual: projectile_visual(tag) };
        spawner.spawn(origin + vel * 0.1, EntityKind::Projectile(projectile))
    }

    pub fn frame(&self) -> Frame {
        self.visual.frame()
    }

    pub(super) fn update(&mut self, pos: &mut Vec2, ctx: &mut UpdateCtx, mut others: Others) -> Fate {
        self.visual.update(ctx.dt);

        if move_and_slide(ctx.level, pos, self.vel.x * ctx.dt, self.vel.y * ctx.dt) {
            return Fate::Die;
        }

        let player = &mut *ctx.player;
        if self.owner != EntityId::PLAYER && !player.dead && pos.distance(player.pos) < HIT_RADIUS {
            player.hurt(ctx.events);
            return Fate::Die;
        }

        let listener = ctx.player.pos;
        for other in others.iter_mut() {
            if other.id == self.owner || other.dead || !other.is_hurtable() {
                continue;
            }
            if pos.distance(other.pos) < HIT_RADIUS {
                other.hurt(ctx.events, listener);
                return Fate::Die;
            }
        }
        Fate::Live
    }
}
