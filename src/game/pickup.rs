//! Pickups
//!
//! A named item lying in the level. Walking over it adds the name to the
//! player's inventory and removes the pickup.

use crate::rasterizer::{Vec2, Visual};
use super::entity::{Fate, UpdateCtx};
use super::event::SoundCue;
use super::runtime::TextOverlay;

/// Squared distance at which the player collects an item
pub const PICKUP_RADIUS_SQ: f32 = 1.2;
pub const MESSAGE_TIME: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct Pickup {
    pub name: String,
    pub visual: Visual,
}

impl Pickup {
    pub fn new(name: impl Into<String>, visual: Visual) -> Self {
        Self { name: name.into(), visual }
    }

    pub(super) fn update(&mut self, pos: Vec2, ctx: &mut UpdateCtx) -> Fate {
        self.visual.update(ctx.dt);

        if (ctx.player.pos - pos).len_sq() > PICKUP_RADIUS_SQ {
            return Fate::Live;
        }
        ctx.player.inventory.push(self.name.clone());
        *ctx.overlay = Some(TextOverlay::new(MESSAGE_TIME, vec![format!("Picked up {}", self.name)]));
        ctx.events.sound(SoundCue::Pickup, 0.0);
        Fate::Die
    }
}
