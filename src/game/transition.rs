//! Level transitions
//!
//! An invisible trigger that sends the player to another level. It fires on
//! the tick the player steps into range, not while they stand in it. A gated
//! transition consumes one copy of the required item the first time it lets
//! the player through and stays open afterwards.

use crate::rasterizer::Vec2;
use super::entity::{Fate, UpdateCtx};
use super::event::LevelRequest;
use super::runtime::TextOverlay;

/// Squared trigger distance
pub const TRIGGER_RADIUS_SQ: f32 = 1.2;
pub const MESSAGE_TIME: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct LevelTransition {
    pub to: String,
    pub entry: Option<String>,
    pub requires: Option<String>,
    player_inside: bool,
}

impl LevelTransition {
    pub fn new(to: impl Into<String>, entry: Option<String>, requires: Option<String>) -> Self {
        Self { to: to.into(), entry, requires, player_inside: false }
    }

    /// Match the trigger to where the player stands now, so a player placed
    /// inside its range does not fire it until they step out and back in
    pub(super) fn settle(&mut self, pos: Vec2, player: Vec2) {
        self.player_inside = (player - pos).len_sq() <= TRIGGER_RADIUS_SQ;
    }

    pub(super) fn update(&mut self, pos: Vec2, ctx: &mut UpdateCtx) -> Fate {
        let inside = (ctx.player.pos - pos).len_sq() <= TRIGGER_RADIUS_SQ;
        let entered = inside && !self.player_inside;
        self.player_inside = inside;
        if !entered {
            return Fate::Live;
        }

        if let Some(item) = &self.requires {
            if !ctx.player.take_item(item) {
                *ctx.overlay = Some(TextOverlay::new(MESSAGE_TIME, vec![format!("You need {}", item)]));
                return Fate::Live;
            }
            *ctx.overlay = Some(TextOverlay::new(MESSAGE_TIME, vec![format!("Used {}", item)]));
            self.requires = None;
        }

        ctx.player.vel = Vec2::ZERO;
        ctx.events.level.send(LevelRequest::Go {
            level: self.to.clone(),
            entry: self.entry.clone(),
        });
        Fate::Live
    }
}
