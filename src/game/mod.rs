//! Game Module
//!
//! The simulation core: entities, their behaviors, the fixed-tick update,
//! level sessions and the column renderer.
//!
//! Key concepts:
//! - Game: one level session (map, player, entities, depth buffer)
//! - Entity: id + position + behavior variant, updated once per tick
//! - Event: sound cues and level requests leaving the tick
//! - SessionManager: caches a Game per level name and moves the player between them

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod renderer;
pub mod runtime;
pub mod session;
pub mod transition;

// Re-export main types
pub use collision::move_and_slide;
pub use entity::{Entity, EntityId, EntityKind};
pub use event::{Events, LevelRequest, SoundCue, SoundEvent};
pub use player::{Player, PlayerSnapshot};
pub use renderer::{draw_framebuffer, draw_hud, render_game};
pub use runtime::{Game, LevelEntry, TextOverlay, DEFAULT_ENTRY, TICK};
pub use session::{SessionManager, Switch};
