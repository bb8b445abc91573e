//! Input handling with gamepad support
//!
//! The simulation only ever sees an [`InputState`]: the set of actions held
//! this tick. Keyboard (macroquad) and gamepad (gilrs on native) are folded
//! into that set by [`InputState::poll`].

mod actions;
mod gamepad;
mod state;

pub use actions::Action;
pub use gamepad::Gamepad;
pub use state::InputState;
