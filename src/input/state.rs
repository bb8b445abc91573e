//! Input state management
//!
//! Held actions for one simulation tick. Built from keyboard and gamepad by
//! [`InputState::poll`], or directly from a list of actions in tests.

use std::collections::HashSet;
use macroquad::prelude::{is_key_down, KeyCode};
use super::{Action, Gamepad};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: &[Action]) -> Self {
        Self { held: actions.iter().copied().collect() }
    }

    /// Sample keyboard and gamepad. Call once per frame.
    pub fn poll(gamepad: &mut Gamepad) -> Self {
        gamepad.poll();
        let mut state = Self::new();
        for action in Action::ALL {
            if keyboard_down(action) {
                state.press(action);
            }
        }
        for action in gamepad.held_actions() {
            state.press(action);
        }
        state
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Check if action is currently held down
    pub fn is_down(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }
}

fn keyboard_down(action: Action) -> bool {
    match action {
        Action::TurnLeft => is_key_down(KeyCode::Left),
        Action::TurnRight => is_key_down(KeyCode::Right),
        Action::MoveForward => is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        Action::MoveBackward => is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        Action::StrafeLeft => is_key_down(KeyCode::A),
        Action::StrafeRight => is_key_down(KeyCode::D),
        Action::Fire => is_key_down(KeyCode::Enter) || is_key_down(KeyCode::KpEnter),
    }
}
