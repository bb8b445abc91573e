//! Gamepad support
//!
//! Native: gilrs. WASM: no gamepad, keyboard only.
//! Sticks are folded into digital actions once they leave the deadzone.

use super::Action;

/// Stick deflection past which a direction counts as held
const STICK_THRESHOLD: f32 = 0.35;

/// Map raw stick axes (y up positive) to held actions
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn stick_actions(left: (f32, f32), right: (f32, f32), out: &mut Vec<Action>) {
    let (lx, ly) = left;
    if ly > STICK_THRESHOLD { out.push(Action::MoveForward); }
    if ly < -STICK_THRESHOLD { out.push(Action::MoveBackward); }
    if lx < -STICK_THRESHOLD { out.push(Action::StrafeLeft); }
    if lx > STICK_THRESHOLD { out.push(Action::StrafeRight); }
    let (rx, _) = right;
    if rx < -STICK_THRESHOLD { out.push(Action::TurnLeft); }
    if rx > STICK_THRESHOLD { out.push(Action::TurnRight); }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button, Gilrs};
    use tracing::warn;

    pub struct Gamepad {
        gilrs: Option<Gilrs>,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(g) => Some(g),
                Err(e) => {
                    warn!(error = %e, "gamepad support unavailable");
                    None
                }
            };
            Self { gilrs }
        }

        /// Pump gilrs events so button state is current
        pub fn poll(&mut self) {
            if let Some(gilrs) = self.gilrs.as_mut() {
                while gilrs.next_event().is_some() {}
            }
        }

        pub fn has_gamepad(&self) -> bool {
            self.active().is_some()
        }

        fn active(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        /// Actions currently held on the first connected pad
        pub fn held_actions(&self) -> Vec<Action> {
            let mut out = Vec::new();
            let Some(gp) = self.active() else { return out };

            if gp.is_pressed(Button::DPadUp) { out.push(Action::MoveForward); }
            if gp.is_pressed(Button::DPadDown) { out.push(Action::MoveBackward); }
            if gp.is_pressed(Button::DPadLeft) { out.push(Action::TurnLeft); }
            if gp.is_pressed(Button::DPadRight) { out.push(Action::TurnRight); }
            if gp.is_pressed(Button::RightTrigger) || gp.is_pressed(Button::RightTrigger2) {
                out.push(Action::Fire);
            }
            stick_actions(
                (gp.value(Axis::LeftStickX), gp.value(Axis::LeftStickY)),
                (gp.value(Axis::RightStickX), gp.value(Axis::RightStickY)),
                &mut out,
            );
            out
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// WASM Implementation (keyboard only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    #[derive(Default)]
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn held_actions(&self) -> Vec<Action> {
            Vec::new()
        }
    }
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_deadzone() {
        let mut out = Vec::new();
        stick_actions((0.2, -0.2), (0.1, 0.0), &mut out);
        assert!(out.is_empty());

        stick_actions((-0.9, 0.8), (0.6, 0.0), &mut out);
        assert_eq!(out, vec![Action::MoveForward, Action::StrafeLeft, Action::TurnRight]);
    }
}
