//! Game action definitions
//!
//! Keyboard layout follows classic tank controls: arrows turn, WASD moves.

/// Everything the player can ask of the simulation in one tick
///
/// Keyboard / gamepad mappings:
/// - Left/Right arrows, right stick X = Turn
/// - W/S, left stick Y = Move forward/backward
/// - A/D, left stick X = Strafe
/// - Enter, RB/RT = Fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TurnLeft,
    TurnRight,
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Fire,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Fire,
    ];
}
