//! Discrete keyboard actions

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveLeft,
    MoveRight,
    /// Commit the pending piece to the physics world
    Drop,
}

impl KeyAction {
    /// Map a `KeyboardEvent.code` value; unrelated keys give `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(KeyAction::MoveLeft),
            "ArrowRight" | "KeyD" => Some(KeyAction::MoveRight),
            "Space" | "ArrowDown" | "Enter" => Some(KeyAction::Drop),
            _ => None,
        }
    }

    /// Signed horizontal direction of a move, 0 for drop
    pub fn direction(&self) -> f32 {
        match self {
            KeyAction::MoveLeft => -1.0,
            KeyAction::MoveRight => 1.0,
            KeyAction::Drop => 0.0,
        }
    }
}
