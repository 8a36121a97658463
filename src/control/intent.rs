use serde::Serialize;

/// Command record read by the game loop once per tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControlIntent {
    /// Player target in game-space percent
    pub move_target: Option<(f32, f32)>,
    pub shoot: bool,
    pub pause: bool,
}

impl ControlIntent {
    pub const NEUTRAL: Self = Self {
        move_target: None,
        shoot: false,
        pause: false,
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}
