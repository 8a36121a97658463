//! Control layer: what the game loop is asked to do

pub mod intent;
pub mod mapper;

pub use intent::ControlIntent;
pub use mapper::{ControlMapper, SessionStatus, PLAYER_START};
