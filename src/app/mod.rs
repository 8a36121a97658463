//! Runtime wiring

pub mod replay;
pub mod runner;
pub mod state;

pub use runner::Runtime;
pub use state::{AppState, DetectorFrame, GestureCommand, RenderSnapshot, SessionCommand};
