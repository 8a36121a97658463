//! Gesture Shooter - hand-gesture controlled space shooter core
//!
//! Landmark frames from an external hand detector flow through the gesture
//! pipeline (classify, smooth, stabilize, map) into control intents that a
//! fixed-tick game session consumes. The `app` module wires both onto tokio.

pub mod app;
pub mod camera;
pub mod config;
pub mod control;
pub mod game;
pub mod gesture;
pub mod scoring;
pub mod util;
