//! Shared helpers: time and debouncing

pub mod debounce;
pub mod time;
