//! Refresh loop between the metrics collector and a display.

pub mod controller;
pub mod display;

pub use controller::RefreshController;
pub use display::{DisplayState, DisplaySurface};
