//! Terminal views: the live earnings display and the notice line.

pub mod display;
pub mod status_bar;

pub use display::Renderer;
pub use status_bar::StatusBar;
