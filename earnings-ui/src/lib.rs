pub mod app;
pub mod config;
pub mod console;
pub mod logging;
pub mod runner;
pub mod state;
pub mod views;

pub use config::AppConfig;
pub use runner::{AccrualRunner, Command, Snapshot, Update};
pub use state::AppState;
