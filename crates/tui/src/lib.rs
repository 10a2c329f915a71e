pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use taskdeck_core::AppConfig;
