pub use taskdeck_tui::{cli, commands, config, logging, tui, AppConfig};

pub use taskdeck_api as api;
pub use taskdeck_core as core;
