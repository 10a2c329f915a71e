use anyhow::Result;
use taskdeck_core::AppConfig;

use crate::cli::Cli;

/// Resolve the runtime configuration from CLI flags, falling back to
/// environment variables and platform defaults.
pub fn from_cli(cli: &Cli) -> Result<AppConfig> {
    AppConfig::discover(cli.data_dir.clone(), cli.server.clone())
}
