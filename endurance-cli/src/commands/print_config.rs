//! Print the default configuration.

use anyhow::Result;
use endurance_core::Config;

/// Run the config command.
pub fn run() -> Result<()> {
    print!("{}", Config::default().to_toml()?);
    Ok(())
}
