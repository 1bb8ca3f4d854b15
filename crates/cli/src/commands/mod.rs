//! Subcommand implementations.
//!
//! Each command returns a JSON value; `main` prints it.

pub mod address;
pub mod check;
pub mod lookup;

use saudi_address_service::config::ConfigError;
use saudi_address_service::national_address::AddressError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The national address API call failed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &serde_json::Value) -> Result<(), CommandError> {
    let text = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
