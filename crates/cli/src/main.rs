//! Saudi National Address CLI.
//!
//! Queries the provider directly with the same configuration the service
//! uses (`NATIONAL_ADDRESS_*` variables, `.env` honoured). Results are
//! printed as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Regions in English
//! saudi-address regions --language E
//!
//! # Cities of region 1 (omit --region for every city)
//! saudi-address cities --region 1
//!
//! # Districts of city 3
//! saudi-address districts --city 3
//!
//! # Verify an address
//! saudi-address verify --building 8228 --postal 12643 --additional 2121
//!
//! # Nearest address to a coordinate
//! saudi-address geocode --lat 24.7136 --lng 46.6753
//!
//! # Connectivity test
//! saudi-address check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::convert::Infallible;

use clap::{Parser, Subcommand};
use saudi_address_core::{ALL_REGIONS, Language};
use saudi_address_service::config::NationalAddressConfig;
use saudi_address_service::national_address::NationalAddressClient;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "saudi-address")]
#[command(author, version, about = "Saudi National Address API client")]
struct Cli {
    /// Response language: A (Arabic) or E (English)
    #[arg(
        short,
        long,
        global = true,
        default_value = "A",
        env = "SAUDI_ADDRESS_LANGUAGE",
        value_parser = parse_language
    )]
    language: Language,

    #[command(subcommand)]
    command: Commands,
}

/// Unknown codes fall back to Arabic, as in the service.
fn parse_language(code: &str) -> Result<Language, Infallible> {
    Ok(Language::from_code_lossy(code))
}

#[derive(Subcommand)]
enum Commands {
    /// List regions
    Regions,
    /// List cities of a region
    Cities {
        /// Region id; -1 lists every city
        #[arg(short, long, default_value_t = ALL_REGIONS, allow_negative_numbers = true)]
        region: i64,
    },
    /// List districts of a city
    Districts {
        /// City id
        #[arg(short, long)]
        city: i64,
    },
    /// Verify a building number / postal code pair
    Verify {
        /// Building number
        #[arg(short, long)]
        building: String,

        /// Postal code
        #[arg(short, long)]
        postal: String,

        /// Additional number
        #[arg(short, long, default_value = "")]
        additional: String,
    },
    /// Find the address nearest to a coordinate
    Geocode {
        /// Latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Test the API key and connection
    Check,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = NationalAddressConfig::from_env()?;
    let client = NationalAddressClient::new(&config)?;
    let language = cli.language;

    let output = match cli.command {
        Commands::Regions => commands::lookup::regions(&client, language).await?,
        Commands::Cities { region } => commands::lookup::cities(&client, region, language).await?,
        Commands::Districts { city } => {
            commands::lookup::districts(&client, city, language).await?
        }
        Commands::Verify {
            building,
            postal,
            additional,
        } => commands::address::verify(&client, &building, &postal, &additional, language).await?,
        Commands::Geocode { lat, lng } => {
            commands::address::geocode(&client, lat, lng, language).await?
        }
        Commands::Check => commands::check::connection(&client, language).await?,
    };

    commands::print_json(&output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_language_flag() {
        let cli = Cli::try_parse_from(["saudi-address", "--language", "E", "regions"]).unwrap();
        assert_eq!(cli.language, Language::English);
    }

    #[test]
    fn test_unknown_language_falls_back_to_arabic() {
        let cli = Cli::try_parse_from(["saudi-address", "regions", "--language", "fr"]).unwrap();
        assert_eq!(cli.language, Language::Arabic);
    }
}
