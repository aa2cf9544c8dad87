use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use gcf_core::entities::{Geocode, GeocodeResult};
use gcf_gateways::{geocode_farm::GeocodeFarm, GeocodingGateway};
use std::{
    io::{self, Write},
    path::PathBuf,
};

#[derive(Parser)]
#[command(version, about = "Geocode.Farm command line client")]
struct Args {
    /// Configuration file (default: geocodefarm.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides the API key of the configuration
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an address to coordinates
    Forward { address: String },
    /// Resolve coordinates to an address
    Reverse {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

pub fn run() -> Result<()> {
    dotenv().ok();
    let Args {
        config,
        api_key,
        command,
    } = Args::parse();

    let mut cfg = Config::try_load_from_file_or_default(config)?;
    if let Some(api_key) = api_key {
        cfg.geocoding.api_key = Some(api_key);
    }
    let gw = GeocodeFarm::with_config(cfg.geocoding.gateway_config()?);

    let res = match command {
        Command::Forward { address } => {
            log::info!("Forward geocoding '{address}'");
            gw.forward(&address)?
        }
        Command::Reverse { lat, lon } => {
            log::info!("Reverse geocoding ({lat}, {lon})");
            gw.reverse(lat, lon)?
        }
    };
    print_result(&mut io::stdout().lock(), &res)
}

fn print_result<W: Write>(out: &mut W, res: &GeocodeResult) -> Result<()> {
    match &res.outcome {
        Ok(geocode) => {
            if geocode.is_empty() {
                log::warn!("The service did not return any result");
            }
            write_geocode(out, geocode)?;
            Ok(())
        }
        Err(failure) => Err(anyhow!(
            "API Error: {failure} (HTTP status {})",
            res.status_code
        )),
    }
}

fn write_geocode<W: Write>(out: &mut W, geocode: &Geocode) -> io::Result<()> {
    let fields = [
        ("Latitude", &geocode.latitude),
        ("Longitude", &geocode.longitude),
        ("Accuracy", &geocode.accuracy),
        ("Full Address", &geocode.full_address),
    ];
    for (label, value) in fields {
        writeln!(out, "{label}: {}", value.as_deref().unwrap_or("-"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gcf_core::entities::Failure;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_reverse_with_negative_coordinates() {
        let args = Args::try_parse_from(["geocodefarm", "reverse", "-33.8688", "-151.2093"]).unwrap();
        match args.command {
            Command::Reverse { lat, lon } => {
                assert_eq!(lat, -33.8688);
                assert_eq!(lon, -151.2093);
            }
            Command::Forward { .. } => panic!("unexpected command"),
        }
    }

    #[test]
    fn parse_forward_with_options() {
        let args = Args::try_parse_from([
            "geocodefarm",
            "--api-key",
            "secret",
            "--config",
            "my.toml",
            "forward",
            "1600 Amphitheatre Parkway, Mountain View, CA",
        ])
        .unwrap();
        assert_eq!(args.api_key.as_deref(), Some("secret"));
        assert_eq!(args.config, Some(PathBuf::from("my.toml")));
        assert!(matches!(
            args.command,
            Command::Forward { address } if address == "1600 Amphitheatre Parkway, Mountain View, CA"
        ));
    }

    #[test]
    fn print_successful_result() {
        let geocode = Geocode {
            latitude: Some("37.4221".into()),
            longitude: Some("-122.0841".into()),
            accuracy: None,
            full_address: Some("1600 Amphitheatre Pkwy".into()),
            raw: None,
        };
        let mut out = Vec::new();
        print_result(&mut out, &GeocodeResult::success(200, geocode)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Latitude: 37.4221\n\
             Longitude: -122.0841\n\
             Accuracy: -\n\
             Full Address: 1600 Amphitheatre Pkwy\n"
        );
    }

    #[test]
    fn print_failed_result() {
        let mut out = Vec::new();
        let err = print_result(&mut out, &GeocodeResult::failure(0, Failure::Request)).unwrap_err();
        assert_eq!(err.to_string(), "API Error: Request failed (HTTP status 0)");
        assert!(out.is_empty());
    }
}
