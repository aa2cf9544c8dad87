use anyhow::{anyhow, Result};
use gcf_gateways::geocode_farm::{
    GeocodeFarmConfig, DEFAULT_FORWARD_URL, DEFAULT_REVERSE_URL, DEFAULT_TIMEOUT,
};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "geocodefarm.toml";

const ENV_NAME_API_KEY: &str = "GEOCODEFARM_API_KEY";

pub struct Config {
    pub geocoding: Geocoding,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let raw_config = match file_path {
            Some(file_path) => {
                let file_path = file_path.as_ref();
                log::debug!("Load configuration from {}", file_path.display());
                let cfg_string = fs::read_to_string(file_path).map_err(|err| {
                    anyhow!("Unable to read configuration file {}: {err}", file_path.display())
                })?;
                toml::from_str(&cfg_string)?
            }
            None => match fs::read_to_string(DEFAULT_CONFIG_FILE_NAME) {
                Ok(cfg_string) => toml::from_str(&cfg_string)?,
                Err(err) => match err.kind() {
                    ErrorKind::NotFound => {
                        log::info!(
                            "{DEFAULT_CONFIG_FILE_NAME} not found => load default configuration."
                        );
                        Ok(raw::Config::default())
                    }
                    _ => Err(err),
                }?,
            },
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(api_key) = env::var(ENV_NAME_API_KEY) {
            cfg.geocoding.api_key = Some(api_key);
        }
        Ok(cfg)
    }
}

pub struct Geocoding {
    pub api_key: Option<String>,
    pub forward_url: String,
    pub reverse_url: String,
    pub timeout: Duration,
}

impl Geocoding {
    pub fn gateway_config(&self) -> Result<GeocodeFarmConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            anyhow!("No Geocode.Farm API key found: set {ENV_NAME_API_KEY} or use --api-key")
        })?;
        Ok(GeocodeFarmConfig {
            api_key,
            forward_url: self.forward_url.clone(),
            reverse_url: self.reverse_url.clone(),
            timeout: self.timeout,
        })
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config { gateway } = from;

        let raw::Gateway { geocode_farm } = gateway.unwrap_or_default();

        let raw::GeocodeFarm {
            api_key,
            forward_url,
            reverse_url,
            timeout,
        } = geocode_farm.unwrap_or_default();

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(anyhow!("The request timeout must not be zero"));
        }

        let geocoding = Geocoding {
            api_key,
            forward_url: forward_url.unwrap_or_else(|| DEFAULT_FORWARD_URL.to_owned()),
            reverse_url: reverse_url.unwrap_or_else(|| DEFAULT_REVERSE_URL.to_owned()),
            timeout,
        };

        Ok(Self { geocoding })
    }
}
