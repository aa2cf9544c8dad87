use gcf_core::{
    entities::{Failure, GeocodeResult},
    gateways::geocode::GeocodingGateway,
    response::{self, Mode},
    Result,
};
use reqwest::{blocking::Client, header};
use std::{fmt, time::Duration};
use url::Url;

pub const DEFAULT_FORWARD_URL: &str = "https://api.geocode.farm/forward/";
pub const DEFAULT_REVERSE_URL: &str = "https://api.geocode.farm/reverse/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = "GeocodeFarmGoSDK/4.0";

#[derive(Clone)]
pub struct GeocodeFarmConfig {
    pub api_key: String,
    pub forward_url: String,
    pub reverse_url: String,
    pub timeout: Duration,
}

impl GeocodeFarmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            forward_url: DEFAULT_FORWARD_URL.to_owned(),
            reverse_url: DEFAULT_REVERSE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// The API key must never show up in logs.
impl fmt::Debug for GeocodeFarmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodeFarmConfig")
            .field("forward_url", &self.forward_url)
            .field("reverse_url", &self.reverse_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A geocoding gateway based on geocode.farm.
///
/// Every call issues exactly one blocking GET request.
/// Runtime failures are reported inside the returned [`GeocodeResult`],
/// they are never retried.
#[derive(Debug, Clone)]
pub struct GeocodeFarm {
    config: GeocodeFarmConfig,
    client: Client,
}

impl GeocodeFarm {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(GeocodeFarmConfig::new(api_key))
    }

    pub fn with_config(config: GeocodeFarmConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    pub fn config(&self) -> &GeocodeFarmConfig {
        &self.config
    }

    fn forward_url(&self, address: &str) -> Result<Url> {
        let params = [("key", self.config.api_key.as_str()), ("addr", address)];
        Ok(Url::parse_with_params(&self.config.forward_url, &params)?)
    }

    fn reverse_url(&self, lat: f64, lon: f64) -> Result<Url> {
        let lat = format!("{lat:.6}");
        let lon = format!("{lon:.6}");
        let params = [
            ("key", self.config.api_key.as_str()),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
        ];
        Ok(Url::parse_with_params(&self.config.reverse_url, &params)?)
    }

    fn send(&self, url: Url, mode: Mode) -> GeocodeResult {
        log::debug!("Sending {mode:?} geocoding request to {}", url.path());
        let response = match self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(self.config.timeout)
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                // The URL contains the API key
                log::warn!("Geocoding request failed: {}", err.without_url());
                return GeocodeResult::failure(0, Failure::Request);
            }
        };
        let status_code = response.status().as_u16();
        log::debug!("Geocoding response status: {status_code}");
        let body = match response.bytes() {
            Ok(body) => body,
            Err(err) => {
                log::warn!("Could not read geocoding response: {}", err.without_url());
                Default::default()
            }
        };
        response::decode(mode, status_code, &body)
    }
}

impl GeocodingGateway for GeocodeFarm {
    fn forward(&self, address: &str) -> Result<GeocodeResult> {
        let url = self.forward_url(address)?;
        Ok(self.send(url, Mode::Forward))
    }

    fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeResult> {
        let url = self.reverse_url(lat, lon)?;
        Ok(self.send(url, Mode::Reverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcf_core::Error;

    #[test]
    fn default_config() {
        let gw = GeocodeFarm::new("secret");
        let cfg = gw.config();
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.forward_url, DEFAULT_FORWARD_URL);
        assert_eq!(cfg.reverse_url, DEFAULT_REVERSE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let gw = GeocodeFarm::new("top-secret-key");
        assert!(!format!("{gw:?}").contains("top-secret-key"));
    }

    #[test]
    fn build_forward_url() {
        let gw = GeocodeFarm::new("secret");
        let address = "1600 Amphitheatre Parkway, Mountain View, CA";
        let url = gw.forward_url(address).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.geocode.farm/forward/?key=secret&addr=1600+Amphitheatre+Parkway%2C+Mountain+View%2C+CA"
        );
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("key".to_string(), "secret".to_string()),
                ("addr".to_string(), address.to_string()),
            ]
        );
    }

    #[test]
    fn reserved_characters_survive_encoding() {
        let gw = GeocodeFarm::new("k&y=1");
        let address = "Straße 1 & 2, 10115 Berlin #3 +49 ?x=y";
        let url = gw.forward_url(address).unwrap();
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("key".to_string(), "k&y=1".to_string()));
        assert_eq!(pairs[1], ("addr".to_string(), address.to_string()));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn empty_address_is_passed_through() {
        let gw = GeocodeFarm::new("secret");
        let url = gw.forward_url("").unwrap();
        assert_eq!(url.query(), Some("key=secret&addr="));
    }

    #[test]
    fn build_reverse_url() {
        let gw = GeocodeFarm::new("secret");
        let url = gw.reverse_url(37.4221, -122.0841).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.geocode.farm/reverse/?key=secret&lat=37.422100&lon=-122.084100"
        );
        let url = gw.reverse_url(0.0, 1.0 / 3.0).unwrap();
        assert_eq!(url.query(), Some("key=secret&lat=0.000000&lon=0.333333"));
    }

    #[test]
    fn invalid_endpoint_is_a_propagated_error() {
        let mut config = GeocodeFarmConfig::new("secret");
        config.forward_url = "not a url".into();
        config.reverse_url = "/relative/".into();
        let gw = GeocodeFarm::with_config(config);
        assert!(matches!(gw.forward("Berlin"), Err(Error::Url(_))));
        assert!(matches!(gw.reverse(52.5, 13.4), Err(Error::Url(_))));
    }
}
