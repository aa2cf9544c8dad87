use serde_json::{Map, Value};
use thiserror::Error;

/// The decoded inner result object as delivered by the service.
pub type RawResult = Map<String, Value>;

/// The normalized outcome of a single geocoding request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// HTTP status of the response or `0` if the
    /// request never reached the network.
    pub status_code: u16,
    pub outcome: Result<Geocode, Failure>,
}

impl GeocodeResult {
    pub const fn success(status_code: u16, geocode: Geocode) -> Self {
        Self {
            status_code,
            outcome: Ok(geocode),
        }
    }

    pub const fn failure(status_code: u16, failure: Failure) -> Self {
        Self {
            status_code,
            outcome: Err(failure),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn geocode(&self) -> Option<&Geocode> {
        self.outcome.as_ref().ok()
    }

    pub fn failure_kind(&self) -> Option<&Failure> {
        self.outcome.as_ref().err()
    }

    /// Human readable error message, only set for failed requests.
    pub fn error(&self) -> Option<String> {
        self.failure_kind().map(ToString::to_string)
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geocode {
    pub latitude     : Option<String>,
    pub longitude    : Option<String>,
    pub accuracy     : Option<String>,
    pub full_address : Option<String>,
    pub raw          : Option<RawResult>,
}

impl Geocode {
    /// `true` if the service reported success but delivered
    /// no usable result object, e.g. an empty reverse result list.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none()
            && self.longitude.is_none()
            && self.accuracy.is_none()
            && self.full_address.is_none()
            && self.raw.is_none()
    }

    /// Latitude and longitude in degrees.
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_deref()?.trim().parse().ok()?;
        let lng = self.longitude.as_deref()?.trim().parse().ok()?;
        Some((lat, lng))
    }
}

/// Why a request did not produce a [`Geocode`].
///
/// The `Display` output is the error message that is presented to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Network error, refused connection or timeout.
    #[error("Request failed")]
    Request,
    #[error("Invalid JSON")]
    InvalidJson,
    /// The service answered with a status other than `SUCCESS`.
    #[error("API failure: {0}")]
    Api(String),
}
