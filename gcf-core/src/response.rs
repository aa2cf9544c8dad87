//! Decoding of Geocode.Farm JSON responses.
//!
//! The envelope is the same for both directions:
//!
//! ```json
//! {
//!   "STATUS":  { "status": "SUCCESS" },
//!   "RESULTS": { "result": { .. } }
//! }
//! ```
//!
//! Forward requests deliver a single result object, reverse requests
//! a list of result objects of which only the first one is used.
//! The names of the fields inside a result object have changed between
//! API versions, so every field is looked up by a list of key paths.

use crate::entities::{Failure, Geocode, GeocodeResult, RawResult};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

pub const STATUS_SUCCESS: &str = "SUCCESS";

pub const LATITUDE_PATHS: &[&str] = &["latitude", "coordinates.lat"];
pub const LONGITUDE_PATHS: &[&str] = &["longitude", "coordinates.lon"];
pub const ACCURACY_PATHS: &[&str] = &["accuracy"];
pub const FULL_ADDRESS_PATHS: &[&str] = &["formatted_address", "address.full_address"];

/// Direction of a geocoding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Address to coordinates
    Forward,
    /// Coordinates to address
    Reverse,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "STATUS", default, deserialize_with = "lenient")]
    status: Option<Status>,
    #[serde(rename = "RESULTS", default, deserialize_with = "lenient")]
    results: Option<Results>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Results {
    #[serde(default)]
    result: Option<ResultPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultPayload {
    Single(RawResult),
    List(Vec<Value>),
    Other(Value),
}

impl ResultPayload {
    fn into_inner(self, mode: Mode) -> Option<RawResult> {
        match (mode, self) {
            (Mode::Forward, Self::Single(result)) => Some(result),
            (Mode::Reverse, Self::List(results)) => match results.into_iter().next() {
                Some(Value::Object(result)) => Some(result),
                _ => None,
            },
            (mode, Self::Other(value)) => {
                log::debug!("Unexpected {mode:?} result payload: {value}");
                None
            }
            (mode, _) => {
                log::debug!("Result payload does not match the {mode:?} request");
                None
            }
        }
    }
}

/// Values of an unexpected type are treated as absent
/// instead of failing the whole envelope.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a response body received with the given HTTP status.
pub fn decode(mode: Mode, status_code: u16, body: &[u8]) -> GeocodeResult {
    let object: RawResult = match serde_json::from_slice(body) {
        Ok(object) => object,
        Err(err) => {
            log::warn!("Could not decode response (HTTP status {status_code}): {err}");
            return GeocodeResult::failure(status_code, Failure::InvalidJson);
        }
    };
    let Envelope { status, results } =
        serde_json::from_value(Value::Object(object)).unwrap_or_default();

    let status = status.and_then(|s| s.status).unwrap_or_default();
    if status != STATUS_SUCCESS {
        log::debug!("Geocode.Farm reported status '{status}'");
        return GeocodeResult::failure(status_code, Failure::Api(status));
    }

    let inner = results
        .and_then(|r| r.result)
        .and_then(|payload| payload.into_inner(mode));
    if inner.is_none() {
        log::debug!("No {mode:?} result object in successful response");
    }
    GeocodeResult::success(status_code, extract(inner))
}

fn extract(inner: Option<RawResult>) -> Geocode {
    let Some(raw) = inner else {
        return Geocode::default();
    };
    Geocode {
        latitude: first_string(&raw, LATITUDE_PATHS),
        longitude: first_string(&raw, LONGITUDE_PATHS),
        accuracy: first_string(&raw, ACCURACY_PATHS),
        full_address: first_string(&raw, FULL_ADDRESS_PATHS),
        raw: Some(raw),
    }
}

/// Returns the first non-empty string found at one of the `paths`.
pub fn first_string(object: &RawResult, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| lookup_str(object, path))
        .find(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Resolves a dotted key path like `coordinates.lat` to a string value.
pub fn lookup_str<'a>(object: &'a RawResult, path: &str) -> Option<&'a str> {
    let mut keys = path.split('.');
    let last = keys.next_back()?;
    let mut current = object;
    for key in keys {
        current = current.get(key)?.as_object()?;
    }
    current.get(last)?.as_str()
}
