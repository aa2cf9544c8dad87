use crate::{entities::GeocodeResult, Result};

pub trait GeocodingGateway {
    /// Resolve an address to coordinates.
    fn forward(&self, address: &str) -> Result<GeocodeResult>;
    /// Resolve coordinates (in degrees) to an address.
    fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeResult>;
}
