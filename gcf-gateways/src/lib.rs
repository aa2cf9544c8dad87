//! # gcf-gateways
//!
//! Network gateways implementing the ports of `gcf-core`.

pub mod geocode_farm;

pub use gcf_core::gateways::geocode::GeocodingGateway;
