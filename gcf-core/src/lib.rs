#![deny(missing_debug_implementations)]

//! # gcf-core
//!
//! Result types, response decoding and gateway ports for the Geocode.Farm client.
//!
//! Nothing in here talks to the network: the HTTP gateway lives in `gcf-gateways`.

pub mod entities;
pub mod error;
pub mod gateways;
pub mod response;

pub use self::error::{Error, Result};
