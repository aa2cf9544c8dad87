use thiserror::Error;

/// Errors that prevent a request from being issued at all.
///
/// Everything that goes wrong after the request URL was built is
/// reported inside [`GeocodeResult`](crate::entities::GeocodeResult).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
