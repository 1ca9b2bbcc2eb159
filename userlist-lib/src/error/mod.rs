//! Error types

mod api;

pub use api::*;

/// Top-level error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from an API call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            Self::Config(_) => None,
        }
    }
}
