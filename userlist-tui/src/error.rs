//! Application error type.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("client error: {0}")]
    Client(#[from] userlist_lib::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
