use std::io;
use thiserror::Error;

use placecell_core::PlaceError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Place(#[from] PlaceError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
