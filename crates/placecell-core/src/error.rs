use std::io;
use thiserror::Error;

/// Errors raised by the placement model, the template library and the registry.
#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Invalid site pitch ({pitch_x}, {pitch_y}): both pitches must be positive")]
    InvalidConfiguration { pitch_x: f64, pitch_y: f64 },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("Template '{0}' not found in library")]
    TemplateNotFound(String),

    #[error("Name '{0}' is already in use")]
    DuplicateName(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PlaceError {
    pub(crate) fn micro_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "Micro",
            name: name.to_string(),
        }
    }

    pub(crate) fn cell_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "Cell",
            name: name.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlaceError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::MalformedRecord(err.to_string())
        }
    }
}

pub type PlaceResult<T> = Result<T, PlaceError>;
