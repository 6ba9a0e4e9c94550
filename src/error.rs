//! Error types for roster normalization.
//!
//! Only the option boundary and the options store can fail. Once a request has
//! been validated, parsing and rendering always produce output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    /// An option had the wrong type or the request was not an object.
    #[error("invalid argument: {parameter} must be {expected}")]
    InvalidArgument {
        parameter: String,
        expected: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RosterError {
    pub fn invalid_argument(parameter: impl Into<String>, expected: &'static str) -> Self {
        RosterError::InvalidArgument {
            parameter: parameter.into(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
