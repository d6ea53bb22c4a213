use thiserror::Error;

use crate::host::ResolveError;

#[derive(Error, Debug)]
pub enum RotorError {
    #[error("Rotor module does not have `{0}` specified")]
    MissingConfiguration(&'static str),

    #[error("Failed to resolve {kind} '{name}': {source}")]
    MissingResource {
        kind: &'static str,
        name: String,
        #[source]
        source: ResolveError,
    },

    #[error("Invalid rotor config: {0}")]
    InvalidConfig(#[from] aviator_common::ConfigError),

    #[error("Rotor module was disabled by an earlier initialization failure")]
    Disabled,
}

pub type Result<T> = std::result::Result<T, RotorError>;
