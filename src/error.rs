// src/error.rs - Error types for configuration and run I/O

use std::path::PathBuf;

use thiserror::Error;

/// Rejected run parameters. Raised before the engine touches a lattice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),

    #[error("temperature must be finite, got {0}")]
    NonFiniteTemperature(f64),

    #[error("magnetic field should be between {min} and {max}, got {value}")]
    FieldOutOfRange { value: f64, min: f64, max: f64 },

    #[error("magnetic moment must be finite, got {0}")]
    NonFiniteMoment(f64),

    #[error("lattice size must be at least 1")]
    ZeroSize,

    #[error("number of sweeps must be at least 1")]
    ZeroSweeps,

    #[error("snapshot frequency must be at least 1")]
    ZeroSaveFreq,
}

/// Errors surfaced by a run and its file I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ConfigError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed snapshot {} at line {line}", path.display())]
    MalformedSnapshot { path: PathBuf, line: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
