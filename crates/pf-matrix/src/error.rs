//! Error types for matrix assembly.

use pf_core::PfError;
use pf_fields::FieldError;
use thiserror::Error;

/// Errors that can occur while assembling or combining equations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot combine equation for {expected} with equation for {actual}")]
    FieldMismatch { expected: String, actual: String },

    #[error("Time step must be positive and finite, got {dt}")]
    BadTimeStep { dt: f64 },

    #[error("Unknown convection scheme: {name}")]
    UnknownScheme { name: String },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

pub type MatrixResult<T> = Result<T, MatrixError>;

impl From<MatrixError> for PfError {
    fn from(e: MatrixError) -> Self {
        match e {
            MatrixError::SizeMismatch {
                what,
                expected,
                actual,
            } => PfError::SizeMismatch {
                what,
                expected,
                actual,
            },
            MatrixError::BadTimeStep { dt } => PfError::NonFinite {
                what: "time step",
                value: dt,
            },
            other => PfError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
