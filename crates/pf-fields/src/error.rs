//! Error types for field storage and lookup.

use pf_core::{Dimensions, PfError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field not found: {name}")]
    NotFound { name: String },

    #[error("Field {name} is a {found} field, expected {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field {name} has {actual} {what}, mesh has {expected}")]
    SizeMismatch {
        name: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Field {name} has dimensions {actual}, expected {expected}")]
    Dimensions {
        name: String,
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Field {name} already registered")]
    Duplicate { name: String },
}

pub type FieldResult<T> = Result<T, FieldError>;

impl From<FieldError> for PfError {
    fn from(e: FieldError) -> Self {
        PfError::Invariant {
            what: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FieldError::NotFound {
            name: "alpha.solid".into(),
        };
        assert!(err.to_string().contains("alpha.solid"));
    }

    #[test]
    fn error_conversion() {
        let err = FieldError::Dimensions {
            name: "phi".into(),
            expected: Dimensions::VOLUMETRIC_FLUX,
            actual: Dimensions::DIMLESS,
        };
        let pf_err: PfError = err.into();
        assert!(matches!(pf_err, PfError::Invariant { .. }));
    }
}
