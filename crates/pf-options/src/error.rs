//! Error types for equation options.

use pf_core::PfError;
use pf_fields::FieldError;
use pf_matrix::MatrixError;
use thiserror::Error;

/// Errors that can occur while configuring or applying an option.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    #[error("Configuration error in option {option}: {what}")]
    Configuration { option: String, what: String },

    #[error("Unknown option type {type_name} for option {option}")]
    UnknownType { option: String, type_name: String },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),
}

pub type OptionResult<T> = Result<T, OptionError>;

impl OptionError {
    pub fn configuration(option: impl Into<String>, what: impl Into<String>) -> Self {
        OptionError::Configuration {
            option: option.into(),
            what: what.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OptionError::Configuration { .. } | OptionError::UnknownType { .. }
        )
    }
}

impl From<OptionError> for PfError {
    fn from(e: OptionError) -> Self {
        match e {
            OptionError::Matrix(m) => m.into(),
            other => PfError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OptionError::configuration("porosity", "missing key phase");
        assert!(err.to_string().contains("porosity"));
        assert!(err.to_string().contains("phase"));
        assert!(err.is_configuration());
    }

    #[test]
    fn error_conversion() {
        let err: OptionError = FieldError::NotFound {
            name: "alpha.solid".into(),
        }
        .into();
        assert!(!err.is_configuration());
        let pf_err: PfError = err.into();
        assert!(matches!(pf_err, PfError::Invariant { .. }));
    }
}
