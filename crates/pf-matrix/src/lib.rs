//! Finite-volume equation assembly.
//!
//! This crate provides the LDU equation type [`FvMatrix`], the implicit
//! operators in [`fvm`] (time derivative, convection, diffusion), the
//! explicit ones in [`fvc`], and the scheme table and time-step state those
//! operators read.

pub mod context;
pub mod error;
pub mod fvc;
pub mod fvm;
pub mod matrix;
pub mod schemes;
pub mod time;

pub use context::FvContext;
pub use error::{MatrixError, MatrixResult};
pub use matrix::FvMatrix;
pub use schemes::{ConvectionScheme, Schemes};
pub use time::TimeState;
