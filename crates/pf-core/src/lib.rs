//! pf-core: stable foundation for poreflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - dimensions (runtime dimension sets carried by fields)
//! - ids (compact cell/face identifiers)
//! - error (shared error types)

pub mod dimensions;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use dimensions::Dimensions;
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
