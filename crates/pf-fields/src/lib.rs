//! pf-fields: field values and fields for poreflow.
//!
//! Provides:
//! - The five tensor ranks an equation can be solved for
//! - Cell-centred volume fields with boundary values and old-time storage
//! - Face flux fields
//! - A named object registry, the case database that options look fields up in

pub mod error;
pub mod surface;
pub mod tensor;
pub mod registry;
pub mod vol;

pub use error::{FieldError, FieldResult};
pub use registry::{AnyVolField, ObjectRegistry};
pub use surface::SurfaceScalarField;
pub use tensor::{FieldValue, Scalar, SphericalTensor, SymmTensor, Tensor, Vector};
pub use vol::{
    PatchValue, VolField, VolScalarField, VolSphericalTensorField, VolSymmTensorField,
    VolTensorField, VolVectorField,
};
