//! pf-mesh: finite-volume mesh layer for poreflow.
//!
//! Provides:
//! - Cell and face data (owner/neighbour addressing, area vectors, centres)
//! - Incremental mesh builder with validation
//! - Derived geometry (interpolation weights, delta coefficients)
//! - Cell-to-face addressing
//!
//! # Example
//!
//! ```
//! use pf_mesh::MeshBuilder;
//! use nalgebra::Vector3;
//!
//! let mut builder = MeshBuilder::new();
//! let c0 = builder.add_cell(1.0, Vector3::new(0.5, 0.0, 0.0));
//! let c1 = builder.add_cell(1.0, Vector3::new(1.5, 0.0, 0.0));
//! builder.add_face(c0, c1, Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
//! let mesh = builder.build().unwrap();
//!
//! assert_eq!(mesh.n_cells(), 2);
//! assert_eq!(mesh.n_internal_faces(), 1);
//! ```

pub mod addressing;
pub mod builder;
pub mod error;
pub mod mesh;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use addressing::{CellFaceAddressing, FaceRef};
pub use builder::MeshBuilder;
pub use error::MeshError;
pub use mesh::{BoundaryFace, Cell, InternalFace, Mesh};
