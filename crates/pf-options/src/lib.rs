//! pf-options: corrections and sources attached to transport equations.
//!
//! Provides:
//! - The [`FvOption`] interface and the ordered [`OptionList`] a solver calls
//! - [`OptionRegistry`], building options from their `type` entry
//! - [`VolumeFractionSource`], which makes equations consistent with a fixed
//!   porosity field
//!
//! # Example
//!
//! ```no_run
//! use pf_core::{Dimensions, s};
//! use pf_fields::{ObjectRegistry, SurfaceScalarField, Vector, VolScalarField};
//! use pf_matrix::{FvContext, Schemes, TimeState, fvm};
//! use pf_mesh::Mesh;
//! use pf_options::{OptionDict, SupMode, VolumeFractionSource};
//!
//! let mesh = Mesh::structured_1d(10, 1.0, 0.01).unwrap();
//! let mut db = ObjectRegistry::new();
//! db.insert(VolScalarField::uniform("alpha.solid", Dimensions::DIMLESS, &mesh, 0.4)).unwrap();
//! db.insert(VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 300.0)).unwrap();
//! db.insert_surface(SurfaceScalarField::from_velocity("phi", &mesh, Vector::x())).unwrap();
//!
//! let schemes = Schemes::new();
//! let time = TimeState::new(s(0.01)).unwrap();
//! let ctx = FvContext::new(&mesh, &db, &schemes, &time);
//!
//! let dict = OptionDict::new()
//!     .with("type", "volumeFractionSource")
//!     .with("phase", "solid")
//!     .with("fields", vec!["T"]);
//! let porosity = VolumeFractionSource::new("porosity", &dict).unwrap();
//!
//! let t = db.lookup::<f64>("T").unwrap();
//! let mut eqn = fvm::ddt(t, &mesh, &time).unwrap();
//! porosity.add_sup(&ctx, &mut eqn, SupMode::Plain).unwrap();
//! ```

pub mod alpha;
pub mod config;
pub mod ddt;
pub mod diagnostics;
pub mod dict;
pub mod diffusivity;
pub mod div;
pub mod error;
pub mod laplacian;
pub mod list;
pub mod option;
pub mod registry;
pub mod volume_fraction;

// Re-exports
pub use alpha::{AlphaField, One, Product};
pub use config::VolumeFractionConfig;
pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use dict::{OptionDict, OptionValue};
pub use diffusivity::{DiffusivityProvider, TransportDiffusivity};
pub use error::{OptionError, OptionResult};
pub use list::OptionList;
pub use option::{FvOption, SupField, SupMode};
pub use registry::{OptionFactory, OptionRegistry};
pub use volume_fraction::{Correction, FieldRole, VolumeFractionSource};
