//! Face flux fields.

use pf_core::{Dimensions, Real};
use pf_mesh::Mesh;

use crate::error::{FieldError, FieldResult};
use crate::tensor::Vector;

/// One scalar per face, positive in the direction of the face area vector.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceScalarField {
    name: String,
    dimensions: Dimensions,
    internal: Vec<Real>,
    boundary: Vec<Real>,
}

impl SurfaceScalarField {
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        internal: Vec<Real>,
        boundary: Vec<Real>,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions,
            internal,
            boundary,
        }
    }

    pub fn uniform(name: impl Into<String>, dimensions: Dimensions, mesh: &Mesh, value: Real) -> Self {
        Self::new(
            name,
            dimensions,
            vec![value; mesh.n_internal_faces()],
            vec![value; mesh.n_boundary_faces()],
        )
    }

    /// Volumetric flux `U . S_f` of a uniform velocity.
    pub fn from_velocity(name: impl Into<String>, mesh: &Mesh, velocity: Vector) -> Self {
        let internal = mesh
            .internal_faces()
            .iter()
            .map(|f| velocity.dot(&f.area))
            .collect();
        let boundary = mesh
            .boundary_faces()
            .iter()
            .map(|f| velocity.dot(&f.area))
            .collect();
        Self::new(name, Dimensions::VOLUMETRIC_FLUX, internal, boundary)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn internal(&self) -> &[Real] {
        &self.internal
    }

    pub fn internal_mut(&mut self) -> &mut [Real] {
        &mut self.internal
    }

    pub fn boundary(&self) -> &[Real] {
        &self.boundary
    }

    /// The same flux scaled face by face, keeping the name.
    pub fn scaled(&self, factor: Real) -> Self {
        Self {
            name: self.name.clone(),
            dimensions: self.dimensions,
            internal: self.internal.iter().map(|f| f * factor).collect(),
            boundary: self.boundary.iter().map(|f| f * factor).collect(),
        }
    }

    pub fn check_mesh(&self, mesh: &Mesh) -> FieldResult<()> {
        if self.internal.len() != mesh.n_internal_faces() {
            return Err(FieldError::SizeMismatch {
                name: self.name.clone(),
                what: "internal face values",
                expected: mesh.n_internal_faces(),
                actual: self.internal.len(),
            });
        }
        if self.boundary.len() != mesh.n_boundary_faces() {
            return Err(FieldError::SizeMismatch {
                name: self.name.clone(),
                what: "boundary face values",
                expected: mesh.n_boundary_faces(),
                actual: self.boundary.len(),
            });
        }
        Ok(())
    }
}
