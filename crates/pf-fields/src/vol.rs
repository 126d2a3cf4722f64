//! Cell-centred volume fields.

use pf_core::{Dimensions, Real};
use pf_mesh::Mesh;

use crate::error::{FieldError, FieldResult};
use crate::tensor::{FieldValue, SphericalTensor, SymmTensor, Tensor, Vector};

/// Value imposed on one boundary face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatchValue<T> {
    /// Fixed value on the face.
    Fixed(T),
    /// Face takes the owner cell's value.
    ZeroGradient,
}

/// A field with one value per cell, one boundary value per boundary face,
/// and optionally the values from the previous time step.
#[derive(Clone, Debug, PartialEq)]
pub struct VolField<T> {
    name: String,
    dimensions: Dimensions,
    internal: Vec<T>,
    boundary: Vec<PatchValue<T>>,
    old_time: Option<Vec<T>>,
}

pub type VolScalarField = VolField<Real>;
pub type VolVectorField = VolField<Vector>;
pub type VolSymmTensorField = VolField<SymmTensor>;
pub type VolSphericalTensorField = VolField<SphericalTensor>;
pub type VolTensorField = VolField<Tensor>;

impl<T: FieldValue> VolField<T> {
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        internal: Vec<T>,
        boundary: Vec<PatchValue<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions,
            internal,
            boundary,
            old_time: None,
        }
    }

    /// Uniform field with zero-gradient boundaries.
    pub fn uniform(name: impl Into<String>, dimensions: Dimensions, mesh: &Mesh, value: T) -> Self {
        Self::new(
            name,
            dimensions,
            vec![value; mesh.n_cells()],
            vec![PatchValue::ZeroGradient; mesh.n_boundary_faces()],
        )
    }

    /// Attach previous-time-step values.
    pub fn with_old_time(mut self, old: Vec<T>) -> Self {
        self.old_time = Some(old);
        self
    }

    /// Copy the current values into old-time storage.
    pub fn store_old_time(&mut self) {
        self.old_time = Some(self.internal.clone());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn internal(&self) -> &[T] {
        &self.internal
    }

    pub fn internal_mut(&mut self) -> &mut [T] {
        &mut self.internal
    }

    pub fn boundary(&self) -> &[PatchValue<T>] {
        &self.boundary
    }

    pub fn set_patch(&mut self, b: usize, value: PatchValue<T>) {
        if let Some(slot) = self.boundary.get_mut(b) {
            *slot = value;
        }
    }

    pub fn old_time(&self) -> Option<&[T]> {
        self.old_time.as_deref()
    }

    /// Old-time values when stored, otherwise the current values.
    pub fn old_or_current(&self) -> &[T] {
        self.old_time.as_deref().unwrap_or(&self.internal)
    }

    /// Value on boundary face `b`, owned by `owner`.
    pub fn boundary_value(&self, b: usize, owner: usize) -> T {
        match self.boundary.get(b) {
            Some(PatchValue::Fixed(v)) => *v,
            _ => self.internal[owner],
        }
    }

    /// Check sizes against the mesh.
    pub fn check_mesh(&self, mesh: &Mesh) -> FieldResult<()> {
        let checks = [
            ("cell values", mesh.n_cells(), self.internal.len()),
            (
                "boundary values",
                mesh.n_boundary_faces(),
                self.boundary.len(),
            ),
            (
                "old-time values",
                mesh.n_cells(),
                self.old_time.as_ref().map_or(mesh.n_cells(), Vec::len),
            ),
        ];
        for (what, expected, actual) in checks {
            if expected != actual {
                return Err(FieldError::SizeMismatch {
                    name: self.name.clone(),
                    what,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Check dimensions against an expected set.
    pub fn check_dimensions(&self, expected: Dimensions) -> FieldResult<()> {
        if self.dimensions == expected {
            Ok(())
        } else {
            Err(FieldError::Dimensions {
                name: self.name.clone(),
                expected,
                actual: self.dimensions,
            })
        }
    }
}

impl VolScalarField {
    /// Pointwise product, named `a*b`.
    ///
    /// Old-time values multiply when either side stores them.
    pub fn product(a: &VolScalarField, b: &VolScalarField) -> VolScalarField {
        let internal = a
            .internal
            .iter()
            .zip(&b.internal)
            .map(|(x, y)| x * y)
            .collect();
        let boundary = a
            .boundary
            .iter()
            .zip(&b.boundary)
            .map(|pair| match pair {
                (PatchValue::Fixed(x), PatchValue::Fixed(y)) => PatchValue::Fixed(x * y),
                _ => PatchValue::ZeroGradient,
            })
            .collect();
        let mut out = VolField::new(
            format!("{}*{}", a.name, b.name),
            a.dimensions * b.dimensions,
            internal,
            boundary,
        );
        if a.old_time.is_some() || b.old_time.is_some() {
            let old = a
                .old_or_current()
                .iter()
                .zip(b.old_or_current())
                .map(|(x, y)| x * y)
                .collect();
            out = out.with_old_time(old);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> Mesh {
        Mesh::structured_1d(3, 3.0, 1.0).unwrap()
    }

    #[test]
    fn uniform_field_sizes() {
        let m = mesh();
        let f = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &m, 300.0);
        assert!(f.check_mesh(&m).is_ok());
        assert_eq!(f.internal(), &[300.0; 3]);
        assert_eq!(f.boundary_value(0, 0), 300.0);
        assert!(f.old_time().is_none());
        assert_eq!(f.old_or_current(), f.internal());
    }

    #[test]
    fn fixed_patch_overrides_owner() {
        let m = mesh();
        let mut f = VolVectorField::uniform("U", Dimensions::VELOCITY, &m, Vector::x());
        f.set_patch(1, PatchValue::Fixed(Vector::zeros()));
        assert_eq!(f.boundary_value(1, 2), Vector::zeros());
        assert_eq!(f.boundary_value(0, 0), Vector::x());
    }

    #[test]
    fn size_mismatch_detected() {
        let m = mesh();
        let f = VolScalarField::new("p", Dimensions::DIMLESS, vec![0.0; 2], vec![]);
        let err = f.check_mesh(&m).unwrap_err();
        assert!(matches!(err, FieldError::SizeMismatch { .. }));
    }

    #[test]
    fn old_time_storage() {
        let m = mesh();
        let mut f = VolScalarField::uniform("rho", Dimensions::DENSITY, &m, 1.0);
        f.store_old_time();
        f.internal_mut()[0] = 2.0;
        assert_eq!(f.old_or_current()[0], 1.0);
        assert_eq!(f.internal()[0], 2.0);
    }

    #[test]
    fn product_combines_dimensions_and_old_time() {
        let m = mesh();
        let alpha = VolScalarField::uniform("alpha.air", Dimensions::DIMLESS, &m, 0.5);
        let rho = VolScalarField::uniform("rho", Dimensions::DENSITY, &m, 2.0)
            .with_old_time(vec![4.0; 3]);
        let ar = VolScalarField::product(&alpha, &rho);
        assert_eq!(ar.name(), "alpha.air*rho");
        assert_eq!(ar.dimensions(), Dimensions::DENSITY);
        assert_eq!(ar.internal(), &[1.0; 3]);
        assert_eq!(ar.old_or_current(), &[2.0; 3]);
    }

    #[test]
    fn dimension_check() {
        let m = mesh();
        let f = VolScalarField::uniform("alpha.solid", Dimensions::DIMLESS, &m, 0.3);
        assert!(f.check_dimensions(Dimensions::DIMLESS).is_ok());
        assert!(f.check_dimensions(Dimensions::DENSITY).is_err());
    }
}
