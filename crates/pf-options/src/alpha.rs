//! Alpha-like weightings of the diffusivity.
//!
//! The Laplacian correction multiplies the diffusivity by a weighting `a`
//! that may be unity, a phase fraction, or an anisotropic tensor seen along
//! the face normal. All three are read through [`AlphaField`].

use pf_core::Real;
use pf_fields::{FieldValue, SymmTensor, Vector, VolField, VolScalarField};

pub trait AlphaField {
    /// Weight of `cell` across a face with unit normal `normal`.
    fn cell_value(&self, cell: usize, normal: &Vector) -> Real;

    /// Weight on boundary face `b` (owned by `owner`) with outward unit
    /// normal `normal`.
    fn boundary_value(&self, b: usize, owner: usize, normal: &Vector) -> Real;
}

/// Unit weighting.
#[derive(Clone, Copy, Debug, Default)]
pub struct One;

impl AlphaField for One {
    fn cell_value(&self, _cell: usize, _normal: &Vector) -> Real {
        1.0
    }

    fn boundary_value(&self, _b: usize, _owner: usize, _normal: &Vector) -> Real {
        1.0
    }
}

impl AlphaField for VolScalarField {
    fn cell_value(&self, cell: usize, _normal: &Vector) -> Real {
        self.internal()[cell]
    }

    fn boundary_value(&self, b: usize, owner: usize, _normal: &Vector) -> Real {
        VolField::boundary_value(self, b, owner)
    }
}

/// Anisotropic weighting, projected as `n . K . n`.
impl AlphaField for VolField<SymmTensor> {
    fn cell_value(&self, cell: usize, normal: &Vector) -> Real {
        self.internal()[cell].project(normal)
    }

    fn boundary_value(&self, b: usize, owner: usize, normal: &Vector) -> Real {
        VolField::boundary_value(self, b, owner).project(normal)
    }
}

/// Product of two weightings.
#[derive(Clone, Copy, Debug)]
pub struct Product<'a, A: ?Sized, B: ?Sized>(pub &'a A, pub &'a B);

impl<A: AlphaField + ?Sized, B: AlphaField + ?Sized> AlphaField for Product<'_, A, B> {
    fn cell_value(&self, cell: usize, normal: &Vector) -> Real {
        self.0.cell_value(cell, normal) * self.1.cell_value(cell, normal)
    }

    fn boundary_value(&self, b: usize, owner: usize, normal: &Vector) -> Real {
        self.0.boundary_value(b, owner, normal) * self.1.boundary_value(b, owner, normal)
    }
}

/// Whether every weight of `field` is finite.
pub(crate) fn all_finite<T: FieldValue>(field: &VolField<T>) -> bool {
    field.internal().iter().all(FieldValue::is_finite)
}
