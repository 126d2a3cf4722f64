//! Time-derivative correction.
//!
//! The caller's equation holds `d(s psi)/dt`; the porous form is
//! `d(e s psi)/dt`. The difference is the caller's Euler row scaled by
//! `e - 1`.

use pf_core::Real;
use pf_fields::{FieldValue, VolField, VolScalarField};
use pf_matrix::{FvMatrix, MatrixResult, TimeState, fvm};
use pf_mesh::Mesh;

/// `e - 1` per cell.
pub(crate) fn excess(e: &VolScalarField) -> Vec<Real> {
    e.internal().iter().map(|v| v - 1.0).collect()
}

/// Euler correction for storage weight `weight` (old-time `weight_old`).
pub fn ddt_correction<T: FieldValue>(
    e: &VolScalarField,
    weight: &[Real],
    weight_old: &[Real],
    psi: &VolField<T>,
    mesh: &Mesh,
    time: &TimeState,
) -> MatrixResult<FvMatrix<T>> {
    let mut m = fvm::ddt_weighted(weight, weight_old, psi, mesh, time)?;
    m.scale_rows(&excess(e), mesh)?;
    Ok(m)
}
