//! Explicit operators evaluated from current values.

use pf_core::Real;
use pf_fields::SurfaceScalarField;
use pf_mesh::Mesh;

use crate::error::MatrixResult;

/// Net outflow through the faces of each cell, `sum_f F_f`.
pub fn surface_sum(flux: &SurfaceScalarField, mesh: &Mesh) -> MatrixResult<Vec<Real>> {
    flux.check_mesh(mesh)?;
    let mut out = vec![0.0; mesh.n_cells()];
    for (f, &phi) in flux.internal().iter().enumerate() {
        out[mesh.owner(f)] += phi;
        out[mesh.neighbour(f)] -= phi;
    }
    for (b, &phi) in flux.boundary().iter().enumerate() {
        out[mesh.boundary_owner(b)] += phi;
    }
    Ok(out)
}

/// `sum_f F_f / V`, the explicit divergence of a face flux.
pub fn surface_integrate(flux: &SurfaceScalarField, mesh: &Mesh) -> MatrixResult<Vec<Real>> {
    let mut out = surface_sum(flux, mesh)?;
    for (cell, v) in out.iter_mut().enumerate() {
        *v /= mesh.volume(cell);
    }
    Ok(out)
}
