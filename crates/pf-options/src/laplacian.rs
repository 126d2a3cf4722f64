//! Diffusion correction.
//!
//! The caller diffuses with `a D`; the porous form diffuses with `a e D`.
//! Both are interpolated to each face in owner/neighbour order, once per
//! face, and the correction is `-laplacian(Gamma_f - D_f, psi)`.

use pf_core::{Real, lerp};
use pf_fields::{FieldValue, VolField, VolScalarField};
use pf_matrix::{FvMatrix, MatrixResult, fvm};
use pf_mesh::Mesh;

use crate::alpha::AlphaField;

/// Porous and plain diffusivity on one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDiffusivity {
    /// `interp(a e D)`
    pub porous: Real,
    /// `interp(a D)`
    pub plain: Real,
}

impl FaceDiffusivity {
    pub fn difference(&self) -> Real {
        self.porous - self.plain
    }
}

/// Diffusivities of internal face `f`.
///
/// The result depends only on the face, never on which of its cells asks.
pub fn face_diffusivity<A: AlphaField + ?Sized>(
    alpha: &A,
    e: &VolScalarField,
    d: &VolScalarField,
    mesh: &Mesh,
    f: usize,
) -> FaceDiffusivity {
    let (o, n) = (mesh.owner(f), mesh.neighbour(f));
    let normal = mesh.normal(f);
    let (e, d) = (e.internal(), d.internal());
    let (a_o, a_n) = (alpha.cell_value(o, &normal), alpha.cell_value(n, &normal));
    let w = mesh.weight(f);
    FaceDiffusivity {
        porous: lerp(w, a_o * e[o] * d[o], a_n * e[n] * d[n]),
        plain: lerp(w, a_o * d[o], a_n * d[n]),
    }
}

/// Diffusivities of boundary face `b`, from the boundary values.
pub fn boundary_diffusivity<A: AlphaField + ?Sized>(
    alpha: &A,
    e: &VolScalarField,
    d: &VolScalarField,
    mesh: &Mesh,
    b: usize,
) -> FaceDiffusivity {
    let o = mesh.boundary_owner(b);
    let a = alpha.boundary_value(b, o, &mesh.boundary_normal(b));
    let (e_b, d_b) = (e.boundary_value(b, o), d.boundary_value(b, o));
    FaceDiffusivity {
        porous: a * e_b * d_b,
        plain: a * d_b,
    }
}

/// `-laplacian(interp(a e D) - interp(a D), psi)`.
pub fn laplacian_correction<T: FieldValue, A: AlphaField + ?Sized>(
    alpha: &A,
    e: &VolScalarField,
    d: &VolScalarField,
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    e.check_mesh(mesh)?;
    d.check_mesh(mesh)?;
    let internal: Vec<Real> = (0..mesh.n_internal_faces())
        .map(|f| face_diffusivity(alpha, e, d, mesh, f).difference())
        .collect();
    let boundary: Vec<Real> = (0..mesh.n_boundary_faces())
        .map(|b| boundary_diffusivity(alpha, e, d, mesh, b).difference())
        .collect();
    let mut m = fvm::laplacian_faces(&internal, &boundary, psi, mesh)?;
    m.scale(-1.0);
    Ok(m)
}

/// `-laplacian(interp(a D), psi)`: the plain diffusion term whose porous
/// counterpart [`laplacian_correction`] supplies.
pub fn diffusion<T: FieldValue, A: AlphaField + ?Sized>(
    alpha: &A,
    d: &VolScalarField,
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    d.check_mesh(mesh)?;
    let cells = d.internal();
    let internal: Vec<Real> = (0..mesh.n_internal_faces())
        .map(|f| {
            let (o, n, normal) = (mesh.owner(f), mesh.neighbour(f), mesh.normal(f));
            lerp(
                mesh.weight(f),
                alpha.cell_value(o, &normal) * cells[o],
                alpha.cell_value(n, &normal) * cells[n],
            )
        })
        .collect();
    let boundary: Vec<Real> = (0..mesh.n_boundary_faces())
        .map(|b| {
            let o = mesh.boundary_owner(b);
            alpha.boundary_value(b, o, &mesh.boundary_normal(b)) * d.boundary_value(b, o)
        })
        .collect();
    let mut m = fvm::laplacian_faces(&internal, &boundary, psi, mesh)?;
    m.scale(-1.0);
    Ok(m)
}
