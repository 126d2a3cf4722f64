//! Implicit operators: each returns the matrix of one term.
//!
//! Sign convention follows `A psi = b`: a term `L(psi)` on the left-hand
//! side contributes its linear part to `A` and minus its constant part to
//! `b`.

use pf_core::{Real, lerp};
use pf_fields::{FieldValue, PatchValue, SurfaceScalarField, VolField, VolScalarField};
use pf_mesh::Mesh;

use crate::error::{MatrixError, MatrixResult};
use crate::matrix::FvMatrix;
use crate::schemes::ConvectionScheme;
use crate::time::TimeState;

/// Euler `d(psi)/dt`.
pub fn ddt<T: FieldValue>(
    psi: &VolField<T>,
    mesh: &Mesh,
    time: &TimeState,
) -> MatrixResult<FvMatrix<T>> {
    let ones = vec![1.0; mesh.n_cells()];
    ddt_weighted(&ones, &ones, psi, mesh, time)
}

/// Euler `d(rho psi)/dt`.
pub fn ddt_rho<T: FieldValue>(
    rho: &VolScalarField,
    psi: &VolField<T>,
    mesh: &Mesh,
    time: &TimeState,
) -> MatrixResult<FvMatrix<T>> {
    rho.check_mesh(mesh)?;
    ddt_weighted(rho.internal(), rho.old_or_current(), psi, mesh, time)
}

/// Euler `d(s psi)/dt` for a per-cell storage weight `s` with old-time
/// values `s0`:
/// `diag_P = s_P V_P / dt`, `b_P = s0_P V_P / dt psi0_P`.
pub fn ddt_weighted<T: FieldValue>(
    weight: &[Real],
    weight_old: &[Real],
    psi: &VolField<T>,
    mesh: &Mesh,
    time: &TimeState,
) -> MatrixResult<FvMatrix<T>> {
    psi.check_mesh(mesh)?;
    for (what, len) in [("storage weight", weight.len()), ("old storage weight", weight_old.len())] {
        if len != mesh.n_cells() {
            return Err(MatrixError::SizeMismatch {
                what,
                expected: mesh.n_cells(),
                actual: len,
            });
        }
    }

    let rdt = 1.0 / time.delta_t();
    let psi0 = psi.old_or_current();
    let mut m = FvMatrix::for_field(psi, mesh);
    for cell in 0..mesh.n_cells() {
        let v = mesh.volume(cell);
        m.diag_mut()[cell] = weight[cell] * v * rdt;
        m.source_mut()[cell] = psi0[cell] * (weight_old[cell] * v * rdt);
    }
    Ok(m)
}

/// `div(flux, psi)` with face values from `scheme`.
pub fn div<T: FieldValue>(
    flux: &SurfaceScalarField,
    psi: &VolField<T>,
    scheme: ConvectionScheme,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    flux.check_mesh(mesh)?;
    let weights = scheme.weights(flux, mesh);
    div_with_weights(flux, &weights, psi, mesh)
}

/// `div(flux, psi)` with explicit owner weights per internal face.
///
/// Splitting the weights from the flux lets a rescaled flux reuse the
/// weights of the flux it was derived from.
pub fn div_with_weights<T: FieldValue>(
    flux: &SurfaceScalarField,
    weights: &[Real],
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    flux.check_mesh(mesh)?;
    psi.check_mesh(mesh)?;
    if weights.len() != mesh.n_internal_faces() {
        return Err(MatrixError::SizeMismatch {
            what: "convection weights",
            expected: mesh.n_internal_faces(),
            actual: weights.len(),
        });
    }

    let mut m = FvMatrix::for_field(psi, mesh);
    for (f, (&phi, &w)) in flux.internal().iter().zip(weights).enumerate() {
        let (o, n) = (mesh.owner(f), mesh.neighbour(f));
        let lower = -w * phi;
        let upper = lower + phi;
        m.lower_mut()[f] = lower;
        m.upper_mut()[f] = upper;
        m.diag_mut()[o] -= lower;
        m.diag_mut()[n] -= upper;
    }
    for (b, &phi) in flux.boundary().iter().enumerate() {
        let o = mesh.boundary_owner(b);
        match psi.boundary()[b] {
            PatchValue::Fixed(v) => {
                let src = &mut m.source_mut()[o];
                *src = *src - v * phi;
            }
            PatchValue::ZeroGradient => m.diag_mut()[o] += phi,
        }
    }
    Ok(m)
}

/// `laplacian(gamma, psi)` with `gamma` linearly interpolated to faces.
pub fn laplacian<T: FieldValue>(
    gamma: &VolScalarField,
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    gamma.check_mesh(mesh)?;
    let cells = gamma.internal();
    let internal: Vec<Real> = (0..mesh.n_internal_faces())
        .map(|f| lerp(mesh.weight(f), cells[mesh.owner(f)], cells[mesh.neighbour(f)]))
        .collect();
    let boundary: Vec<Real> = (0..mesh.n_boundary_faces())
        .map(|b| gamma.boundary_value(b, mesh.boundary_owner(b)))
        .collect();
    laplacian_faces(&internal, &boundary, psi, mesh)
}

/// `laplacian(gamma_f, psi)` for a diffusivity already given per face.
///
/// Each internal face contributes the same coefficient to its owner and
/// neighbour rows, so the matrix is symmetric.
pub fn laplacian_faces<T: FieldValue>(
    gamma_internal: &[Real],
    gamma_boundary: &[Real],
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    psi.check_mesh(mesh)?;
    let sizes = [
        ("face diffusivity", mesh.n_internal_faces(), gamma_internal.len()),
        ("boundary diffusivity", mesh.n_boundary_faces(), gamma_boundary.len()),
    ];
    for (what, expected, actual) in sizes {
        if expected != actual {
            return Err(MatrixError::SizeMismatch {
                what,
                expected,
                actual,
            });
        }
    }

    let mut m = FvMatrix::for_field(psi, mesh);
    for (f, &g) in gamma_internal.iter().enumerate() {
        let c = g * mesh.mag_sf(f) * mesh.delta_coeff(f);
        let (o, n) = (mesh.owner(f), mesh.neighbour(f));
        m.upper_mut()[f] = c;
        m.lower_mut()[f] = c;
        m.diag_mut()[o] -= c;
        m.diag_mut()[n] -= c;
    }
    for (b, &g) in gamma_boundary.iter().enumerate() {
        if let PatchValue::Fixed(v) = psi.boundary()[b] {
            let o = mesh.boundary_owner(b);
            let c = g * mesh.boundary_mag_sf(b) * mesh.boundary_delta_coeff(b);
            m.diag_mut()[o] -= c;
            let src = &mut m.source_mut()[o];
            *src = *src - v * c;
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::{Dimensions, s};
    use pf_fields::{Vector, VolVectorField};

    fn mesh() -> Mesh {
        Mesh::structured_1d(3, 3.0, 1.0).unwrap()
    }

    #[test]
    fn ddt_uses_old_time() {
        let mesh = mesh();
        let time = TimeState::new(s(0.5)).unwrap();
        let psi = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 2.0)
            .with_old_time(vec![1.0, 1.0, 1.0]);
        let m = ddt(&psi, &mesh, &time).unwrap();
        assert_eq!(m.diag(), &[2.0; 3]);
        assert_eq!(m.source(), &[2.0; 3]);
        assert!(m.upper().iter().all(|&u| u == 0.0));
    }

    #[test]
    fn ddt_rho_weights_storage() {
        let mesh = mesh();
        let time = TimeState::new(s(1.0)).unwrap();
        let rho = VolScalarField::uniform("rho", Dimensions::DENSITY, &mesh, 3.0)
            .with_old_time(vec![2.0; 3]);
        let psi = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 5.0);
        let m = ddt_rho(&rho, &psi, &mesh, &time).unwrap();
        assert_eq!(m.diag(), &[3.0; 3]);
        assert_eq!(m.source(), &[10.0; 3]);
    }

    #[test]
    fn upwind_div_rows_sum_to_net_outflow() {
        let mesh = mesh();
        let phi = SurfaceScalarField::from_velocity("phi", &mesh, Vector::x());
        let psi = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 1.0);
        let m = div(&phi, &psi, ConvectionScheme::Upwind, &mesh).unwrap();
        // Interior cell: diag gets outflow, lower the inflow from upstream
        assert_eq!(m.diag()[1], 1.0);
        assert_eq!(m.lower()[0], -1.0);
        assert_eq!(m.upper()[0], 0.0);
        // Uniform psi with zero-gradient ends has zero convective residual
        let ax = m.apply(psi.internal(), &mesh);
        for (cell, v) in ax.iter().enumerate() {
            assert!(v.abs() < 1e-14, "cell {cell}: {v}");
        }
    }

    #[test]
    fn fixed_inlet_moves_to_source() {
        let mesh = mesh();
        let phi = SurfaceScalarField::from_velocity("phi", &mesh, Vector::x());
        let mut psi = VolVectorField::uniform("U", Dimensions::VELOCITY, &mesh, Vector::x());
        psi.set_patch(0, PatchValue::Fixed(Vector::new(2.0, 0.0, 0.0)));
        let m = div(&phi, &psi, ConvectionScheme::Linear, &mesh).unwrap();
        // Inlet flux is -1, so -F v = +v
        assert_eq!(m.source()[0], Vector::new(2.0, 0.0, 0.0));
        assert_eq!(m.upper()[0], 0.5);
        assert_eq!(m.lower()[0], -0.5);
    }

    #[test]
    fn laplacian_is_symmetric_and_conservative() {
        let mesh = mesh();
        let gamma = VolScalarField::new(
            "D",
            Dimensions::KINEMATIC_DIFFUSIVITY,
            vec![1.0, 2.0, 4.0],
            vec![PatchValue::ZeroGradient; 2],
        );
        let psi = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 0.0);
        let m = laplacian(&gamma, &psi, &mesh).unwrap();
        assert!(m.is_symmetric());
        assert_eq!(m.upper(), &[1.5, 3.0]);
        let col_sum: f64 = m.diag().iter().sum::<f64>() + m.upper().iter().sum::<f64>() * 2.0;
        assert!(col_sum.abs() < 1e-14);
    }

    #[test]
    fn laplacian_fixed_wall() {
        let mesh = mesh();
        let mut psi = VolScalarField::uniform("T", Dimensions::TEMPERATURE, &mesh, 0.0);
        psi.set_patch(1, PatchValue::Fixed(10.0));
        let m = laplacian_faces(&[1.0, 1.0], &[1.0, 1.0], &psi, &mesh).unwrap();
        // Half-cell distance to the wall: delta = 2
        assert_eq!(m.diag()[2], -3.0);
        assert_eq!(m.source()[2], -20.0);
        assert!(laplacian_faces(&[1.0], &[1.0, 1.0], &psi, &mesh).is_err());
    }
}
