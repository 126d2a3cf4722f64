//! Divergence corrections.
//!
//! Three variants, chosen by the role of the corrected field:
//! - transported fields scale the caller's convection row by `e - 1`;
//! - momentum rescales the superficial flux to the interstitial flux
//!   `F / e_f` on every face;
//! - continuity adds the explicit `(e - 1) div(F)`.

use pf_core::{Real, lerp};
use pf_fields::{FieldValue, SurfaceScalarField, VolField, VolScalarField};
use pf_matrix::{ConvectionScheme, FvMatrix, MatrixResult, fvc, fvm};
use pf_mesh::Mesh;

use crate::ddt::excess;

/// Momentum correction plus the number of degenerate faces met.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentumCorrection<T> {
    pub matrix: FvMatrix<T>,
    pub degenerate_faces: u64,
}

/// `(e_P - 1)` times row `P` of `div(F, psi)`.
pub fn div_correction<T: FieldValue>(
    e: &VolScalarField,
    flux: &SurfaceScalarField,
    scheme: ConvectionScheme,
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<FvMatrix<T>> {
    let mut m = fvm::div(flux, psi, scheme, mesh)?;
    m.scale_rows(&excess(e), mesh)?;
    Ok(m)
}

/// Multiplier `1/e_f - 1` of the flux on each face, and how many faces
/// were degenerate.
///
/// Internal faces interpolate the inverse fraction,
/// `1/e_f = 1/e_N + lambda (1/e_P - 1/e_N)`; boundary faces take the owner
/// value. A face touching a cell with `e <= 0`, or whose inverse overflows,
/// gets `-1`, which cancels its convective flux entirely.
pub fn inverse_fraction_factors(e: &VolScalarField, mesh: &Mesh) -> (Vec<Real>, Vec<Real>, u64) {
    let cells = e.internal();
    let mut degenerate = 0u64;
    let mut checked = |k: Option<Real>| match k.filter(|k| k.is_finite()) {
        Some(k) => k,
        None => {
            degenerate += 1;
            CANCEL
        }
    };

    let internal: Vec<Real> = (0..mesh.n_internal_faces())
        .map(|f| {
            let (ep, en) = (cells[mesh.owner(f)], cells[mesh.neighbour(f)]);
            checked(
                (ep > 0.0 && en > 0.0).then(|| lerp(mesh.weight(f), 1.0 / ep, 1.0 / en) - 1.0),
            )
        })
        .collect();

    let boundary: Vec<Real> = (0..mesh.n_boundary_faces())
        .map(|b| {
            let ep = cells[mesh.boundary_owner(b)];
            checked((ep > 0.0).then(|| 1.0 / ep - 1.0))
        })
        .collect();

    (internal, boundary, degenerate)
}

/// Factor that removes a face's flux from the caller's term.
const CANCEL: Real = -1.0;

/// `F k` per face; a product that overflows cancels the face instead.
fn scale_flux(flux: &[Real], factors: &mut [Real], degenerate: &mut u64) -> Vec<Real> {
    flux.iter()
        .zip(factors.iter_mut())
        .map(|(f, k)| {
            let scaled = f * *k;
            if scaled.is_finite() {
                scaled
            } else {
                *degenerate += 1;
                *k = CANCEL;
                -f
            }
        })
        .collect()
}

/// `div(F (1/e_f - 1), U)` with the convection weights of the superficial
/// flux `F`.
pub fn momentum_div_correction<T: FieldValue>(
    e: &VolScalarField,
    flux: &SurfaceScalarField,
    scheme: ConvectionScheme,
    psi: &VolField<T>,
    mesh: &Mesh,
) -> MatrixResult<MomentumCorrection<T>> {
    flux.check_mesh(mesh)?;
    let (mut internal, mut boundary, mut degenerate_faces) = inverse_fraction_factors(e, mesh);
    let scaled = SurfaceScalarField::new(
        flux.name(),
        flux.dimensions(),
        scale_flux(flux.internal(), &mut internal, &mut degenerate_faces),
        scale_flux(flux.boundary(), &mut boundary, &mut degenerate_faces),
    );
    // Upwind direction comes from the superficial flux, so a cancelled face
    // removes exactly what the caller's term added.
    let weights = scheme.weights(flux, mesh);
    let matrix = fvm::div_with_weights(&scaled, &weights, psi, mesh)?;
    Ok(MomentumCorrection {
        matrix,
        degenerate_faces,
    })
}

/// Explicit continuity correction: `b_P -= (e_P - 1) sum_f F_f`.
pub fn continuity_correction(
    e: &VolScalarField,
    flux: &SurfaceScalarField,
    eqn: &mut FvMatrix<Real>,
    mesh: &Mesh,
) -> MatrixResult<()> {
    let net = fvc::surface_sum(flux, mesh)?;
    for ((src, k), out) in eqn.source_mut().iter_mut().zip(excess(e)).zip(net) {
        *src -= k * out;
    }
    Ok(())
}
