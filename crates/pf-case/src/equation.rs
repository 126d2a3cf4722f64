//! Baseline transport equations, as a solver would assemble them before
//! calling its options.

use std::any::Any;
use std::borrow::Cow;

use pf_fields::{FieldValue, Scalar, VolScalarField};
use pf_matrix::{FvMatrix, Schemes, fvc, fvm};
use pf_options::laplacian::diffusion;
use pf_options::{DiffusivityProvider, One, TransportDiffusivity};

use crate::build::CaseState;
use crate::schema::ModeDef;
use crate::{CaseError, CaseResult};

/// Name diffusivity lookup errors are reported under.
const BASELINE: &str = "baseline";

/// `d(s psi)/dt + div(phi, psi) - laplacian(a D, psi)`.
///
/// The storage weight `s` follows the case mode. `D` is resolved the way the
/// volume-fraction option resolves it, and `a` is the phase fraction in
/// phase mode, one otherwise. The density field instead carries the explicit
/// continuity flux `sum_f phi` in its source.
///
/// Without a flux named after the solver's `phi` there is no convection and
/// diffusion falls back to `D.<field>` alone.
pub fn baseline_equation<T: FieldValue>(
    state: &CaseState,
    field: &str,
) -> CaseResult<FvMatrix<T>> {
    let mesh = &state.mesh;
    let psi = state.registry.lookup::<T>(field)?;

    let is_density = match &state.mode {
        ModeDef::Plain => false,
        ModeDef::Density { rho } | ModeDef::Phase { rho, .. } => rho == field,
    };
    let mut eqn = match &state.mode {
        ModeDef::Plain => fvm::ddt(psi, mesh, &state.time)?,
        ModeDef::Density { rho } if rho == field => fvm::ddt(psi, mesh, &state.time)?,
        ModeDef::Density { rho } => fvm::ddt_rho(state.scalar(rho)?, psi, mesh, &state.time)?,
        ModeDef::Phase { alpha, rho } if rho == field => {
            fvm::ddt_rho(state.scalar(alpha)?, psi, mesh, &state.time)?
        }
        ModeDef::Phase { alpha, rho } => {
            let weight = VolScalarField::product(state.scalar(alpha)?, state.scalar(rho)?);
            fvm::ddt_rho(&weight, psi, mesh, &state.time)?
        }
    };

    let phi = state.registry.lookup_surface(&state.phi).ok();

    if is_density {
        if let Some(phi) = phi {
            let scalar = (&mut eqn as &mut dyn Any)
                .downcast_mut::<FvMatrix<Scalar>>()
                .ok_or_else(|| CaseError::Build {
                    what: format!("density field {field} must be scalar, found {}", T::RANK),
                })?;
            let net = fvc::surface_sum(phi, mesh)?;
            for (src, out) in scalar.source_mut().iter_mut().zip(net) {
                *src -= out;
            }
        }
        return Ok(eqn);
    }

    let d = match phi {
        Some(phi) => {
            let scheme = state.schemes.convection(&Schemes::div_key(&state.phi, field));
            eqn.add_matrix(&fvm::div(phi, psi, scheme, mesh)?)?;
            Some(TransportDiffusivity.diffusivity(&state.ctx(), BASELINE, field, phi)?)
        }
        None => state
            .registry
            .lookup::<Scalar>(&format!("D.{field}"))
            .ok()
            .map(Cow::Borrowed),
    };

    if let Some(d) = d {
        let term = match &state.mode {
            ModeDef::Phase { alpha, .. } => diffusion(state.scalar(alpha)?, &d, psi, mesh)?,
            ModeDef::Plain | ModeDef::Density { .. } => diffusion(&One, &d, psi, mesh)?,
        };
        eqn.add_matrix(&term)?;
    }

    Ok(eqn)
}
