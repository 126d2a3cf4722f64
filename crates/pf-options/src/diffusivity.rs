//! Diffusivity of a corrected field.
//!
//! The Laplacian correction needs the diffusivity the caller's equation was
//! assembled with. [`TransportDiffusivity`] finds it in the registry:
//!
//! 1. the field's own coefficient `D.<field>`, if registered;
//! 2. otherwise the effective transport property matching the flux:
//!    `nuEff` for a volumetric flux; for a mass flux `kappaEff` (temperature),
//!    `alphaEff` (energy) or `muEff` (everything else);
//! 3. otherwise zero, meaning the field is not diffused.
//!
//! Whatever is found must have the dimensions of the flux divided by a
//! length.

use std::borrow::Cow;

use pf_core::Dimensions;
use pf_fields::{FieldError, SurfaceScalarField, VolScalarField};
use pf_matrix::FvContext;

use crate::error::{OptionError, OptionResult};

/// Source of the diffusivity of a field.
pub trait DiffusivityProvider: Send + Sync + std::fmt::Debug {
    /// Per-cell diffusivity of `field` in equations transported by `flux`.
    fn diffusivity<'a>(
        &self,
        ctx: &FvContext<'a>,
        option: &str,
        field: &str,
        flux: &SurfaceScalarField,
    ) -> OptionResult<Cow<'a, VolScalarField>>;
}

/// Registry-backed provider following the usual transport-property names.
#[derive(Clone, Debug, Default)]
pub struct TransportDiffusivity;

/// Names of the energy variables that take `alphaEff`.
const ENERGY_FIELDS: [&str; 3] = ["e", "h", "he"];

impl TransportDiffusivity {
    /// Candidate registry names, most specific first.
    pub fn candidates(field: &str, flux_dims: Dimensions) -> Vec<String> {
        let mut names = vec![format!("D.{field}")];
        if flux_dims == Dimensions::VOLUMETRIC_FLUX {
            names.push("nuEff".to_string());
        } else if flux_dims == Dimensions::MASS_FLUX {
            let property = if field == "T" {
                "kappaEff"
            } else if ENERGY_FIELDS.contains(&field) {
                "alphaEff"
            } else {
                "muEff"
            };
            names.push(property.to_string());
        }
        names
    }
}

impl DiffusivityProvider for TransportDiffusivity {
    fn diffusivity<'a>(
        &self,
        ctx: &FvContext<'a>,
        option: &str,
        field: &str,
        flux: &SurfaceScalarField,
    ) -> OptionResult<Cow<'a, VolScalarField>> {
        let expected = flux.dimensions() / Dimensions::LENGTH;

        for name in Self::candidates(field, flux.dimensions()) {
            let found = match ctx.registry.lookup::<f64>(&name) {
                Ok(d) => d,
                Err(FieldError::NotFound { .. }) => continue,
                Err(e) => return Err(OptionError::configuration(option, e.to_string())),
            };
            found
                .check_dimensions(expected)
                .map_err(|e| OptionError::configuration(option, e.to_string()))?;
            found
                .check_mesh(ctx.mesh)
                .map_err(|e| OptionError::configuration(option, e.to_string()))?;
            tracing::trace!(option, field, diffusivity = %name, "diffusivity resolved");
            return Ok(Cow::Borrowed(found));
        }

        tracing::trace!(option, field, "no diffusivity, field is not diffused");
        Ok(Cow::Owned(VolScalarField::uniform(
            format!("D.{field}"),
            expected,
            ctx.mesh,
            0.0,
        )))
    }
}
