//! Volume-fraction (porosity) correction of transport equations.
//!
//! A solver assembles its equations for the fluid as if it filled every
//! cell. Where a fixed solid phase occupies part of a cell, only the fraction
//! `e = alpha.<phase>` is open to the fluid. This option adds the difference
//! between the porous and the plain equation:
//!
//! - storage: `d(e s psi)/dt` instead of `d(s psi)/dt`;
//! - convection: the interstitial flux `F / e` for momentum, `e`-weighted
//!   convection for other fields, and the explicit `(e - 1) div(F)` for
//!   continuity;
//! - diffusion: `a e D` instead of `a D`.
//!
//! Flux and velocity are superficial and are never rescaled twice. With
//! `e = 1` everywhere the correction is exactly zero.

use std::any::Any;

use pf_core::{Dimensions, Real, ensure_all_finite};
use pf_fields::{
    FieldValue, Scalar, SphericalTensor, SurfaceScalarField, SymmTensor, Tensor, Vector,
    VolField, VolScalarField,
};
use pf_matrix::{FvContext, FvMatrix, Schemes};
use tracing::{debug, info, warn};

use crate::alpha::{One, Product, all_finite};
use crate::config::VolumeFractionConfig;
use crate::ddt::ddt_correction;
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::dict::OptionDict;
use crate::diffusivity::{DiffusivityProvider, TransportDiffusivity};
use crate::div::{continuity_correction, div_correction, momentum_div_correction};
use crate::error::{OptionError, OptionResult};
use crate::laplacian::laplacian_correction;
use crate::option::{FvOption, SupMode};

/// Registered type name.
pub const TYPE_NAME: &str = "volumeFractionSource";

/// What a corrected field is, which decides the kernels applied to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    /// The density field: storage and explicit continuity.
    Density,
    /// The velocity field: storage and interstitial-flux convection.
    Momentum,
    /// Any other field: storage, convection and diffusion.
    Transported,
}

/// A built correction, not yet added to any equation.
#[derive(Clone, Debug, PartialEq)]
pub struct Correction<T> {
    pub matrix: FvMatrix<T>,
    pub role: FieldRole,
    pub degenerate_faces: u64,
}

#[derive(Debug)]
pub struct VolumeFractionSource {
    name: String,
    config: VolumeFractionConfig,
    diffusivity: Box<dyn DiffusivityProvider>,
    diagnostics: Diagnostics,
}

impl VolumeFractionSource {
    pub fn new(name: impl Into<String>, dict: &OptionDict) -> OptionResult<Self> {
        let name = name.into();
        let config = VolumeFractionConfig::from_dict(&name, dict)?;
        if config.fields.is_empty() {
            warn!(option = %name, "no fields listed, option will have no effect");
        }
        Ok(Self {
            name,
            config,
            diffusivity: Box::new(TransportDiffusivity),
            diagnostics: Diagnostics::new(),
        })
    }

    /// Boxed constructor for the option registry.
    pub fn create(name: &str, dict: &OptionDict) -> OptionResult<Box<dyn FvOption>> {
        Ok(Box::new(Self::new(name, dict)?))
    }

    /// Replace the diffusivity lookup.
    pub fn with_diffusivity(mut self, provider: Box<dyn DiffusivityProvider>) -> Self {
        self.diffusivity = provider;
        self
    }

    pub fn config(&self) -> &VolumeFractionConfig {
        &self.config
    }

    pub fn role(&self, field: &str) -> FieldRole {
        if field == self.config.rho {
            FieldRole::Density
        } else if field == self.config.u {
            FieldRole::Momentum
        } else {
            FieldRole::Transported
        }
    }

    fn configuration(&self, what: impl Into<String>) -> OptionError {
        OptionError::configuration(&self.name, what)
    }

    /// The volume fraction `alpha.<phase>`, checked for dimensions, size and
    /// finite cell and boundary values.
    pub fn volume_fraction<'a>(&self, ctx: &FvContext<'a>) -> OptionResult<&'a VolScalarField> {
        let name = self.config.alpha_name();
        let e = ctx
            .registry
            .lookup::<Scalar>(&name)
            .map_err(|err| self.configuration(format!("volume fraction: {err}")))?;
        e.check_dimensions(Dimensions::DIMLESS)
            .map_err(|err| self.configuration(err.to_string()))?;
        e.check_mesh(ctx.mesh)
            .map_err(|err| self.configuration(err.to_string()))?;
        let mesh = ctx.mesh;
        let boundary: Vec<Real> = (0..mesh.n_boundary_faces())
            .map(|b| e.boundary_value(b, mesh.boundary_owner(b)))
            .collect();
        ensure_all_finite(e.internal(), "volume fraction")
            .and_then(|()| ensure_all_finite(&boundary, "volume fraction boundary"))
            .map_err(|err| self.configuration(format!("{name}: {err}")))?;
        Ok(e)
    }

    /// The superficial flux, which must be volumetric or mass flux.
    pub fn flux<'a>(&self, ctx: &FvContext<'a>) -> OptionResult<&'a SurfaceScalarField> {
        let phi = ctx
            .registry
            .lookup_surface(&self.config.phi)
            .map_err(|err| self.configuration(format!("flux: {err}")))?;
        let dims = phi.dimensions();
        if dims != Dimensions::VOLUMETRIC_FLUX && dims != Dimensions::MASS_FLUX {
            return Err(self.configuration(format!(
                "flux {} has dimensions {dims}, expected {} or {}",
                phi.name(),
                Dimensions::VOLUMETRIC_FLUX,
                Dimensions::MASS_FLUX
            )));
        }
        phi.check_mesh(ctx.mesh)
            .map_err(|err| self.configuration(err.to_string()))?;
        Ok(phi)
    }

    fn check_mode(&self, ctx: &FvContext<'_>, mode: SupMode<'_>) -> OptionResult<()> {
        let fields: Vec<&VolScalarField> = match mode {
            SupMode::Plain => vec![],
            SupMode::Density(rho) => vec![rho],
            SupMode::DensityPhase(alpha, rho) => vec![alpha, rho],
        };
        for field in fields {
            field
                .check_mesh(ctx.mesh)
                .map_err(|err| self.configuration(err.to_string()))?;
        }
        Ok(())
    }

    /// Storage weights `(s, s0)` of the time derivative.
    fn storage_weights(&self, role: FieldRole, mode: SupMode<'_>, n: usize) -> (Vec<Real>, Vec<Real>) {
        match (role, mode) {
            (_, SupMode::Plain) | (FieldRole::Density, SupMode::Density(_)) => {
                (vec![1.0; n], vec![1.0; n])
            }
            (FieldRole::Density, SupMode::DensityPhase(alpha, _)) => {
                (alpha.internal().to_vec(), alpha.old_or_current().to_vec())
            }
            (_, SupMode::Density(rho)) => (rho.internal().to_vec(), rho.old_or_current().to_vec()),
            (_, SupMode::DensityPhase(alpha, rho)) => {
                let ar = VolScalarField::product(alpha, rho);
                (ar.internal().to_vec(), ar.old_or_current().to_vec())
            }
        }
    }

    /// Build the correction for `eqn` without touching it.
    ///
    /// Returns `None` when the option does not apply to the equation's field.
    pub fn correction<T: FieldValue>(
        &self,
        ctx: &FvContext<'_>,
        eqn: &FvMatrix<T>,
        mode: SupMode<'_>,
    ) -> OptionResult<Option<Correction<T>>> {
        let field = eqn.psi_name();
        if self.config.field_index(field).is_none() {
            return Ok(None);
        }
        eqn.check_mesh(ctx.mesh)?;
        self.check_mode(ctx, mode)?;

        let mesh = ctx.mesh;
        let e = self.volume_fraction(ctx)?;
        let flux = self.flux(ctx)?;
        let psi = ctx
            .registry
            .lookup::<T>(field)
            .map_err(|err| self.configuration(err.to_string()))?;
        psi.check_mesh(mesh)
            .map_err(|err| self.configuration(err.to_string()))?;

        let role = self.role(field);
        let mut matrix = eqn.zeros_like();
        let mut degenerate_faces = 0;

        let (s, s0) = self.storage_weights(role, mode, mesh.n_cells());
        matrix.add_matrix(&ddt_correction(e, &s, &s0, psi, mesh, ctx.time)?)?;

        let scheme = ctx.schemes.convection(&Schemes::div_key(flux.name(), field));
        match role {
            FieldRole::Density => {
                let scalar = (&mut matrix as &mut dyn Any)
                    .downcast_mut::<FvMatrix<Scalar>>()
                    .ok_or_else(|| {
                        self.configuration(format!(
                            "density field {field} must be scalar, found {}",
                            T::RANK
                        ))
                    })?;
                continuity_correction(e, flux, scalar, mesh)?;
            }
            FieldRole::Momentum => {
                let momentum = momentum_div_correction(e, flux, scheme, psi, mesh)?;
                degenerate_faces = momentum.degenerate_faces;
                matrix.add_matrix(&momentum.matrix)?;
            }
            FieldRole::Transported => {
                matrix.add_matrix(&div_correction(e, flux, scheme, psi, mesh)?)?;
                let d = self.diffusivity.diffusivity(ctx, &self.name, field, flux)?;
                matrix.add_matrix(&self.diffusion(ctx, mode, e, &d, psi)?)?;
            }
        }

        Ok(Some(Correction {
            matrix,
            role,
            degenerate_faces,
        }))
    }

    fn diffusion<T: FieldValue>(
        &self,
        ctx: &FvContext<'_>,
        mode: SupMode<'_>,
        e: &VolScalarField,
        d: &VolScalarField,
        psi: &VolField<T>,
    ) -> OptionResult<FvMatrix<T>> {
        let mesh = ctx.mesh;
        let anisotropy = match &self.config.anisotropy {
            Some(name) => {
                let k = ctx
                    .registry
                    .lookup::<SymmTensor>(name)
                    .map_err(|err| self.configuration(format!("anisotropy: {err}")))?;
                k.check_dimensions(Dimensions::DIMLESS)
                    .map_err(|err| self.configuration(err.to_string()))?;
                k.check_mesh(mesh)
                    .map_err(|err| self.configuration(err.to_string()))?;
                if !all_finite(k) {
                    return Err(self.configuration(format!("anisotropy {name} is not finite")));
                }
                Some(k)
            }
            None => None,
        };

        let m = match (mode, anisotropy) {
            (SupMode::DensityPhase(alpha, _), Some(k)) => {
                laplacian_correction(&Product(alpha, k), e, d, psi, mesh)?
            }
            (SupMode::DensityPhase(alpha, _), None) => laplacian_correction(alpha, e, d, psi, mesh)?,
            (_, Some(k)) => laplacian_correction(k, e, d, psi, mesh)?,
            (_, None) => laplacian_correction(&One, e, d, psi, mesh)?,
        };
        Ok(m)
    }

    /// Add the correction to `eqn`.
    ///
    /// Fields not configured are skipped. On error `eqn` is unchanged.
    pub fn add_sup<T: FieldValue>(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<T>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        let Some(correction) = self.correction(ctx, eqn, mode)? else {
            debug!(option = %self.name, field = eqn.psi_name(), "field not corrected, skipping");
            self.diagnostics.record_skip();
            return Ok(());
        };

        eqn.add_matrix(&correction.matrix)?;

        self.diagnostics.record_call();
        if correction.degenerate_faces > 0 {
            self.diagnostics.record_degenerate(correction.degenerate_faces);
            warn!(
                option = %self.name,
                field = eqn.psi_name(),
                faces = correction.degenerate_faces,
                "vanishing volume fraction, convective flux removed on faces"
            );
        }
        debug!(
            option = %self.name,
            field = eqn.psi_name(),
            mode = mode.label(),
            role = ?correction.role,
            "volume fraction correction applied"
        );
        Ok(())
    }

    pub fn add_sup_scalar(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Scalar>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        self.add_sup(ctx, eqn, mode)
    }

    pub fn add_sup_vector(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Vector>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        self.add_sup(ctx, eqn, mode)
    }

    pub fn add_sup_symm_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<SymmTensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        self.add_sup(ctx, eqn, mode)
    }

    pub fn add_sup_spherical_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<SphericalTensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        self.add_sup(ctx, eqn, mode)
    }

    pub fn add_sup_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Tensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        self.add_sup(ctx, eqn, mode)
    }

    /// Re-read settings, keeping the current ones if `dict` is invalid.
    ///
    /// `dict` needs the same `type` entry the option was built from.
    pub fn read(&mut self, dict: &OptionDict) -> OptionResult<()> {
        let type_name = dict.type_name(&self.name)?;
        if type_name != TYPE_NAME {
            return Err(self.configuration(format!(
                "cannot re-read as {type_name}, option is {TYPE_NAME}"
            )));
        }
        let config = VolumeFractionConfig::from_dict(&self.name, dict)?;
        if config != self.config {
            info!(option = %self.name, phase = %config.phase, fields = ?config.fields, "settings re-read");
        }
        self.config = config;
        Ok(())
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

impl FvOption for VolumeFractionSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn field_names(&self) -> &[String] {
        &self.config.fields
    }

    fn is_active(&self) -> bool {
        self.config.active
    }

    fn add_sup_scalar(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Scalar>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        VolumeFractionSource::add_sup_scalar(self, ctx, eqn, mode)
    }

    fn add_sup_vector(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Vector>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        VolumeFractionSource::add_sup_vector(self, ctx, eqn, mode)
    }

    fn add_sup_symm_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<SymmTensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        VolumeFractionSource::add_sup_symm_tensor(self, ctx, eqn, mode)
    }

    fn add_sup_spherical_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<SphericalTensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        VolumeFractionSource::add_sup_spherical_tensor(self, ctx, eqn, mode)
    }

    fn add_sup_tensor(
        &self,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Tensor>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        VolumeFractionSource::add_sup_tensor(self, ctx, eqn, mode)
    }

    fn read(&mut self, dict: &OptionDict) -> OptionResult<()> {
        VolumeFractionSource::read(self, dict)
    }

    fn diagnostics(&self) -> DiagnosticsSnapshot {
        VolumeFractionSource::diagnostics(self)
    }
}
