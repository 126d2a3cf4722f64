//! The option interface seen by solvers.

use std::fmt::Debug;

use pf_fields::{FieldValue, Scalar, SphericalTensor, SymmTensor, Tensor, Vector, VolScalarField};
use pf_matrix::{FvContext, FvMatrix};

use crate::diagnostics::DiagnosticsSnapshot;
use crate::dict::OptionDict;
use crate::error::OptionResult;

/// How the caller's equation is weighted.
#[derive(Clone, Copy, Debug)]
pub enum SupMode<'a> {
    /// Incompressible: `d(psi)/dt + div(phi, psi) = ...`
    Plain,
    /// Compressible, weighted by density.
    Density(&'a VolScalarField),
    /// Phase-compressible, weighted by phase fraction and density.
    DensityPhase(&'a VolScalarField, &'a VolScalarField),
}

impl SupMode<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            SupMode::Plain => "plain",
            SupMode::Density(_) => "density",
            SupMode::DensityPhase(..) => "phase",
        }
    }
}

/// A correction or source that a solver attaches to its equations.
///
/// Options are deterministic functions of the case state: applying the same
/// option twice to copies of one equation gives identical results. Every
/// `add_sup_*` method either applies its whole contribution or leaves the
/// equation untouched.
pub trait FvOption: Send + Sync + Debug {
    /// Option name, as given in the case.
    fn name(&self) -> &str;

    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Fields this option applies to, in configuration order.
    fn field_names(&self) -> &[String];

    /// Inactive options are skipped by [`crate::OptionList`].
    fn is_active(&self) -> bool {
        true
    }

    /// Index of `field` in [`FvOption::field_names`], if the option applies.
    fn apply_to_field(&self, field: &str) -> Option<usize> {
        self.field_names().iter().position(|f| f == field)
    }

    /// Add to a scalar equation.
    ///
    /// # Arguments
    /// * `ctx` - Mesh, field registry, schemes and time step of the case
    /// * `eqn` - The caller's assembled equation, named after its unknown
    /// * `mode` - Weighting of the equation
    ///
    /// Default implementation does nothing.
    fn add_sup_scalar(
        &self,
        _ctx: &FvContext<'_>,
        _eqn: &mut FvMatrix<Scalar>,
        _mode: SupMode<'_>,
    ) -> OptionResult<()> {
        Ok(())
    }

    /// Add to a vector equation. Default implementation does nothing.
    fn add_sup_vector(
        &self,
        _ctx: &FvContext<'_>,
        _eqn: &mut FvMatrix<Vector>,
        _mode: SupMode<'_>,
    ) -> OptionResult<()> {
        Ok(())
    }

    /// Add to a symmetric-tensor equation. Default implementation does nothing.
    fn add_sup_symm_tensor(
        &self,
        _ctx: &FvContext<'_>,
        _eqn: &mut FvMatrix<SymmTensor>,
        _mode: SupMode<'_>,
    ) -> OptionResult<()> {
        Ok(())
    }

    /// Add to a spherical-tensor equation. Default implementation does nothing.
    fn add_sup_spherical_tensor(
        &self,
        _ctx: &FvContext<'_>,
        _eqn: &mut FvMatrix<SphericalTensor>,
        _mode: SupMode<'_>,
    ) -> OptionResult<()> {
        Ok(())
    }

    /// Add to a tensor equation. Default implementation does nothing.
    fn add_sup_tensor(
        &self,
        _ctx: &FvContext<'_>,
        _eqn: &mut FvMatrix<Tensor>,
        _mode: SupMode<'_>,
    ) -> OptionResult<()> {
        Ok(())
    }

    /// Re-read settings. On error the previous settings stay in force.
    fn read(&mut self, dict: &OptionDict) -> OptionResult<()>;

    /// Counters kept by the option, if any.
    fn diagnostics(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot::default()
    }
}

/// Routes a generic equation to the matching per-rank method of an option.
pub trait SupField: FieldValue {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()>;
}

impl SupField for Scalar {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        option.add_sup_scalar(ctx, eqn, mode)
    }
}

impl SupField for Vector {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        option.add_sup_vector(ctx, eqn, mode)
    }
}

impl SupField for SymmTensor {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        option.add_sup_symm_tensor(ctx, eqn, mode)
    }
}

impl SupField for SphericalTensor {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        option.add_sup_spherical_tensor(ctx, eqn, mode)
    }
}

impl SupField for Tensor {
    fn add_sup_to(
        option: &dyn FvOption,
        ctx: &FvContext<'_>,
        eqn: &mut FvMatrix<Self>,
        mode: SupMode<'_>,
    ) -> OptionResult<()> {
        option.add_sup_tensor(ctx, eqn, mode)
    }
}
