//! Construction of mesh, fields and options from a validated case.

use pf_core::s;
use pf_fields::{
    FieldValue, ObjectRegistry, PatchValue, SphericalTensor, SurfaceScalarField, SymmTensor,
    Tensor, Vector, VolField, VolScalarField,
};
use pf_matrix::{ConvectionScheme, FvContext, Schemes, TimeState};
use pf_mesh::Mesh;
use pf_options::{OptionList, OptionRegistry, SupMode};
use tracing::debug;

use crate::schema::{
    Case, ComponentsDef, FieldDef, FieldKind, FluxDef, FluxValuesDef, MeshDef, ModeDef, PatchDef,
    ValuesDef,
};
use crate::{CaseError, CaseResult};

fn value<T: FieldValue>(field: &str, c: &ComponentsDef) -> CaseResult<T> {
    T::from_components(c.as_slice()).ok_or_else(|| CaseError::Build {
        what: format!(
            "field {field}: {} components given for a {} value",
            c.as_slice().len(),
            T::RANK
        ),
    })
}

fn cell_values<T: FieldValue>(def: &FieldDef, values: &ValuesDef, n: usize) -> CaseResult<Vec<T>> {
    match values {
        ValuesDef::Uniform(c) => Ok(vec![value(&def.name, c)?; n]),
        ValuesDef::Cells(list) => list.iter().map(|c| value(&def.name, c)).collect(),
    }
}

fn vol_field<T: FieldValue>(def: &FieldDef, mesh: &Mesh) -> CaseResult<VolField<T>> {
    let n = mesh.n_cells();
    let internal = cell_values::<T>(def, &def.values, n)?;
    let mut boundary = vec![PatchValue::ZeroGradient; mesh.n_boundary_faces()];
    for patch in &def.boundary {
        if let PatchDef::Fixed { face, value: v } = patch {
            let slot = boundary.get_mut(*face).ok_or_else(|| CaseError::Build {
                what: format!("field {}: no boundary face {face}", def.name),
            })?;
            *slot = PatchValue::Fixed(value(&def.name, v)?);
        }
    }
    let mut field = VolField::new(&def.name, def.dimensions, internal, boundary);
    if let Some(old) = &def.old_values {
        field = field.with_old_time(cell_values(def, old, n)?);
    }
    field.check_mesh(mesh)?;
    Ok(field)
}

fn flux_field(def: &FluxDef, mesh: &Mesh) -> CaseResult<SurfaceScalarField> {
    let (internal, boundary) = match &def.values {
        FluxValuesDef::Velocity { velocity, scale } => {
            let u = Vector::new(velocity[0], velocity[1], velocity[2]);
            let phi = SurfaceScalarField::from_velocity(&def.name, mesh, u).scaled(*scale);
            (phi.internal().to_vec(), phi.boundary().to_vec())
        }
        FluxValuesDef::Faces { internal, boundary } => (internal.clone(), boundary.clone()),
    };
    let phi = SurfaceScalarField::new(&def.name, def.dimensions, internal, boundary);
    phi.check_mesh(mesh)?;
    Ok(phi)
}

impl Case {
    pub fn build_mesh(&self) -> CaseResult<Mesh> {
        match self.mesh {
            MeshDef::Structured1d {
                cells,
                length_m,
                area_m2,
            } => Ok(Mesh::structured_1d(cells, length_m, area_m2)?),
        }
    }

    /// Every field and flux of the case, sized for `mesh`.
    pub fn build_registry(&self, mesh: &Mesh) -> CaseResult<ObjectRegistry> {
        let mut registry = ObjectRegistry::new();
        for def in &self.fields {
            match def.kind {
                FieldKind::Scalar => registry.insert(vol_field::<f64>(def, mesh)?)?,
                FieldKind::Vector => registry.insert(vol_field::<Vector>(def, mesh)?)?,
                FieldKind::SymmTensor => registry.insert(vol_field::<SymmTensor>(def, mesh)?)?,
                FieldKind::SphericalTensor => {
                    registry.insert(vol_field::<SphericalTensor>(def, mesh)?)?
                }
                FieldKind::Tensor => registry.insert(vol_field::<Tensor>(def, mesh)?)?,
            }
            debug!(field = %def.name, kind = ?def.kind, "field constructed");
        }
        for def in &self.fluxes {
            registry.insert_surface(flux_field(def, mesh)?)?;
        }
        Ok(registry)
    }

    pub fn build_schemes(&self) -> CaseResult<Schemes> {
        let mut schemes = Schemes::new();
        if let Some(default) = &self.schemes.default {
            schemes = schemes.with_default(default.parse::<ConvectionScheme>()?);
        }
        for (term, scheme) in &self.schemes.div {
            schemes.insert(term, scheme.parse::<ConvectionScheme>()?);
        }
        Ok(schemes)
    }

    pub fn build_time(&self) -> CaseResult<TimeState> {
        Ok(TimeState::new(s(self.time.dt_s))?)
    }

    /// The case's options, built through the option types this build knows.
    pub fn build_options(&self) -> CaseResult<OptionList> {
        Ok(OptionList::from_dicts(&OptionRegistry::with_builtin(), &self.options)?)
    }

    /// Mesh, fields, schemes and time step, ready for assembly.
    pub fn instantiate(&self) -> CaseResult<CaseState> {
        let mesh = self.build_mesh()?;
        let registry = self.build_registry(&mesh)?;
        Ok(CaseState {
            schemes: self.build_schemes()?,
            time: self.build_time()?,
            phi: self.solver.phi.clone(),
            mode: self.solver.mode.clone(),
            mesh,
            registry,
        })
    }
}

/// A case's state for one assembly pass.
#[derive(Debug)]
pub struct CaseState {
    pub mesh: Mesh,
    pub registry: ObjectRegistry,
    pub schemes: Schemes,
    pub time: TimeState,
    pub phi: String,
    pub mode: ModeDef,
}

impl CaseState {
    pub fn ctx(&self) -> FvContext<'_> {
        FvContext::new(&self.mesh, &self.registry, &self.schemes, &self.time)
    }

    pub fn scalar(&self, name: &str) -> CaseResult<&VolScalarField> {
        Ok(self.registry.lookup::<f64>(name)?)
    }

    /// The weighting mode with its fields resolved.
    pub fn sup_mode(&self) -> CaseResult<SupMode<'_>> {
        Ok(match &self.mode {
            ModeDef::Plain => SupMode::Plain,
            ModeDef::Density { rho } => SupMode::Density(self.scalar(rho)?),
            ModeDef::Phase { alpha, rho } => {
                SupMode::DensityPhase(self.scalar(alpha)?, self.scalar(rho)?)
            }
        })
    }
}
