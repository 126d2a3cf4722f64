//! Case validation logic.

use std::collections::HashSet;

use pf_matrix::ConvectionScheme;

use crate::schema::{Case, FieldDef, FluxDef, FluxValuesDef, MeshDef, ModeDef, PatchDef, ValuesDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(field, v, "must be positive and finite"));
    }
    Ok(())
}

/// Counts of the mesh a case describes.
struct Sizes {
    cells: usize,
    internal_faces: usize,
    boundary_faces: usize,
}

pub fn validate_case(case: &Case) -> Result<(), ValidationError> {
    let sizes = match case.mesh {
        MeshDef::Structured1d {
            cells,
            length_m,
            area_m2,
        } => {
            if cells == 0 {
                return Err(invalid("mesh cells", cells, "must be at least 1"));
            }
            positive("mesh length_m", length_m)?;
            positive("mesh area_m2", area_m2)?;
            Sizes {
                cells,
                internal_faces: cells - 1,
                boundary_faces: 2,
            }
        }
    };

    positive("time dt_s", case.time.dt_s)?;

    let scheme_entries = case.schemes.default.iter().chain(case.schemes.div.values());
    for scheme in scheme_entries {
        if scheme.parse::<ConvectionScheme>().is_err() {
            return Err(invalid("schemes", scheme, "unknown convection scheme"));
        }
    }

    let mut names = HashSet::new();
    for field in &case.fields {
        if !names.insert(field.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: field.name.clone(),
                context: "fields".to_string(),
            });
        }
        validate_field(field, &sizes)?;
    }

    let mut flux_names = HashSet::new();
    for flux in &case.fluxes {
        if !flux_names.insert(flux.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: flux.name.clone(),
                context: "fluxes".to_string(),
            });
        }
        validate_flux(flux, &sizes)?;
    }

    let solver_fields = match &case.solver.mode {
        ModeDef::Plain => vec![],
        ModeDef::Density { rho } => vec![rho],
        ModeDef::Phase { alpha, rho } => vec![alpha, rho],
    };
    for name in solver_fields {
        if !names.contains(name.as_str()) {
            return Err(ValidationError::MissingReference {
                name: name.clone(),
                context: "solver mode".to_string(),
            });
        }
    }
    if !case.options.is_empty() && !flux_names.contains(case.solver.phi.as_str()) {
        return Err(ValidationError::MissingReference {
            name: case.solver.phi.clone(),
            context: "solver phi".to_string(),
        });
    }

    for (name, dict) in &case.options {
        if let Err(e) = dict.type_name(name) {
            return Err(invalid(format!("option '{name}'"), "", &e.to_string()));
        }
    }

    Ok(())
}

fn validate_values(
    context: &str,
    values: &ValuesDef,
    n_components: usize,
    cells: usize,
) -> Result<(), ValidationError> {
    let all = match values {
        ValuesDef::Uniform(c) => vec![c],
        ValuesDef::Cells(list) => {
            if list.len() != cells {
                return Err(invalid(context, list.len(), &format!("expected {cells} cell values")));
            }
            list.iter().collect()
        }
    };
    for c in all {
        let c = c.as_slice();
        if c.len() != n_components {
            return Err(invalid(
                context,
                format!("{c:?}"),
                &format!("expected {n_components} components"),
            ));
        }
        if c.iter().any(|v| !v.is_finite()) {
            return Err(invalid(context, format!("{c:?}"), "must be finite"));
        }
    }
    Ok(())
}

fn validate_field(field: &FieldDef, sizes: &Sizes) -> Result<(), ValidationError> {
    let n = field.kind.n_components();
    let context = format!("field '{}'", field.name);
    validate_values(&context, &field.values, n, sizes.cells)?;
    if let Some(old) = &field.old_values {
        validate_values(&format!("{context} old_values"), old, n, sizes.cells)?;
    }

    let mut faces = HashSet::new();
    for patch in &field.boundary {
        let face = patch.face();
        if face >= sizes.boundary_faces {
            return Err(invalid(
                format!("{context} boundary face"),
                face,
                &format!("mesh has {} boundary faces", sizes.boundary_faces),
            ));
        }
        if !faces.insert(face) {
            return Err(ValidationError::DuplicateName {
                name: face.to_string(),
                context: format!("{context} boundary"),
            });
        }
        if let PatchDef::Fixed { value, .. } = patch {
            let c = value.as_slice();
            if c.len() != n || c.iter().any(|v| !v.is_finite()) {
                return Err(invalid(
                    format!("{context} boundary face {face}"),
                    format!("{c:?}"),
                    &format!("expected {n} finite components"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_flux(flux: &FluxDef, sizes: &Sizes) -> Result<(), ValidationError> {
    let context = format!("flux '{}'", flux.name);
    match &flux.values {
        FluxValuesDef::Velocity { velocity, scale } => {
            if velocity.iter().chain([scale]).any(|v| !v.is_finite()) {
                return Err(invalid(context, format!("{velocity:?}"), "must be finite"));
            }
        }
        FluxValuesDef::Faces { internal, boundary } => {
            for (part, values, expected) in [
                ("internal", internal, sizes.internal_faces),
                ("boundary", boundary, sizes.boundary_faces),
            ] {
                if values.len() != expected {
                    return Err(invalid(
                        format!("{context} {part}"),
                        values.len(),
                        &format!("expected {expected} face values"),
                    ));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(invalid(format!("{context} {part}"), format!("{values:?}"), "must be finite"));
                }
            }
        }
    }
    Ok(())
}
