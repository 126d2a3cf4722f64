//! Case schema definitions.

use std::collections::BTreeMap;

use pf_core::Dimensions;
use pf_options::OptionDict;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub name: String,
    pub mesh: MeshDef,
    pub time: TimeDef,
    #[serde(default)]
    pub schemes: SchemesDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub fluxes: Vec<FluxDef>,
    #[serde(default)]
    pub options: BTreeMap<String, OptionDict>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MeshDef {
    /// Cells along x between two boundary faces.
    Structured1d {
        cells: usize,
        length_m: f64,
        area_m2: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    pub dt_s: f64,
}

/// Convection schemes by term, e.g. `div(phi,U): Gauss linear`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub div: BTreeMap<String, String>,
}

/// How equations of this case are weighted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_phi")]
    pub phi: String,
    #[serde(default)]
    pub mode: ModeDef,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            phi: default_phi(),
            mode: ModeDef::default(),
        }
    }
}

fn default_phi() -> String {
    "phi".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModeDef {
    #[default]
    Plain,
    Density {
        rho: String,
    },
    Phase {
        alpha: String,
        rho: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    Vector,
    SymmTensor,
    SphericalTensor,
    Tensor,
}

impl FieldKind {
    pub fn n_components(self) -> usize {
        match self {
            FieldKind::Scalar | FieldKind::SphericalTensor => 1,
            FieldKind::Vector => 3,
            FieldKind::SymmTensor => 6,
            FieldKind::Tensor => 9,
        }
    }
}

/// A cell value: a bare number for one-component kinds, else a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ComponentsDef {
    One(f64),
    Many(Vec<f64>),
}

impl ComponentsDef {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            ComponentsDef::One(v) => std::slice::from_ref(v),
            ComponentsDef::Many(v) => v,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ValuesDef {
    Uniform(ComponentsDef),
    Cells(Vec<ComponentsDef>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatchDef {
    Fixed { face: usize, value: ComponentsDef },
    ZeroGradient { face: usize },
}

impl PatchDef {
    pub fn face(&self) -> usize {
        match self {
            PatchDef::Fixed { face, .. } | PatchDef::ZeroGradient { face } => *face,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Exponents of mass, length, time and temperature.
    #[serde(default)]
    pub dimensions: Dimensions,
    pub values: ValuesDef,
    /// Previous time step; the current values when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_values: Option<ValuesDef>,
    /// Boundary faces not listed are zero-gradient.
    #[serde(default)]
    pub boundary: Vec<PatchDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluxDef {
    pub name: String,
    #[serde(default = "volumetric_flux")]
    pub dimensions: Dimensions,
    pub values: FluxValuesDef,
}

fn volumetric_flux() -> Dimensions {
    Dimensions::VOLUMETRIC_FLUX
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FluxValuesDef {
    /// `U . S_f` of a uniform velocity, times `scale` (e.g. a density).
    Velocity {
        velocity: [f64; 3],
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    Faces {
        internal: Vec<f64>,
        boundary: Vec<f64>,
    },
}

fn unit_scale() -> f64 {
    1.0
}
