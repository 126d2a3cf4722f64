//! Interpolation schemes for convection terms.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pf_core::Real;
use pf_fields::SurfaceScalarField;
use pf_mesh::Mesh;

use crate::error::MatrixError;

/// How a convected face value is built from its two cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvectionScheme {
    /// Take the upstream cell.
    #[default]
    Upwind,
    /// Distance-weighted average of owner and neighbour.
    Linear,
}

impl ConvectionScheme {
    /// Owner weight of each internal face for the given flux.
    pub fn weights(&self, flux: &SurfaceScalarField, mesh: &Mesh) -> Vec<Real> {
        match self {
            ConvectionScheme::Upwind => flux
                .internal()
                .iter()
                .map(|&f| if f >= 0.0 { 1.0 } else { 0.0 })
                .collect(),
            ConvectionScheme::Linear => mesh.weights().to_vec(),
        }
    }
}

impl FromStr for ConvectionScheme {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the "Gauss <scheme>" spelling as well as the bare name
        let name = s.trim().strip_prefix("Gauss").map_or(s, str::trim).trim();
        match name {
            "upwind" => Ok(ConvectionScheme::Upwind),
            "linear" => Ok(ConvectionScheme::Linear),
            _ => Err(MatrixError::UnknownScheme {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConvectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvectionScheme::Upwind => write!(f, "upwind"),
            ConvectionScheme::Linear => write!(f, "linear"),
        }
    }
}

/// Scheme table keyed by term, e.g. `div(phi,U)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schemes {
    entries: BTreeMap<String, ConvectionScheme>,
    default: Option<ConvectionScheme>,
}

impl Schemes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, scheme: ConvectionScheme) -> Self {
        self.default = Some(scheme);
        self
    }

    pub fn insert(&mut self, term: impl Into<String>, scheme: ConvectionScheme) {
        self.entries.insert(term.into(), scheme);
    }

    /// Scheme for `term`, falling back to the default entry, then upwind.
    pub fn convection(&self, term: &str) -> ConvectionScheme {
        self.entries
            .get(term)
            .copied()
            .or(self.default)
            .unwrap_or_default()
    }

    /// Key of the convection term of `field` transported by `flux`.
    pub fn div_key(flux: &str, field: &str) -> String {
        format!("div({flux},{field})")
    }
}
