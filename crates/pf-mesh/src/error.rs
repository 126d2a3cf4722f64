//! Mesh-specific error types.

use pf_core::{CellId, FaceId, PfError};

/// Mesh construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face refers to a cell that doesn't exist.
    InvalidCellRef { face: FaceId, cell: CellId },

    /// An internal face has the same cell on both sides.
    SelfNeighbour { face: FaceId, cell: CellId },

    /// A cell has a zero, negative or non-finite volume.
    BadVolume { cell: CellId, volume: f64 },

    /// A face has a zero or non-finite area vector.
    BadArea { face: FaceId, area: f64 },

    /// Two cells share a face but their centres coincide.
    DegenerateSpacing { face: FaceId },

    /// Cell-to-face addressing is inconsistent with the face list.
    InconsistentAddressing { cell: CellId },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::InvalidCellRef { face, cell } => {
                write!(f, "Face {} refers to non-existent cell {}", face, cell)
            }
            MeshError::SelfNeighbour { face, cell } => {
                write!(f, "Face {} has cell {} on both sides", face, cell)
            }
            MeshError::BadVolume { cell, volume } => {
                write!(f, "Cell {} has invalid volume {}", cell, volume)
            }
            MeshError::BadArea { face, area } => {
                write!(f, "Face {} has invalid area magnitude {}", face, area)
            }
            MeshError::DegenerateSpacing { face } => {
                write!(f, "Face {} joins cells with coincident centres", face)
            }
            MeshError::InconsistentAddressing { cell } => {
                write!(f, "Cell {} has inconsistent face addressing", cell)
            }
        }
    }
}

impl std::error::Error for MeshError {}

impl From<MeshError> for PfError {
    fn from(err: MeshError) -> Self {
        PfError::Invariant {
            what: err.to_string(),
        }
    }
}
