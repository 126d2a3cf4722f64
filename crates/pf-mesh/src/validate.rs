//! Mesh validation logic.

use pf_core::PfResult;

use crate::addressing::{CellFaceAddressing, FaceRef};
use crate::error::MeshError;
use crate::mesh::{BoundaryFace, Cell, InternalFace};

/// Validate the mesh structure: all references exist, volumes and areas are sane.
pub(crate) fn validate_structure(
    cells: &[Cell],
    internal: &[InternalFace],
    boundary: &[BoundaryFace],
) -> PfResult<()> {
    for cell in cells {
        if !(cell.volume.is_finite() && cell.volume > 0.0) {
            return Err(MeshError::BadVolume {
                cell: cell.id,
                volume: cell.volume,
            }
            .into());
        }
    }

    for face in internal {
        for cell in [face.owner, face.neighbour] {
            if cell.as_usize() >= cells.len() {
                return Err(MeshError::InvalidCellRef {
                    face: face.id,
                    cell,
                }
                .into());
            }
        }
        if face.owner == face.neighbour {
            return Err(MeshError::SelfNeighbour {
                face: face.id,
                cell: face.owner,
            }
            .into());
        }
        let mag = face.area.norm();
        if !(mag.is_finite() && mag > 0.0) {
            return Err(MeshError::BadArea {
                face: face.id,
                area: mag,
            }
            .into());
        }
    }

    for face in boundary {
        if face.owner.as_usize() >= cells.len() {
            return Err(MeshError::InvalidCellRef {
                face: face.id,
                cell: face.owner,
            }
            .into());
        }
        let mag = face.area.norm();
        if !(mag.is_finite() && mag > 0.0) {
            return Err(MeshError::BadArea {
                face: face.id,
                area: mag,
            }
            .into());
        }
    }

    Ok(())
}

/// Validate cell-to-face addressing against the face lists.
pub(crate) fn validate_addressing(
    cells: &[Cell],
    internal: &[InternalFace],
    boundary: &[BoundaryFace],
    addressing: &CellFaceAddressing,
) -> PfResult<()> {
    let offsets = addressing.offsets();
    if offsets.len() != cells.len() + 1 {
        return Err(MeshError::InconsistentAddressing {
            cell: cells.first().map_or(pf_core::CellId::from_index(0), |c| c.id),
        }
        .into());
    }

    for cell in cells {
        let i = cell.id.as_usize();
        for face in addressing.faces_of(i) {
            let touches = match *face {
                FaceRef::Internal(f) => internal
                    .get(f)
                    .is_some_and(|x| x.owner.as_usize() == i || x.neighbour.as_usize() == i),
                FaceRef::Boundary(b) => boundary.get(b).is_some_and(|x| x.owner.as_usize() == i),
            };
            if !touches {
                return Err(MeshError::InconsistentAddressing { cell: cell.id }.into());
            }
        }
    }

    // Each internal face appears twice, each boundary face once
    let expected = 2 * internal.len() + boundary.len();
    if addressing.flat().len() != expected {
        return Err(MeshError::InconsistentAddressing {
            cell: cells.first().map_or(pf_core::CellId::from_index(0), |c| c.id),
        }
        .into());
    }

    Ok(())
}
