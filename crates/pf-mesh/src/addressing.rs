//! Cell-to-face addressing.
//!
//! Provides, for every cell, the compact list of faces bounding it, so that
//! per-cell quantities can be evaluated from the cell's own perspective.

use crate::mesh::{BoundaryFace, InternalFace};

/// Reference to a face in one of the two face index spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceRef {
    Internal(usize),
    Boundary(usize),
}

/// Compressed cell -> faces map.
///
/// Cell `i`'s faces are `faces[offsets[i]..offsets[i + 1]]`, internal faces
/// first in face order, then boundary faces in face order.
#[derive(Debug, Clone, Default)]
pub struct CellFaceAddressing {
    offsets: Vec<usize>,
    faces: Vec<FaceRef>,
}

impl CellFaceAddressing {
    /// Build the addressing from face lists.
    pub fn build(
        n_cells: usize,
        internal: &[InternalFace],
        boundary: &[BoundaryFace],
    ) -> Self {
        let mut counts = vec![0usize; n_cells];
        for face in internal {
            counts[face.owner.as_usize()] += 1;
            counts[face.neighbour.as_usize()] += 1;
        }
        for face in boundary {
            counts[face.owner.as_usize()] += 1;
        }

        let mut offsets = Vec::with_capacity(n_cells + 1);
        offsets.push(0);
        for c in &counts {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + c);
        }

        let mut cursor = offsets[..n_cells].to_vec();
        let mut faces = vec![FaceRef::Internal(0); offsets[n_cells]];
        for (f, face) in internal.iter().enumerate() {
            for cell in [face.owner.as_usize(), face.neighbour.as_usize()] {
                faces[cursor[cell]] = FaceRef::Internal(f);
                cursor[cell] += 1;
            }
        }
        for (b, face) in boundary.iter().enumerate() {
            let cell = face.owner.as_usize();
            faces[cursor[cell]] = FaceRef::Boundary(b);
            cursor[cell] += 1;
        }

        Self { offsets, faces }
    }

    /// Number of cells covered.
    pub fn n_cells(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Faces bounding `cell`; empty if `cell` is out of range.
    pub fn faces_of(&self, cell: usize) -> &[FaceRef] {
        if cell >= self.n_cells() {
            return &[];
        }
        &self.faces[self.offsets[cell]..self.offsets[cell + 1]]
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub(crate) fn flat(&self) -> &[FaceRef] {
        &self.faces
    }
}
