//! Core mesh data structures.

use nalgebra::Vector3;
use pf_core::{CellId, FaceId, Real};

use crate::addressing::{CellFaceAddressing, FaceRef};

/// A control volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub volume: Real,
    pub centre: Vector3<Real>,
}

/// A face shared by two cells.
///
/// The area vector points out of `owner` into `neighbour`, and
/// `owner < neighbour` always holds after the builder has normalised it.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalFace {
    pub id: FaceId,
    pub owner: CellId,
    pub neighbour: CellId,
    pub area: Vector3<Real>,
    pub centre: Vector3<Real>,
}

/// A face on the domain boundary; its area vector points out of the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFace {
    pub id: FaceId,
    pub owner: CellId,
    pub area: Vector3<Real>,
    pub centre: Vector3<Real>,
}

/// The mesh: a validated, immutable set of cells and faces plus derived geometry.
///
/// Internal and boundary faces live in separate index spaces, mirroring the
/// way face fields store internal and boundary values separately.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) cells: Vec<Cell>,
    pub(crate) internal_faces: Vec<InternalFace>,
    pub(crate) boundary_faces: Vec<BoundaryFace>,

    /// Owner weight of each internal face: `x_f = x_N + w (x_P - x_N)`.
    pub(crate) weights: Vec<Real>,
    /// `1/|C_N - C_P|` per internal face.
    pub(crate) delta_coeffs: Vec<Real>,
    /// `1/|C_f - C_P|` per boundary face.
    pub(crate) boundary_delta_coeffs: Vec<Real>,

    pub(crate) addressing: CellFaceAddressing,
}

impl Mesh {
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn n_internal_faces(&self) -> usize {
        self.internal_faces.len()
    }

    pub fn n_boundary_faces(&self) -> usize {
        self.boundary_faces.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn internal_faces(&self) -> &[InternalFace] {
        &self.internal_faces
    }

    pub fn boundary_faces(&self) -> &[BoundaryFace] {
        &self.boundary_faces
    }

    pub fn volume(&self, cell: usize) -> Real {
        self.cells[cell].volume
    }

    /// Cell volumes in cell order.
    pub fn volumes(&self) -> Vec<Real> {
        self.cells.iter().map(|c| c.volume).collect()
    }

    /// Owner cell index of internal face `f`.
    pub fn owner(&self, f: usize) -> usize {
        self.internal_faces[f].owner.as_usize()
    }

    /// Neighbour cell index of internal face `f`.
    pub fn neighbour(&self, f: usize) -> usize {
        self.internal_faces[f].neighbour.as_usize()
    }

    /// Owner cell index of boundary face `b`.
    pub fn boundary_owner(&self, b: usize) -> usize {
        self.boundary_faces[b].owner.as_usize()
    }

    pub fn weight(&self, f: usize) -> Real {
        self.weights[f]
    }

    pub fn weights(&self) -> &[Real] {
        &self.weights
    }

    pub fn delta_coeff(&self, f: usize) -> Real {
        self.delta_coeffs[f]
    }

    pub fn boundary_delta_coeff(&self, b: usize) -> Real {
        self.boundary_delta_coeffs[b]
    }

    /// `|S_f|` of internal face `f`.
    pub fn mag_sf(&self, f: usize) -> Real {
        self.internal_faces[f].area.norm()
    }

    /// `|S_b|` of boundary face `b`.
    pub fn boundary_mag_sf(&self, b: usize) -> Real {
        self.boundary_faces[b].area.norm()
    }

    /// Unit normal of internal face `f`, pointing owner to neighbour.
    pub fn normal(&self, f: usize) -> Vector3<Real> {
        let sf = &self.internal_faces[f].area;
        sf / sf.norm()
    }

    /// Outward unit normal of boundary face `b`.
    pub fn boundary_normal(&self, b: usize) -> Vector3<Real> {
        let sf = &self.boundary_faces[b].area;
        sf / sf.norm()
    }

    /// Every face touching `cell`, internal faces first.
    pub fn cell_faces(&self, cell: usize) -> &[FaceRef] {
        self.addressing.faces_of(cell)
    }

    /// The cell on the other side of internal face `f` as seen from `cell`.
    pub fn other_cell(&self, f: usize, cell: usize) -> Option<usize> {
        let (o, n) = (self.owner(f), self.neighbour(f));
        if cell == o {
            Some(n)
        } else if cell == n {
            Some(o)
        } else {
            None
        }
    }

    /// Uniform 1-D row of `n` hexahedral cells along x.
    ///
    /// Faces have area `area`; the two end faces are boundary faces
    /// (index 0 at x = 0, index 1 at x = length).
    pub fn structured_1d(n: usize, length: Real, area: Real) -> pf_core::PfResult<Mesh> {
        if n == 0 {
            return Err(pf_core::PfError::InvalidArg {
                what: "structured mesh needs at least one cell",
            });
        }
        let dx = length / n as Real;
        let mut builder = crate::MeshBuilder::new();
        let cells: Vec<CellId> = (0..n)
            .map(|i| builder.add_cell(area * dx, Vector3::new((i as Real + 0.5) * dx, 0.0, 0.0)))
            .collect();
        for i in 0..n.saturating_sub(1) {
            let x = (i as Real + 1.0) * dx;
            builder.add_face(
                cells[i],
                cells[i + 1],
                Vector3::new(area, 0.0, 0.0),
                Vector3::new(x, 0.0, 0.0),
            );
        }
        builder.add_boundary_face(
            cells[0],
            Vector3::new(-area, 0.0, 0.0),
            Vector3::zeros(),
        );
        builder.add_boundary_face(
            cells[n - 1],
            Vector3::new(area, 0.0, 0.0),
            Vector3::new(length, 0.0, 0.0),
        );
        builder.build()
    }
}
