//! Incremental mesh builder.

use nalgebra::Vector3;
use pf_core::{CellId, FaceId, PfResult, Real};

use crate::addressing::CellFaceAddressing;
use crate::error::MeshError;
use crate::mesh::{BoundaryFace, Cell, InternalFace, Mesh};
use crate::validate;

/// Builder for constructing a mesh incrementally.
///
/// Use `add_cell`, `add_face` and `add_boundary_face` to build up the mesh,
/// then call `build()` to validate it and derive the interpolation geometry.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    cells: Vec<Cell>,
    internal_faces: Vec<InternalFace>,
    boundary_faces: Vec<BoundaryFace>,
}

impl MeshBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell and return its ID.
    pub fn add_cell(&mut self, volume: Real, centre: Vector3<Real>) -> CellId {
        let id = CellId::from_index(self.cells.len() as u32);
        self.cells.push(Cell { id, volume, centre });
        id
    }

    /// Add an internal face between two cells.
    ///
    /// `area` points from `a` to `b`. If `a > b` the face is stored with the
    /// cells swapped and the area vector flipped, so the lower-numbered cell
    /// is always the owner.
    pub fn add_face(
        &mut self,
        a: CellId,
        b: CellId,
        area: Vector3<Real>,
        centre: Vector3<Real>,
    ) -> FaceId {
        let id = FaceId::from_index(self.internal_faces.len() as u32);
        let (owner, neighbour, area) = if a.index() > b.index() {
            (b, a, -area)
        } else {
            (a, b, area)
        };
        self.internal_faces.push(InternalFace {
            id,
            owner,
            neighbour,
            area,
            centre,
        });
        id
    }

    /// Add a boundary face with an outward-pointing area vector.
    ///
    /// Boundary faces are numbered separately from internal faces.
    pub fn add_boundary_face(
        &mut self,
        owner: CellId,
        area: Vector3<Real>,
        centre: Vector3<Real>,
    ) -> FaceId {
        let id = FaceId::from_index(self.boundary_faces.len() as u32);
        self.boundary_faces.push(BoundaryFace {
            id,
            owner,
            area,
            centre,
        });
        id
    }

    /// Build and validate the mesh, returning an immutable `Mesh`.
    pub fn build(self) -> PfResult<Mesh> {
        validate::validate_structure(&self.cells, &self.internal_faces, &self.boundary_faces)?;

        let (weights, delta_coeffs) = Self::internal_geometry(&self.cells, &self.internal_faces)?;
        let boundary_delta_coeffs = Self::boundary_geometry(&self.cells, &self.boundary_faces)?;

        let addressing =
            CellFaceAddressing::build(self.cells.len(), &self.internal_faces, &self.boundary_faces);
        validate::validate_addressing(
            &self.cells,
            &self.internal_faces,
            &self.boundary_faces,
            &addressing,
        )?;

        tracing::debug!(
            cells = self.cells.len(),
            internal_faces = self.internal_faces.len(),
            boundary_faces = self.boundary_faces.len(),
            "mesh built"
        );

        Ok(Mesh {
            cells: self.cells,
            internal_faces: self.internal_faces,
            boundary_faces: self.boundary_faces,
            weights,
            delta_coeffs,
            boundary_delta_coeffs,
            addressing,
        })
    }

    /// Owner weights and delta coefficients of the internal faces.
    fn internal_geometry(
        cells: &[Cell],
        faces: &[InternalFace],
    ) -> PfResult<(Vec<Real>, Vec<Real>)> {
        let mut weights = Vec::with_capacity(faces.len());
        let mut deltas = Vec::with_capacity(faces.len());
        for face in faces {
            let c_own = cells[face.owner.as_usize()].centre;
            let c_nei = cells[face.neighbour.as_usize()].centre;

            let d_own = (face.centre - c_own).norm();
            let d_nei = (face.centre - c_nei).norm();
            let d = (c_nei - c_own).norm();
            if d <= 0.0 || d_own + d_nei <= 0.0 {
                return Err(MeshError::DegenerateSpacing { face: face.id }.into());
            }

            weights.push(d_nei / (d_own + d_nei));
            deltas.push(1.0 / d);
        }
        Ok((weights, deltas))
    }

    fn boundary_geometry(cells: &[Cell], faces: &[BoundaryFace]) -> PfResult<Vec<Real>> {
        faces
            .iter()
            .map(|face| {
                let d = (face.centre - cells[face.owner.as_usize()].centre).norm();
                if d > 0.0 {
                    Ok(1.0 / d)
                } else {
                    Err(MeshError::DegenerateSpacing { face: face.id }.into())
                }
            })
            .collect()
    }
}
