//! The finite-volume equation `A psi = b`.
//!
//! `A` is stored in LDU form: one diagonal coefficient per cell and, for each
//! internal face `f` with owner `P` and neighbour `N`, an upper coefficient
//! (row `P`, column `N`) and a lower coefficient (row `N`, column `P`).
//! Boundary contributions are folded into `diag` and `source` by the
//! operators that build the matrix.

use nalgebra::DMatrix;
use pf_core::{Dimensions, Real, Tolerances, nearly_equal};
use pf_fields::{FieldValue, VolField};
use pf_mesh::Mesh;

use crate::error::{MatrixError, MatrixResult};

#[derive(Clone, Debug, PartialEq)]
pub struct FvMatrix<T> {
    psi_name: String,
    dimensions: Dimensions,
    diag: Vec<Real>,
    upper: Vec<Real>,
    lower: Vec<Real>,
    source: Vec<T>,
}

impl<T: FieldValue> FvMatrix<T> {
    /// Empty equation for the named field on `mesh`.
    pub fn new(psi_name: impl Into<String>, dimensions: Dimensions, mesh: &Mesh) -> Self {
        Self {
            psi_name: psi_name.into(),
            dimensions,
            diag: vec![0.0; mesh.n_cells()],
            upper: vec![0.0; mesh.n_internal_faces()],
            lower: vec![0.0; mesh.n_internal_faces()],
            source: vec![T::zero(); mesh.n_cells()],
        }
    }

    /// Empty equation for `psi`.
    pub fn for_field(psi: &VolField<T>, mesh: &Mesh) -> Self {
        Self::new(psi.name(), psi.dimensions(), mesh)
    }

    /// Empty equation with the same field and sizes as `self`.
    pub fn zeros_like(&self) -> Self {
        Self {
            psi_name: self.psi_name.clone(),
            dimensions: self.dimensions,
            diag: vec![0.0; self.diag.len()],
            upper: vec![0.0; self.upper.len()],
            lower: vec![0.0; self.lower.len()],
            source: vec![T::zero(); self.source.len()],
        }
    }

    pub fn psi_name(&self) -> &str {
        &self.psi_name
    }

    /// Dimensions of the unknown.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn n_cells(&self) -> usize {
        self.diag.len()
    }

    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut [Real] {
        &mut self.diag
    }

    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    pub fn upper_mut(&mut self) -> &mut [Real] {
        &mut self.upper
    }

    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    pub fn lower_mut(&mut self) -> &mut [Real] {
        &mut self.lower
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut [T] {
        &mut self.source
    }

    /// Check that `other` describes the same unknown on the same mesh.
    pub fn check_compatible(&self, other: &FvMatrix<T>) -> MatrixResult<()> {
        if self.psi_name != other.psi_name {
            return Err(MatrixError::FieldMismatch {
                expected: self.psi_name.clone(),
                actual: other.psi_name.clone(),
            });
        }
        let sizes = [
            ("diagonal", self.diag.len(), other.diag.len()),
            ("upper", self.upper.len(), other.upper.len()),
            ("lower", self.lower.len(), other.lower.len()),
            ("source", self.source.len(), other.source.len()),
        ];
        for (what, expected, actual) in sizes {
            if expected != actual {
                return Err(MatrixError::SizeMismatch {
                    what,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Check the coefficient arrays against a mesh.
    pub fn check_mesh(&self, mesh: &Mesh) -> MatrixResult<()> {
        let sizes = [
            ("diagonal", mesh.n_cells(), self.diag.len()),
            ("source", mesh.n_cells(), self.source.len()),
            ("upper", mesh.n_internal_faces(), self.upper.len()),
            ("lower", mesh.n_internal_faces(), self.lower.len()),
        ];
        for (what, expected, actual) in sizes {
            if expected != actual {
                return Err(MatrixError::SizeMismatch {
                    what,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// `self += other`, coefficient by coefficient.
    pub fn add_matrix(&mut self, other: &FvMatrix<T>) -> MatrixResult<()> {
        self.check_compatible(other)?;
        for (a, b) in self.diag.iter_mut().zip(&other.diag) {
            *a += b;
        }
        for (a, b) in self.upper.iter_mut().zip(&other.upper) {
            *a += b;
        }
        for (a, b) in self.lower.iter_mut().zip(&other.lower) {
            *a += b;
        }
        for (a, b) in self.source.iter_mut().zip(&other.source) {
            *a = *a + *b;
        }
        Ok(())
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&mut self, factor: Real) {
        self.diag.iter_mut().for_each(|d| *d *= factor);
        self.upper.iter_mut().for_each(|u| *u *= factor);
        self.lower.iter_mut().for_each(|l| *l *= factor);
        self.source.iter_mut().for_each(|s| *s = *s * factor);
    }

    /// Multiply row `P` (diagonal, off-diagonals in that row, source) by
    /// `factors[P]`.
    pub fn scale_rows(&mut self, factors: &[Real], mesh: &Mesh) -> MatrixResult<()> {
        if factors.len() != self.diag.len() {
            return Err(MatrixError::SizeMismatch {
                what: "row factors",
                expected: self.diag.len(),
                actual: factors.len(),
            });
        }
        self.check_mesh(mesh)?;
        for (cell, k) in factors.iter().enumerate() {
            self.diag[cell] *= k;
            self.source[cell] = self.source[cell] * *k;
        }
        for f in 0..self.upper.len() {
            self.upper[f] *= factors[mesh.owner(f)];
            self.lower[f] *= factors[mesh.neighbour(f)];
        }
        Ok(())
    }

    /// `A psi`, using only the internal values of `psi`.
    pub fn apply(&self, psi: &[T], mesh: &Mesh) -> Vec<T> {
        let mut out: Vec<T> = self
            .diag
            .iter()
            .zip(psi)
            .map(|(d, p)| *p * *d)
            .collect();
        for f in 0..self.upper.len() {
            let (o, n) = (mesh.owner(f), mesh.neighbour(f));
            out[o] = out[o] + psi[n] * self.upper[f];
            out[n] = out[n] + psi[o] * self.lower[f];
        }
        out
    }

    /// `b - A psi`.
    pub fn residual(&self, psi: &[T], mesh: &Mesh) -> Vec<T> {
        self.apply(psi, mesh)
            .into_iter()
            .zip(&self.source)
            .map(|(ax, b)| *b - ax)
            .collect()
    }

    /// Dense copy of `A` for inspection.
    pub fn to_dense(&self, mesh: &Mesh) -> DMatrix<Real> {
        let n = self.diag.len();
        let mut a = DMatrix::from_diagonal(&nalgebra::DVector::from_column_slice(&self.diag));
        for f in 0..self.upper.len() {
            let (o, nb) = (mesh.owner(f), mesh.neighbour(f));
            if o < n && nb < n {
                a[(o, nb)] += self.upper[f];
                a[(nb, o)] += self.lower[f];
            }
        }
        a
    }

    /// Whether `A` is symmetric (`upper == lower` face by face).
    pub fn is_symmetric(&self) -> bool {
        self.upper == self.lower
    }

    /// Largest coefficient magnitude, source components included.
    pub fn max_abs_coeff(&self) -> Real {
        let coeffs = self
            .diag
            .iter()
            .chain(&self.upper)
            .chain(&self.lower)
            .map(|c| c.abs());
        let sources = self.source.iter().map(FieldValue::mag);
        coeffs.chain(sources).fold(0.0, Real::max)
    }

    /// Coefficient-wise comparison under `tol`.
    pub fn nearly_equal(&self, other: &FvMatrix<T>, tol: Tolerances) -> bool {
        if self.check_compatible(other).is_err() {
            return false;
        }
        let close = |a: &[Real], b: &[Real]| {
            a.iter()
                .zip(b)
                .all(|(x, y)| nearly_equal(*x, *y, tol))
        };
        close(&self.diag, &other.diag)
            && close(&self.upper, &other.upper)
            && close(&self.lower, &other.lower)
            && self.source.iter().zip(&other.source).all(|(x, y)| {
                (0..T::N_COMPONENTS).all(|i| nearly_equal(x.component(i), y.component(i), tol))
            })
    }
}
