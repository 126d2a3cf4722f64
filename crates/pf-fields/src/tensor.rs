//! The algebraic ranks a transported field can take.
//!
//! Scalars, vectors and full tensors reuse `f64` and nalgebra types; the
//! symmetric and spherical tensors are small local types. Everything an
//! equation needs from its unknown goes through [`FieldValue`].

use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use nalgebra::{Matrix3, Vector3};
use pf_core::Real;

use crate::registry::AnyVolField;
use crate::vol::VolField;

pub type Scalar = Real;
pub type Vector = Vector3<Real>;
pub type Tensor = Matrix3<Real>;

/// A value that can be the unknown of a finite-volume equation.
pub trait FieldValue:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Real, Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Human-readable rank, used in messages.
    const RANK: &'static str;
    const N_COMPONENTS: usize;

    fn zero() -> Self;

    /// Component `i` in a fixed storage order.
    fn component(&self, i: usize) -> Real;

    /// Inverse of [`FieldValue::component`]; `None` unless exactly
    /// `N_COMPONENTS` values are given.
    fn from_components(c: &[Real]) -> Option<Self>;

    fn is_finite(&self) -> bool {
        (0..Self::N_COMPONENTS).all(|i| self.component(i).is_finite())
    }

    fn mag(&self) -> Real {
        (0..Self::N_COMPONENTS)
            .map(|i| self.component(i).powi(2))
            .sum::<Real>()
            .sqrt()
    }

    /// View a registry entry as a field of this rank.
    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>>;

    /// Wrap a field of this rank for registry storage.
    fn upcast(field: VolField<Self>) -> AnyVolField;
}

impl FieldValue for Scalar {
    const RANK: &'static str = "scalar";
    const N_COMPONENTS: usize = 1;

    fn zero() -> Self {
        0.0
    }

    fn component(&self, _i: usize) -> Real {
        *self
    }

    fn from_components(c: &[Real]) -> Option<Self> {
        match c {
            [v] => Some(*v),
            _ => None,
        }
    }

    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>> {
        match field {
            AnyVolField::Scalar(f) => Some(f),
            _ => None,
        }
    }

    fn upcast(field: VolField<Self>) -> AnyVolField {
        AnyVolField::Scalar(field)
    }
}

impl FieldValue for Vector {
    const RANK: &'static str = "vector";
    const N_COMPONENTS: usize = 3;

    fn zero() -> Self {
        Vector3::zeros()
    }

    fn component(&self, i: usize) -> Real {
        self[i]
    }

    fn from_components(c: &[Real]) -> Option<Self> {
        (c.len() == 3).then(|| Vector3::from_column_slice(c))
    }

    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>> {
        match field {
            AnyVolField::Vector(f) => Some(f),
            _ => None,
        }
    }

    fn upcast(field: VolField<Self>) -> AnyVolField {
        AnyVolField::Vector(field)
    }
}

impl FieldValue for Tensor {
    const RANK: &'static str = "tensor";
    const N_COMPONENTS: usize = 9;

    fn zero() -> Self {
        Matrix3::zeros()
    }

    fn component(&self, i: usize) -> Real {
        self[(i / 3, i % 3)]
    }

    fn from_components(c: &[Real]) -> Option<Self> {
        (c.len() == 9).then(|| Matrix3::from_row_slice(c))
    }

    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>> {
        match field {
            AnyVolField::Tensor(f) => Some(f),
            _ => None,
        }
    }

    fn upcast(field: VolField<Self>) -> AnyVolField {
        AnyVolField::Tensor(field)
    }
}

/// Symmetric second-rank tensor, upper triangle stored row-wise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SymmTensor {
    pub xx: Real,
    pub xy: Real,
    pub xz: Real,
    pub yy: Real,
    pub yz: Real,
    pub zz: Real,
}

impl SymmTensor {
    pub const fn new(xx: Real, xy: Real, xz: Real, yy: Real, yz: Real, zz: Real) -> Self {
        Self {
            xx,
            xy,
            xz,
            yy,
            yz,
            zz,
        }
    }

    pub const fn diagonal(xx: Real, yy: Real, zz: Real) -> Self {
        Self::new(xx, 0.0, 0.0, yy, 0.0, zz)
    }

    pub fn to_tensor(&self) -> Tensor {
        Matrix3::new(
            self.xx, self.xy, self.xz, self.xy, self.yy, self.yz, self.xz, self.yz, self.zz,
        )
    }

    /// `n . T . n`
    pub fn project(&self, n: &Vector) -> Real {
        n.dot(&(self.to_tensor() * n))
    }
}

impl Add for SymmTensor {
    type Output = SymmTensor;

    fn add(self, o: Self) -> Self {
        Self::new(
            self.xx + o.xx,
            self.xy + o.xy,
            self.xz + o.xz,
            self.yy + o.yy,
            self.yz + o.yz,
            self.zz + o.zz,
        )
    }
}

impl Sub for SymmTensor {
    type Output = SymmTensor;

    fn sub(self, o: Self) -> Self {
        self + (-o)
    }
}

impl Neg for SymmTensor {
    type Output = SymmTensor;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<Real> for SymmTensor {
    type Output = SymmTensor;

    fn mul(self, s: Real) -> Self {
        Self::new(
            self.xx * s,
            self.xy * s,
            self.xz * s,
            self.yy * s,
            self.yz * s,
            self.zz * s,
        )
    }
}

impl FieldValue for SymmTensor {
    const RANK: &'static str = "symmTensor";
    const N_COMPONENTS: usize = 6;

    fn zero() -> Self {
        Self::default()
    }

    fn component(&self, i: usize) -> Real {
        match i {
            0 => self.xx,
            1 => self.xy,
            2 => self.xz,
            3 => self.yy,
            4 => self.yz,
            _ => self.zz,
        }
    }

    fn from_components(c: &[Real]) -> Option<Self> {
        match c {
            &[xx, xy, xz, yy, yz, zz] => Some(Self::new(xx, xy, xz, yy, yz, zz)),
            _ => None,
        }
    }

    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>> {
        match field {
            AnyVolField::SymmTensor(f) => Some(f),
            _ => None,
        }
    }

    fn upcast(field: VolField<Self>) -> AnyVolField {
        AnyVolField::SymmTensor(field)
    }
}

/// Spherical tensor `ii * I`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphericalTensor {
    pub ii: Real,
}

impl SphericalTensor {
    pub const fn new(ii: Real) -> Self {
        Self { ii }
    }
}

impl Add for SphericalTensor {
    type Output = SphericalTensor;

    fn add(self, o: Self) -> Self {
        Self::new(self.ii + o.ii)
    }
}

impl Sub for SphericalTensor {
    type Output = SphericalTensor;

    fn sub(self, o: Self) -> Self {
        Self::new(self.ii - o.ii)
    }
}

impl Mul<Real> for SphericalTensor {
    type Output = SphericalTensor;

    fn mul(self, s: Real) -> Self {
        Self::new(self.ii * s)
    }
}

impl FieldValue for SphericalTensor {
    const RANK: &'static str = "sphericalTensor";
    const N_COMPONENTS: usize = 1;

    fn zero() -> Self {
        Self::default()
    }

    fn component(&self, _i: usize) -> Real {
        self.ii
    }

    fn from_components(c: &[Real]) -> Option<Self> {
        match c {
            [ii] => Some(Self::new(*ii)),
            _ => None,
        }
    }

    // Three equal diagonal entries.
    fn mag(&self) -> Real {
        self.ii.abs() * (3.0 as Real).sqrt()
    }

    fn downcast(field: &AnyVolField) -> Option<&VolField<Self>> {
        match field {
            AnyVolField::SphericalTensor(f) => Some(f),
            _ => None,
        }
    }

    fn upcast(field: VolField<Self>) -> AnyVolField {
        AnyVolField::SphericalTensor(field)
    }
}
