use crate::{PfError, PfResult};

/// Floating point type of every cell and face value.
pub type Real = f64;

/// Absolute and relative comparison tolerances.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `|a - b|` within `tol.abs`, or within `tol.rel` of the larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Index and value of the first NaN or infinite entry.
pub fn first_non_finite(values: &[Real]) -> Option<(usize, Real)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
}

/// Reject a cell or face list holding a NaN or infinity.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> PfResult<()> {
    match first_non_finite(values) {
        Some((_, value)) => Err(PfError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Two-point interpolation in the form `b + w (a - b)`.
///
/// Uniform inputs come back bit-exact, independent of `w`.
#[inline]
pub fn lerp(w: Real, a: Real, b: Real) -> Real {
    b + w * (a - b)
}
