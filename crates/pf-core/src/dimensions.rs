//! Runtime physical dimensions carried by fields and equations.
//!
//! Each set stores the exponents of the SI base units mass, length, time and
//! temperature. Fields are checked against these at configuration time, never
//! inside the correction loops.

use core::fmt;
use core::ops::{Div, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exponents of `[kg, m, s, K]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "[i8; 4]", into = "[i8; 4]")
)]
pub struct Dimensions {
    pub mass: i8,
    pub length: i8,
    pub time: i8,
    pub temperature: i8,
}

impl Dimensions {
    pub const fn new(mass: i8, length: i8, time: i8, temperature: i8) -> Self {
        Self {
            mass,
            length,
            time,
            temperature,
        }
    }

    pub const DIMLESS: Self = Self::new(0, 0, 0, 0);
    pub const MASS: Self = Self::new(1, 0, 0, 0);
    pub const LENGTH: Self = Self::new(0, 1, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 1);
    pub const AREA: Self = Self::new(0, 2, 0, 0);
    pub const VOLUME: Self = Self::new(0, 3, 0, 0);
    pub const DENSITY: Self = Self::new(1, -3, 0, 0);
    pub const VELOCITY: Self = Self::new(0, 1, -1, 0);
    /// m^3/s
    pub const VOLUMETRIC_FLUX: Self = Self::new(0, 3, -1, 0);
    /// kg/s
    pub const MASS_FLUX: Self = Self::new(1, 0, -1, 0);
    /// m^2/s, kinematic viscosity or diffusivity
    pub const KINEMATIC_DIFFUSIVITY: Self = Self::new(0, 2, -1, 0);
    /// kg/m/s, dynamic viscosity or mass-weighted diffusivity
    pub const DYNAMIC_DIFFUSIVITY: Self = Self::new(1, -1, -1, 0);

    pub fn is_dimensionless(self) -> bool {
        self == Self::DIMLESS
    }

    pub fn from_array(exps: [i8; 4]) -> Self {
        Self::new(exps[0], exps[1], exps[2], exps[3])
    }

    pub fn to_array(self) -> [i8; 4] {
        [self.mass, self.length, self.time, self.temperature]
    }
}

impl Mul for Dimensions {
    type Output = Dimensions;

    fn mul(self, rhs: Self) -> Self::Output {
        Dimensions::new(
            self.mass + rhs.mass,
            self.length + rhs.length,
            self.time + rhs.time,
            self.temperature + rhs.temperature,
        )
    }
}

impl Div for Dimensions {
    type Output = Dimensions;

    fn div(self, rhs: Self) -> Self::Output {
        Dimensions::new(
            self.mass - rhs.mass,
            self.length - rhs.length,
            self.time - rhs.time,
            self.temperature - rhs.temperature,
        )
    }
}

impl From<[i8; 4]> for Dimensions {
    fn from(d: [i8; 4]) -> Self {
        Self::from_array(d)
    }
}

impl From<Dimensions> for [i8; 4] {
    fn from(d: Dimensions) -> Self {
        d.to_array()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}]",
            self.mass, self.length, self.time, self.temperature
        )
    }
}
