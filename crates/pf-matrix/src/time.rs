//! Time-step state shared by the operators of one step.

use pf_core::{Real, Time, seconds};

use crate::error::{MatrixError, MatrixResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeState {
    dt: Time,
    index: u64,
}

impl TimeState {
    pub fn new(dt: Time) -> MatrixResult<Self> {
        let raw = seconds(dt);
        if !(raw.is_finite() && raw > 0.0) {
            return Err(MatrixError::BadTimeStep { dt: raw });
        }
        Ok(Self { dt, index: 0 })
    }

    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Time step in seconds.
    pub fn delta_t(&self) -> Real {
        seconds(self.dt)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Move on to the next step.
    pub fn advance(&mut self) {
        self.index += 1;
    }
}
