use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, positive};

/// The Lorenz system.
///
/// ```text
/// dx/dt = a (y - x)
/// dy/dt = b x - y - x z
/// dz/dt = x y - c z
/// ```
///
/// The defaults are the classic chaotic parameters `a = 10`, `b = 28`,
/// `c = 8/3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lorenz {
    a: f64,
    b: f64,
    c: f64,
}

/// Raw coordinates of a Lorenz state, for phase-space plots.
///
/// The system has no physical energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzProjection {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Lorenz {
    pub const DIMENSION: usize = 3;

    /// Creates a Lorenz system.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is non-positive or non-finite.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, ParamError> {
        Ok(Self {
            a: positive("a", a)?,
            b: positive("b", b)?,
            c: positive("c", c)?,
        })
    }

    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }
}

impl Default for Lorenz {
    fn default() -> Self {
        Self {
            a: 10.0,
            b: 28.0,
            c: 8.0 / 3.0,
        }
    }
}

impl Dynamics for Lorenz {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let (x, y, z) = (state[0], state[1], state[2]);
        StateVector::from([
            self.a * (y - x),
            self.b * x - y - x * z,
            x * y - self.c * z,
        ])
    }
}

impl Diagnose for Lorenz {
    type Diagnostic = LorenzProjection;

    fn diagnose(&self, state: &StateVector) -> LorenzProjection {
        LorenzProjection {
            x: state[0],
            y: state[1],
            z: state[2],
        }
    }
}
