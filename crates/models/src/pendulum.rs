use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, finite, positive};

/// A simple (undamped, rigid, point-mass) pendulum.
///
/// State: `[angle, angular velocity]`, with the angle measured from the
/// downward vertical in radians.
///
/// ```text
/// dθ/dt = ω
/// dω/dt = -(g / L) sin θ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pendulum {
    gravity: f64,
    length: f64,
    mass: f64,
}

/// Energies and bob position for one pendulum state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumDiagnostic {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
    /// Horizontal bob position relative to the pivot.
    pub x: f64,
    /// Vertical bob position relative to the pivot (negative below it).
    pub y: f64,
}

impl Pendulum {
    pub const DIMENSION: usize = 2;

    /// Creates a pendulum.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is non-positive or non-finite.
    pub fn new(gravity: f64, length: f64, mass: f64) -> Result<Self, ParamError> {
        Ok(Self {
            gravity: positive("gravity", gravity)?,
            length: positive("length", length)?,
            mass: positive("mass", mass)?,
        })
    }

    /// Builds the state `[angle, angular_velocity]`.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is non-finite.
    pub fn initial_state(angle: f64, angular_velocity: f64) -> Result<StateVector, ParamError> {
        Ok(StateVector::from([
            finite("angle", angle)?,
            finite("angular_velocity", angular_velocity)?,
        ]))
    }

    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Returns the small-angle angular frequency `√(g / L)`.
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        (self.gravity / self.length).sqrt()
    }
}

impl Dynamics for Pendulum {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let (angle, omega) = (state[0], state[1]);
        StateVector::from([omega, -(self.gravity / self.length) * angle.sin()])
    }
}

impl Diagnose for Pendulum {
    type Diagnostic = PendulumDiagnostic;

    fn diagnose(&self, state: &StateVector) -> PendulumDiagnostic {
        let (angle, omega) = (state[0], state[1]);
        let speed = self.length * omega;

        let kinetic = 0.5 * self.mass * speed * speed;
        let potential = self.mass * self.gravity * self.length * (1.0 - angle.cos());

        PendulumDiagnostic {
            kinetic,
            potential,
            total: kinetic + potential,
            x: self.length * angle.sin(),
            y: -self.length * angle.cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    fn pendulum() -> Pendulum {
        Pendulum::new(9.81, 2.0, 0.5).unwrap()
    }

    #[test]
    fn derivative_is_restoring() {
        let derivative = pendulum().derivative(&StateVector::from([FRAC_PI_2, 1.5]));

        assert_relative_eq!(derivative[0], 1.5);
        assert_relative_eq!(derivative[1], -9.81 / 2.0);
    }

    #[test]
    fn hanging_at_rest_is_an_equilibrium() {
        let derivative = pendulum().derivative(&StateVector::from([0.0, 0.0]));
        assert_eq!(derivative, StateVector::from([0.0, 0.0]));
    }

    #[test]
    fn energy_at_horizontal() {
        let diagnostic = pendulum().diagnose(&StateVector::from([FRAC_PI_2, 0.0]));

        assert_relative_eq!(diagnostic.kinetic, 0.0);
        assert_relative_eq!(diagnostic.potential, 0.5 * 9.81 * 2.0, epsilon = 1e-12);
        assert_relative_eq!(diagnostic.total, diagnostic.potential);
        assert_relative_eq!(diagnostic.x, 2.0);
        assert_relative_eq!(diagnostic.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn energy_at_bottom_is_kinetic() {
        let diagnostic = pendulum().diagnose(&StateVector::from([0.0, 3.0]));

        // v = L ω = 6 m/s
        assert_relative_eq!(diagnostic.kinetic, 0.5 * 0.5 * 36.0);
        assert_relative_eq!(diagnostic.potential, 0.0);
        assert_relative_eq!(diagnostic.y, -2.0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(Pendulum::new(9.81, 0.0, 1.0).unwrap_err().field(), "length");
        assert_eq!(Pendulum::new(9.81, 1.0, -1.0).unwrap_err().field(), "mass");
        assert_eq!(Pendulum::new(f64::NAN, 1.0, 1.0).unwrap_err().field(), "gravity");
        assert!(Pendulum::initial_state(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn natural_frequency() {
        assert_relative_eq!(pendulum().natural_frequency(), (9.81_f64 / 2.0).sqrt());
    }
}
