use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, finite, non_negative, positive};

/// A point mass under gravity with linear air drag.
///
/// State: `[x, y, vx, vy]`.
///
/// ```text
/// dvx/dt = -(k / m) vx
/// dvy/dt = -g - (k / m) vy
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProjectile {
    drag: f64,
    mass: f64,
    gravity: f64,
}

/// Position, speed, and energies for one projectile state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDiagnostic {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl DragProjectile {
    pub const DIMENSION: usize = 4;

    /// Creates a projectile with drag coefficient `drag` (zero for vacuum).
    ///
    /// # Errors
    ///
    /// Returns an error if drag is negative, or mass or gravity is
    /// non-positive.
    pub fn new(drag: f64, mass: f64, gravity: f64) -> Result<Self, ParamError> {
        Ok(Self {
            drag: non_negative("drag", drag)?,
            mass: positive("mass", mass)?,
            gravity: positive("gravity", gravity)?,
        })
    }

    /// Builds the state for a launch from `(0, height)` at `speed` and
    /// `angle` radians above the horizontal.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is non-finite or the speed is negative.
    pub fn launch_state(height: f64, speed: f64, angle: f64) -> Result<StateVector, ParamError> {
        let height = finite("height", height)?;
        let speed = non_negative("speed", speed)?;
        let (sin, cos) = finite("angle", angle)?.sin_cos();
        Ok(StateVector::from([0.0, height, speed * cos, speed * sin]))
    }

    #[must_use]
    pub fn drag(&self) -> f64 {
        self.drag
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Returns the analytic state at time `t` after `initial`.
    ///
    /// With drag the velocity relaxes exponentially toward the terminal
    /// velocity `(0, -g m / k)`; without it the motion is a parabola.
    #[must_use]
    pub fn exact_state(&self, initial: &StateVector, t: f64) -> StateVector {
        let (x0, y0, vx0, vy0) = (initial[0], initial[1], initial[2], initial[3]);
        let g = self.gravity;

        if self.drag == 0.0 {
            return StateVector::from([
                x0 + vx0 * t,
                y0 + vy0 * t - 0.5 * g * t * t,
                vx0,
                vy0 - g * t,
            ]);
        }

        let lambda = self.drag / self.mass;
        let decay = (-lambda * t).exp();
        // (1 - e^{-λt}) / λ
        let reach = -(-lambda * t).exp_m1() / lambda;
        let terminal = g / lambda;

        StateVector::from([
            x0 + vx0 * reach,
            y0 + (vy0 + terminal) * reach - terminal * t,
            vx0 * decay,
            (vy0 + terminal) * decay - terminal,
        ])
    }
}

impl Dynamics for DragProjectile {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let (vx, vy) = (state[2], state[3]);
        let damping = self.drag / self.mass;
        StateVector::from([vx, vy, -damping * vx, -self.gravity - damping * vy])
    }
}

impl Diagnose for DragProjectile {
    type Diagnostic = ProjectileDiagnostic;

    fn diagnose(&self, state: &StateVector) -> ProjectileDiagnostic {
        let (x, y, vx, vy) = (state[0], state[1], state[2], state[3]);
        let speed = vx.hypot(vy);
        let kinetic = 0.5 * self.mass * speed * speed;
        let potential = self.mass * self.gravity * y;

        ProjectileDiagnostic {
            x,
            y,
            speed,
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}
