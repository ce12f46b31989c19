use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, finite, non_negative, positive, within};

/// The shape of a body rolling without slipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A solid sphere, `I = 2/5 m r²`.
    Sphere,
    /// A solid cylinder, `I = 1/2 m r²`.
    Cylinder,
}

impl Shape {
    /// Returns the moment-of-inertia factor `I / (m r²)`.
    #[must_use]
    pub fn inertia_factor(self) -> f64 {
        match self {
            Shape::Sphere => 2.0 / 5.0,
            Shape::Cylinder => 0.5,
        }
    }
}

/// A sphere or cylinder rolling without slipping down a fixed incline.
///
/// State: `[distance along the incline, speed, rotation angle, angular
/// velocity]`. The accelerations do not depend on the state and are computed
/// once from the incline angle, gravity, and inertia factor:
///
/// ```text
/// a = g sin α / (1 + I / (m r²))
/// ε = a / r
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingBody {
    shape: Shape,
    mass: f64,
    radius: f64,
    incline: f64,
    height: f64,
    gravity: f64,
    acceleration: f64,
    angular_acceleration: f64,
}

/// Energies, centre, and rim marker position for one rolling-body state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingDiagnostic {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
    /// Centre of the body `[x, y]`.
    pub center: [f64; 2],
    /// A fixed point on the rim `[x, y]`, which traces a cycloid.
    pub marker: [f64; 2],
}

impl RollingBody {
    pub const DIMENSION: usize = 4;

    /// Creates a rolling body.
    ///
    /// `incline` is in radians, between 0 and π/2. `height` is the starting
    /// height of the centre above the reference level.
    ///
    /// # Errors
    ///
    /// Returns an error if mass, radius, or gravity is non-positive, if the
    /// height is negative, or if the incline is outside `[0, π/2]`.
    pub fn new(
        shape: Shape,
        mass: f64,
        radius: f64,
        incline: f64,
        height: f64,
        gravity: f64,
    ) -> Result<Self, ParamError> {
        let mass = positive("mass", mass)?;
        let radius = positive("radius", radius)?;
        let incline = within("incline", incline, 0.0, FRAC_PI_2)?;
        let height = non_negative("height", height)?;
        let gravity = positive("gravity", gravity)?;

        let acceleration = gravity * incline.sin() / (1.0 + shape.inertia_factor());

        Ok(Self {
            shape,
            mass,
            radius,
            incline,
            height,
            gravity,
            acceleration,
            angular_acceleration: acceleration / radius,
        })
    }

    /// Creates a rolling body with the incline given in degrees.
    ///
    /// # Errors
    ///
    /// See [`RollingBody::new`].
    pub fn from_degrees(
        shape: Shape,
        mass: f64,
        radius: f64,
        incline_degrees: f64,
        height: f64,
        gravity: f64,
    ) -> Result<Self, ParamError> {
        let incline = finite("incline", incline_degrees)?.to_radians();
        Self::new(shape, mass, radius, incline, height, gravity)
    }

    /// Builds the state for a body released at the top of the incline.
    ///
    /// # Errors
    ///
    /// Returns an error if either velocity is non-finite.
    pub fn initial_state(speed: f64, angular_velocity: f64) -> Result<StateVector, ParamError> {
        Ok(StateVector::from([
            0.0,
            finite("speed", speed)?,
            0.0,
            finite("angular_velocity", angular_velocity)?,
        ]))
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the incline angle in radians.
    #[must_use]
    pub fn incline(&self) -> f64 {
        self.incline
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the linear acceleration along the incline.
    #[must_use]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Returns the angular acceleration.
    #[must_use]
    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    /// Returns the moment of inertia about the centre.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        self.shape.inertia_factor() * self.mass * self.radius * self.radius
    }
}

impl Dynamics for RollingBody {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        StateVector::from([
            state[1],
            self.acceleration,
            state[3],
            self.angular_acceleration,
        ])
    }
}

impl Diagnose for RollingBody {
    type Diagnostic = RollingDiagnostic;

    fn diagnose(&self, state: &StateVector) -> RollingDiagnostic {
        let (distance, speed, rotation, omega) = (state[0], state[1], state[2], state[3]);
        let (sin_a, cos_a) = self.incline.sin_cos();

        let center = [distance * cos_a, self.height - distance * sin_a];

        let rim_angle = self.incline + FRAC_PI_2 - rotation;
        let marker = [
            center[0] + self.radius * rim_angle.cos(),
            center[1] + self.radius * rim_angle.sin(),
        ];

        let kinetic =
            0.5 * self.mass * speed * speed + 0.5 * self.moment_of_inertia() * omega * omega;
        let potential = self.mass * self.gravity * center[1];

        RollingDiagnostic {
            kinetic,
            potential,
            total: kinetic + potential,
            center,
            marker,
        }
    }
}
