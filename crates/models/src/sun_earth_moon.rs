use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, positive};

/// Earth and Moon moving in the plane under gravity from a Sun fixed at the
/// origin and from each other.
///
/// State: `[earth x, earth y, earth vx, earth vy, moon x, moon y, moon vx,
/// moon vy]`, in metres and metres per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunEarthMoon {
    gravitational_constant: f64,
    sun_mass: f64,
    earth_mass: f64,
    moon_mass: f64,
}

/// Kinetic energy and Sun-interaction potential energy of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyEnergy {
    pub kinetic: f64,
    pub potential: f64,
}

/// Energies and positions for one Sun-Earth-Moon state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunEarthMoonDiagnostic {
    pub earth: BodyEnergy,
    pub moon: BodyEnergy,
    /// Earth-Moon potential energy, counted once.
    pub mutual_potential: f64,
    pub total: f64,
    pub earth_position: [f64; 2],
    pub moon_position: [f64; 2],
    /// Moon position relative to the Earth.
    pub moon_relative: [f64; 2],
}

impl SunEarthMoon {
    pub const DIMENSION: usize = 8;

    pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11;
    pub const SUN_MASS: f64 = 1.989e30;
    pub const EARTH_MASS: f64 = 5.972e24;
    pub const MOON_MASS: f64 = 7.347e22;
    pub const EARTH_SUN_DISTANCE: f64 = 1.5e11;
    pub const EARTH_MOON_DISTANCE: f64 = 3.844e8;

    /// Creates the system.
    ///
    /// # Errors
    ///
    /// Returns an error if any constant is non-positive or non-finite.
    pub fn new(
        gravitational_constant: f64,
        sun_mass: f64,
        earth_mass: f64,
        moon_mass: f64,
    ) -> Result<Self, ParamError> {
        Ok(Self {
            gravitational_constant: positive("gravitational_constant", gravitational_constant)?,
            sun_mass: positive("sun_mass", sun_mass)?,
            earth_mass: positive("earth_mass", earth_mass)?,
            moon_mass: positive("moon_mass", moon_mass)?,
        })
    }

    /// Places the Earth and Moon on the positive x-axis with circular-orbit
    /// speeds: the Earth around the Sun, the Moon around the Earth on top of
    /// the Earth's own velocity.
    ///
    /// # Errors
    ///
    /// Returns an error if either distance is non-positive or non-finite.
    pub fn circular_initial_state(
        &self,
        earth_sun_distance: f64,
        earth_moon_distance: f64,
    ) -> Result<StateVector, ParamError> {
        let earth_sun_distance = positive("earth_sun_distance", earth_sun_distance)?;
        let earth_moon_distance = positive("earth_moon_distance", earth_moon_distance)?;

        let earth_speed = (self.gravitational_constant * self.sun_mass / earth_sun_distance).sqrt();
        let moon_speed =
            (self.gravitational_constant * self.earth_mass / earth_moon_distance).sqrt();

        Ok(StateVector::from([
            earth_sun_distance,
            0.0,
            0.0,
            earth_speed,
            earth_sun_distance + earth_moon_distance,
            0.0,
            0.0,
            earth_speed + moon_speed,
        ]))
    }

    #[must_use]
    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    #[must_use]
    pub fn sun_mass(&self) -> f64 {
        self.sun_mass
    }

    #[must_use]
    pub fn earth_mass(&self) -> f64 {
        self.earth_mass
    }

    #[must_use]
    pub fn moon_mass(&self) -> f64 {
        self.moon_mass
    }

    /// Acceleration of a body at `at` toward a body of `mass` at `toward`.
    fn pull(&self, at: [f64; 2], toward: [f64; 2], mass: f64) -> [f64; 2] {
        let (dx, dy) = (toward[0] - at[0], toward[1] - at[1]);
        let r = dx.hypot(dy);
        if r == 0.0 {
            return [0.0, 0.0];
        }
        let scale = self.gravitational_constant * mass / (r * r * r);
        [scale * dx, scale * dy]
    }

    /// Pairwise potential energy `-G m₁ m₂ / r`, zero for coincident bodies.
    fn potential(&self, a: [f64; 2], b: [f64; 2], m1: f64, m2: f64) -> f64 {
        let r = (b[0] - a[0]).hypot(b[1] - a[1]);
        if r == 0.0 {
            0.0
        } else {
            -self.gravitational_constant * m1 * m2 / r
        }
    }
}

impl Default for SunEarthMoon {
    fn default() -> Self {
        Self {
            gravitational_constant: Self::GRAVITATIONAL_CONSTANT,
            sun_mass: Self::SUN_MASS,
            earth_mass: Self::EARTH_MASS,
            moon_mass: Self::MOON_MASS,
        }
    }
}

const SUN: [f64; 2] = [0.0, 0.0];

impl Dynamics for SunEarthMoon {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let earth = [state[0], state[1]];
        let moon = [state[4], state[5]];

        let earth_from_sun = self.pull(earth, SUN, self.sun_mass);
        let earth_from_moon = self.pull(earth, moon, self.moon_mass);
        let moon_from_sun = self.pull(moon, SUN, self.sun_mass);
        let moon_from_earth = self.pull(moon, earth, self.earth_mass);

        StateVector::from([
            state[2],
            state[3],
            earth_from_sun[0] + earth_from_moon[0],
            earth_from_sun[1] + earth_from_moon[1],
            state[6],
            state[7],
            moon_from_sun[0] + moon_from_earth[0],
            moon_from_sun[1] + moon_from_earth[1],
        ])
    }
}

impl Diagnose for SunEarthMoon {
    type Diagnostic = SunEarthMoonDiagnostic;

    fn diagnose(&self, state: &StateVector) -> SunEarthMoonDiagnostic {
        let earth_position = [state[0], state[1]];
        let moon_position = [state[4], state[5]];

        let earth = BodyEnergy {
            kinetic: 0.5 * self.earth_mass * (state[2] * state[2] + state[3] * state[3]),
            potential: self.potential(SUN, earth_position, self.sun_mass, self.earth_mass),
        };
        let moon = BodyEnergy {
            kinetic: 0.5 * self.moon_mass * (state[6] * state[6] + state[7] * state[7]),
            potential: self.potential(SUN, moon_position, self.sun_mass, self.moon_mass),
        };
        let mutual_potential =
            self.potential(earth_position, moon_position, self.earth_mass, self.moon_mass);

        SunEarthMoonDiagnostic {
            earth,
            moon,
            mutual_potential,
            total: earth.kinetic + earth.potential + moon.kinetic + moon.potential + mutual_potential,
            earth_position,
            moon_position,
            moon_relative: [
                moon_position[0] - earth_position[0],
                moon_position[1] - earth_position[1],
            ],
        }
    }
}
