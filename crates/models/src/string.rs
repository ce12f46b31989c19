use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strand_core::{Diagnose, Dynamics, StateVector};

use crate::error::{ParamError, finite, positive};

/// A string with fixed ends, discretised into equal segments and evolved by
/// the finite-difference wave equation.
///
/// State: the displacements of the `segments + 1` nodes, followed by their
/// velocities. Interior nodes accelerate as
///
/// ```text
/// a_i = c² (u_{i-1} - 2 u_i + u_{i+1}) / dx²
/// ```
///
/// and the end nodes never move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratingString {
    length: f64,
    segments: usize,
    wave_speed: f64,
}

/// Energies of one string state, per unit linear density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StringDiagnostic {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl VibratingString {
    pub const MIN_SEGMENTS: usize = 2;
    pub const MAX_SEGMENTS: usize = 100_000;

    /// Creates a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the length or wave speed is non-positive, or if
    /// the segment count is outside `MIN_SEGMENTS..=MAX_SEGMENTS`.
    pub fn new(length: f64, segments: usize, wave_speed: f64) -> Result<Self, ParamError> {
        if segments < Self::MIN_SEGMENTS {
            return Err(ParamError::TooFew {
                field: "segments",
                value: segments,
                min: Self::MIN_SEGMENTS,
            });
        }
        if segments > Self::MAX_SEGMENTS {
            return Err(ParamError::TooMany {
                field: "segments",
                value: segments,
                max: Self::MAX_SEGMENTS,
            });
        }
        Ok(Self {
            length: positive("length", length)?,
            segments,
            wave_speed: positive("wave_speed", wave_speed)?,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    #[must_use]
    pub fn wave_speed(&self) -> f64 {
        self.wave_speed
    }

    /// Returns the number of nodes, ends included.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.segments + 1
    }

    /// Returns the node spacing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn spacing(&self) -> f64 {
        self.length / self.segments as f64
    }

    /// Returns the Courant number `c dt / dx` for a time step.
    ///
    /// Logs a warning when it exceeds one, where explicit schemes are
    /// expected to blow up.
    #[must_use]
    pub fn courant_number(&self, dt: f64) -> f64 {
        let courant = self.wave_speed * dt / self.spacing();
        if courant > 1.0 {
            tracing::warn!(courant, dt, "Courant number exceeds 1; expect instability");
        }
        courant
    }

    /// Builds a resting half-sine displacement of the given amplitude.
    ///
    /// # Errors
    ///
    /// Returns an error if the amplitude is non-finite.
    #[allow(clippy::cast_precision_loss)]
    pub fn half_sine_state(&self, amplitude: f64) -> Result<StateVector, ParamError> {
        let amplitude = finite("amplitude", amplitude)?;
        let nodes = self.nodes();
        let dx = self.spacing();

        let displacement = (0..nodes).map(|i| {
            if i == 0 || i == self.segments {
                0.0
            } else {
                amplitude * (PI * i as f64 * dx / self.length).sin()
            }
        });

        Ok(displacement
            .chain(std::iter::repeat_n(0.0, nodes))
            .collect())
    }
}

impl Dynamics for VibratingString {
    fn dimension(&self) -> usize {
        2 * self.nodes()
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let nodes = self.nodes();
        let (displacement, velocity) = state.as_slice().split_at(nodes);
        let stiffness = self.wave_speed * self.wave_speed / (self.spacing() * self.spacing());

        let acceleration = (0..nodes).map(|i| {
            if i == 0 || i == self.segments {
                0.0
            } else {
                stiffness * (displacement[i - 1] - 2.0 * displacement[i] + displacement[i + 1])
            }
        });

        velocity.iter().copied().chain(acceleration).collect()
    }
}

impl Diagnose for VibratingString {
    type Diagnostic = StringDiagnostic;

    fn diagnose(&self, state: &StateVector) -> StringDiagnostic {
        let (displacement, velocity) = state.as_slice().split_at(self.nodes());
        let dx = self.spacing();

        let kinetic: f64 = velocity.iter().map(|v| 0.5 * dx * v * v).sum();
        let stretch: f64 = displacement
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).powi(2))
            .sum();
        let potential = self.wave_speed * self.wave_speed * stretch / (2.0 * dx);

        StringDiagnostic {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}
