//! Physical models for Strand.
//!
//! Each model implements [`Dynamics`](strand_core::Dynamics) for integration
//! and [`Diagnose`](strand_core::Diagnose) for per-sample energies and
//! projections:
//!
//! | Model | State |
//! |-------|-------|
//! | [`Pendulum`] | `[angle, angular velocity]` |
//! | [`RollingBody`] | `[distance, speed, rotation, angular velocity]` |
//! | [`SunEarthMoon`] | Earth position, velocity, Moon position, velocity |
//! | [`Lorenz`] | `[x, y, z]` |
//! | [`DragProjectile`] | `[x, y, vx, vy]` |
//! | [`VibratingString`] | node displacements, then node velocities |
//!
//! The [`scenario`] module builds a validated model, initial state, and
//! runner config from TOML or JSON.

mod error;
mod lorenz;
mod pendulum;
mod projectile;
mod rolling;
pub mod scenario;
mod string;
mod sun_earth_moon;

pub use error::ParamError;
pub use lorenz::{Lorenz, LorenzProjection};
pub use pendulum::{Pendulum, PendulumDiagnostic};
pub use projectile::{DragProjectile, ProjectileDiagnostic};
pub use rolling::{RollingBody, RollingDiagnostic, Shape};
pub use scenario::{Model, ModelDiagnostics, Report, Scenario, ScenarioConfig, ScenarioError};
pub use string::{StringDiagnostic, VibratingString};
pub use sun_earth_moon::{BodyEnergy, SunEarthMoon, SunEarthMoonDiagnostic};

/// Standard gravitational acceleration at the Earth's surface (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;
