//! Explicit fixed-step integration for Strand.
//!
//! - [`scheme`] — the Euler, explicit midpoint, and classical RK4 steppers,
//!   written once against a stage evaluator
//! - [`guard`] — the [`StabilityGuard`] that checks every stage for
//!   non-finite values and stops a run at the first divergence
//! - [`runner`] — drives a guarded scheme over a step budget and builds the
//!   [`Trajectory`]
//! - [`diagnostics`] — maps a trajectory to per-sample model diagnostics

pub mod diagnostics;
pub mod guard;
pub mod runner;
pub mod scheme;

#[cfg(test)]
mod test_utils;

pub use diagnostics::Diagnostics;
pub use guard::{Cause, Checkpoint, FailureMarker, StabilityGuard};
pub use runner::{Config, Horizon, Sample, Status, Trajectory};
pub use scheme::{Scheme, Stage};
