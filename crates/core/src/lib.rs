//! Core traits and types for Strand.
//!
//! This crate defines the shared abstractions that integrators, the simulation
//! runner, observers, and physical models build on:
//!
//! - [`StateVector`] — a fixed-dimension vector of generalized coordinates
//! - [`StepIntegrable`] — steps a state along its derivative
//! - [`Dynamics`] — maps a state to its time derivative
//! - [`Diagnose`] — derives model-specific diagnostics from a state
//! - [`Observer`] — receives solver events as a side channel

mod diagnose;
mod dynamics;
mod observer;
mod state;
mod step;

pub use diagnose::Diagnose;
pub use dynamics::Dynamics;
pub use observer::Observer;
pub use state::StateVector;
pub use step::StepIntegrable;
