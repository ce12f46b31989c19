//! Capability traits for runner observers.
//!
//! These traits abstract over event types so an observer can be written once
//! against what an event carries rather than against a concrete enum.
//!
//! - [`HasProgress`] — events that report how far a run has come
//! - [`HasSample`] — events that carry a time and state
//! - [`HasDivergence`] — events that carry a divergence report
//!
//! # Example
//!
//! ```rust
//! use strand_core::Observer;
//! use strand_observers::traits::HasSample;
//!
//! struct MaxAngle(f64);
//!
//! impl<E: HasSample> Observer<E> for MaxAngle {
//!     fn observe(&mut self, event: &E) {
//!         if let Some((_, state)) = event.sample() {
//!             self.0 = self.0.max(state[0].abs());
//!         }
//!     }
//! }
//! ```

use strand_core::StateVector;
use strand_solvers::{FailureMarker, runner::Event};

/// An event that reports the fraction of a run completed.
pub trait HasProgress {
    /// Returns the completed fraction in `[0, 1]`, or `None` if the event
    /// does not mark progress.
    fn progress(&self) -> Option<f64>;
}

/// An event that carries a trajectory sample.
pub trait HasSample {
    /// Returns the sample time and state, if the event carries one.
    fn sample(&self) -> Option<(f64, &StateVector)>;
}

/// An event that carries a divergence report.
pub trait HasDivergence {
    /// Returns the failure marker, if the event reports divergence.
    fn divergence(&self) -> Option<&FailureMarker>;
}

impl HasProgress for Event<'_> {
    fn progress(&self) -> Option<f64> {
        Event::progress(self)
    }
}

impl HasSample for Event<'_> {
    fn sample(&self) -> Option<(f64, &StateVector)> {
        match self {
            Event::Step { time, state, .. } => Some((*time, state)),
            Event::Diverged(_) => None,
        }
    }
}

impl HasDivergence for Event<'_> {
    fn divergence(&self) -> Option<&FailureMarker> {
        match self {
            Event::Diverged(failure) => Some(failure),
            Event::Step { .. } => None,
        }
    }
}
