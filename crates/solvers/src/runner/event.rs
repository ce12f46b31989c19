use strand_core::StateVector;

use crate::FailureMarker;

/// Event emitted by the runner.
///
/// Step 0 is the initial state before any integration. Steps `1..=total`
/// are emitted as each sample is accepted.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A sample was appended to the trajectory.
    Step {
        /// The sample index.
        step: usize,
        /// The number of steps requested for the run.
        total: usize,
        /// The simulated time of the sample.
        time: f64,
        /// The state at this sample.
        state: &'a StateVector,
    },

    /// The run diverged and will not advance further.
    Diverged(&'a FailureMarker),
}

impl Event<'_> {
    /// Returns the fraction of the run completed, or `None` for divergence
    /// events.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> Option<f64> {
        match self {
            Event::Step { step, total, .. } if *total > 0 => {
                Some(*step as f64 / *total as f64)
            }
            Event::Step { .. } => Some(1.0),
            Event::Diverged(_) => None,
        }
    }
}
