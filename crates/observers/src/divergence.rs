use strand_core::Observer;
use strand_solvers::FailureMarker;

use crate::traits::HasDivergence;

/// Records the divergence report of a run and logs it as an error.
///
/// Only the first report is kept; a runner emits at most one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DivergenceLogger {
    failure: Option<FailureMarker>,
}

impl DivergenceLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded failure, if the run diverged.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureMarker> {
        self.failure.as_ref()
    }

    /// Returns `true` if a divergence was observed.
    #[must_use]
    pub fn diverged(&self) -> bool {
        self.failure.is_some()
    }
}

impl<E: HasDivergence> Observer<E> for DivergenceLogger {
    fn observe(&mut self, event: &E) {
        let Some(failure) = event.divergence() else {
            return;
        };
        if self.failure.is_none() {
            tracing::error!(
                step = failure.step,
                scheme = %failure.scheme,
                checkpoint = %failure.checkpoint,
                "{failure}"
            );
            self.failure = Some(*failure);
        }
    }
}

impl<E: HasDivergence> Observer<E> for &mut DivergenceLogger {
    fn observe(&mut self, event: &E) {
        (*self).observe(event);
    }
}
