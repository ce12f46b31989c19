use strand_core::StateVector;

use crate::FailureMarker;

/// Indicates how a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Completed,

    /// Stopped early because of numerical instability.
    Failed,
}

/// A single `(time, state)` entry of a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub state: StateVector,
}

impl Sample {
    /// Returns `true` if the sample holds the undefined sentinel.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.state.is_undefined()
    }
}

/// The time/state history produced by a single run.
///
/// A trajectory always holds `steps + 1` samples, so it can be indexed by
/// step number. If the run failed at step `k`, samples `k..` hold the
/// undefined sentinel and [`Trajectory::failure`] describes the failure.
/// Trajectories cannot be modified once returned by the runner.
#[derive(Debug, Clone)]
pub struct Trajectory {
    status: Status,
    samples: Vec<Sample>,
    failure: Option<FailureMarker>,
}

impl Trajectory {
    pub(crate) fn completed(samples: Vec<Sample>) -> Self {
        Self {
            status: Status::Completed,
            samples,
            failure: None,
        }
    }

    pub(crate) fn failed(samples: Vec<Sample>, failure: FailureMarker) -> Self {
        Self {
            status: Status::Failed,
            samples,
            failure: Some(failure),
        }
    }

    /// Returns how the run terminated.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the failure report, if the run diverged.
    #[must_use]
    pub fn failure(&self) -> Option<&FailureMarker> {
        self.failure.as_ref()
    }

    /// Returns `true` if the run completed without instability.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Completed
    }

    /// Returns all samples, including any undefined tail.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the sample at `step`, if it exists.
    #[must_use]
    pub fn get(&self, step: usize) -> Option<&Sample> {
        self.samples.get(step)
    }

    /// Returns the number of samples (requested steps plus one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the number of leading samples holding valid states.
    #[must_use]
    pub fn valid_len(&self) -> usize {
        self.failure.map_or(self.samples.len(), |failure| failure.step)
    }

    /// Returns the leading samples that hold valid states.
    #[must_use]
    pub fn valid_samples(&self) -> &[Sample] {
        &self.samples[..self.valid_len()]
    }

    /// Returns the last valid sample.
    #[must_use]
    pub fn last_valid(&self) -> Option<&Sample> {
        self.valid_samples().last()
    }

    /// Returns an iterator over sample times.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|sample| sample.time)
    }

    /// Returns an iterator over one state component, `NaN` where undefined.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the state dimension.
    pub fn component(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(move |sample| sample.state[index])
    }

    /// Consumes the trajectory and returns its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Compares two trajectories bit for bit.
    #[must_use]
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.failure == other.failure
            && self.samples.len() == other.samples.len()
            && self.samples.iter().zip(&other.samples).all(|(a, b)| {
                a.time.to_bits() == b.time.to_bits() && a.state.bitwise_eq(&b.state)
            })
    }
}
