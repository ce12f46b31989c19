//! Post-processing of trajectories into model diagnostics.

use strand_core::Diagnose;

use crate::Trajectory;

/// Per-sample diagnostics, parallel to the trajectory they were derived from.
///
/// Entries are `None` wherever the trajectory sample is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics<D> {
    times: Vec<f64>,
    values: Vec<Option<D>>,
}

impl<D> Diagnostics<D> {
    /// Computes diagnostics for every sample of `trajectory`.
    ///
    /// The model is only consulted for valid samples; undefined samples map
    /// to `None` without any numeric work.
    pub fn compute<M>(model: &M, trajectory: &Trajectory) -> Self
    where
        M: Diagnose<Diagnostic = D> + ?Sized,
    {
        let valid = trajectory.valid_len();
        let (times, values): (Vec<f64>, Vec<Option<D>>) = trajectory
            .samples()
            .iter()
            .enumerate()
            .map(|(step, sample)| {
                let value = (step < valid && !sample.is_undefined())
                    .then(|| model.diagnose(&sample.state));
                (sample.time, value)
            })
            .unzip();

        Self { times, values }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the diagnostic at `step`, or `None` if it is undefined or out
    /// of range.
    #[must_use]
    pub fn get(&self, step: usize) -> Option<&D> {
        self.values.get(step).and_then(Option::as_ref)
    }

    /// Returns the sample times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns all entries, `None` where undefined.
    #[must_use]
    pub fn values(&self) -> &[Option<D>] {
        &self.values
    }

    /// Returns an iterator of `(time, diagnostic)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<&D>)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Extracts one scalar series for plotting, `NaN` where undefined.
    #[must_use]
    pub fn series(&self, field: impl Fn(&D) -> f64) -> Vec<f64> {
        self.values
            .iter()
            .map(|value| value.as_ref().map_or(f64::NAN, &field))
            .collect()
    }
}

/// Computes diagnostics for a trajectory.
///
/// Convenience wrapper around [`Diagnostics::compute`].
pub fn diagnose<M>(model: &M, trajectory: &Trajectory) -> Diagnostics<M::Diagnostic>
where
    M: Diagnose + ?Sized,
{
    Diagnostics::compute(model, trajectory)
}
