//! Shared helpers for Strand's cross-crate tests.

use std::cell::Cell;

use strand_core::{Dynamics, StateVector};
use strand_solvers::{Config, Horizon, Scheme, Trajectory, runner};

/// Wraps a model and counts derivative evaluations.
///
/// Optionally starts returning `NaN` after a number of healthy calls, to
/// force a failure at a known point.
pub struct CountingDynamics<D> {
    inner: D,
    calls: Cell<usize>,
    healthy_calls: Option<usize>,
}

impl<D: Dynamics> CountingDynamics<D> {
    /// Counts every evaluation and never fails.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            healthy_calls: None,
        }
    }

    /// Counts every evaluation and returns `NaN` after `healthy_calls`.
    pub fn poisoned_after(inner: D, healthy_calls: usize) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            healthy_calls: Some(healthy_calls),
        }
    }

    /// Returns the number of evaluations so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<D: Dynamics> Dynamics for CountingDynamics<D> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        let call = self.calls.get();
        self.calls.set(call + 1);

        match self.healthy_calls {
            Some(limit) if call >= limit => StateVector::undefined(self.inner.dimension()),
            _ => self.inner.derivative(state),
        }
    }
}

/// Runs `dynamics` for a fixed number of steps without observation.
///
/// # Panics
///
/// Panics if the config or initial state is rejected.
pub fn run_steps<D: Dynamics + ?Sized>(
    dynamics: &D,
    initial: StateVector,
    dt: f64,
    steps: usize,
    scheme: Scheme,
) -> Trajectory {
    let config = Config::new(dt, Horizon::Steps(steps), scheme).expect("valid config");
    runner::run_unobserved(dynamics, initial, &config).expect("valid initial state")
}

/// Returns the final state of a run that must have completed.
///
/// # Panics
///
/// Panics if the run failed.
pub fn final_state(trajectory: &Trajectory) -> &StateVector {
    assert!(
        trajectory.is_complete(),
        "run failed: {:?}",
        trajectory.failure()
    );
    &trajectory.samples()[trajectory.len() - 1].state
}

/// Euclidean distance between two states of equal dimension.
pub fn distance(a: &StateVector, b: &StateVector) -> f64 {
    assert_eq!(a.dimension(), b.dimension());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Largest absolute deviation of a series from its first value.
pub fn max_drift(series: &[f64]) -> f64 {
    let Some(first) = series.first() else {
        return 0.0;
    };
    series
        .iter()
        .map(|value| (value - first).abs())
        .fold(0.0, f64::max)
}
