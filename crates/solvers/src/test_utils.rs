use std::cell::Cell;

use strand_core::{Dynamics, StateVector};

/// Exponential decay, `x' = -rate * x`.
pub(crate) struct Decay {
    pub rate: f64,
}

impl Dynamics for Decay {
    fn dimension(&self) -> usize {
        1
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        StateVector::from([-self.rate * state[0]])
    }
}

/// Motion under a constant acceleration, state `[position, velocity]`.
pub(crate) struct ConstantAcceleration {
    pub acceleration: f64,
}

impl Dynamics for ConstantAcceleration {
    fn dimension(&self) -> usize {
        2
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        StateVector::from([state[1], self.acceleration])
    }
}

/// Returns a finite derivative for the first `healthy_calls` evaluations and
/// an infinite one afterwards.
pub(crate) struct FailAfter {
    pub healthy_calls: usize,
    pub calls: Cell<usize>,
}

impl FailAfter {
    pub(crate) fn new(healthy_calls: usize) -> Self {
        Self {
            healthy_calls,
            calls: Cell::new(0),
        }
    }
}

impl Dynamics for FailAfter {
    fn dimension(&self) -> usize {
        1
    }

    fn derivative(&self, _state: &StateVector) -> StateVector {
        let calls = self.calls.get();
        self.calls.set(calls + 1);
        if calls < self.healthy_calls {
            StateVector::from([1.0])
        } else {
            StateVector::from([f64::INFINITY])
        }
    }
}

/// Always returns a derivative with one component too many.
pub(crate) struct WrongDimension;

impl Dynamics for WrongDimension {
    fn dimension(&self) -> usize {
        1
    }

    fn derivative(&self, _state: &StateVector) -> StateVector {
        StateVector::from([0.0, 0.0])
    }
}

/// Counts the evaluations made on the wrapped dynamics.
pub(crate) struct Counting<D> {
    inner: D,
    calls: Cell<usize>,
}

impl<D> Counting<D> {
    pub(crate) fn new(inner: D) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<D: Dynamics> Dynamics for Counting<D> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        self.calls.set(self.calls.get() + 1);
        self.inner.derivative(state)
    }
}
