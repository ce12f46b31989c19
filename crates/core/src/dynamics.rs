use crate::StateVector;

/// A time-invariant dynamical law: maps a state to its time derivative.
///
/// Implementations must be pure and deterministic, and the returned derivative
/// must have the same dimension as the input state. Callers guarantee the
/// state is finite, so implementations need not check their input.
pub trait Dynamics {
    /// Returns the fixed dimension of this model's state vector.
    fn dimension(&self) -> usize;

    /// Computes the time derivative of `state`.
    fn derivative(&self, state: &StateVector) -> StateVector;
}

impl<T: Dynamics + ?Sized> Dynamics for &T {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        (**self).derivative(state)
    }
}
