use crate::StateVector;

/// Advances a value along a slope.
///
/// Every explicit scheme is built from this one move: `k1` gives the Euler
/// step, `state.step(&k1, dt / 2)` gives the midpoint stage input, and RK4
/// steps along each `k_i` in turn before taking the final weighted step.
pub trait StepIntegrable<Delta> {
    /// The slope type, usually the time derivative of `Self`.
    type Derivative;

    /// Returns `self + derivative * delta`.
    #[must_use]
    fn step(&self, derivative: &Self::Derivative, delta: Delta) -> Self;
}

/// A state steps along a derivative of the same dimension.
impl StepIntegrable<f64> for StateVector {
    type Derivative = StateVector;

    fn step(&self, derivative: &StateVector, delta: f64) -> Self {
        debug_assert_eq!(self.dimension(), derivative.dimension());
        self.iter()
            .zip(derivative.iter())
            .map(|(s, d)| s + delta * d)
            .collect()
    }
}
