//! Forward Euler:
//!
//! ```text
//! state_{n+1} = state_n + dt * f(state_n)
//! ```

use strand_core::{StateVector, StepIntegrable};

use super::{Evaluate, Stage};

pub(super) fn step<E: Evaluate>(
    eval: &mut E,
    state: &StateVector,
    dt: f64,
) -> Result<StateVector, E::Error> {
    let k1 = eval.evaluate(Stage::K1, state)?;
    Ok(state.step(&k1, dt))
}
