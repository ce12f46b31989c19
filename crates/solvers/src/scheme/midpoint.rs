//! Explicit midpoint (RK2):
//!
//! ```text
//! k1 = f(state_n)
//! k2 = f(state_n + dt/2 * k1)
//! state_{n+1} = state_n + dt * k2
//! ```

use strand_core::{StateVector, StepIntegrable};

use super::{Evaluate, Stage};

pub(super) fn step<E: Evaluate>(
    eval: &mut E,
    state: &StateVector,
    dt: f64,
) -> Result<StateVector, E::Error> {
    let k1 = eval.evaluate(Stage::K1, state)?;
    let midpoint = state.step(&k1, 0.5 * dt);
    let k2 = eval.evaluate(Stage::K2, &midpoint)?;
    Ok(state.step(&k2, dt))
}
