//! Classical fourth-order Runge–Kutta:
//!
//! ```text
//! k1 = f(s)
//! k2 = f(s + dt/2 * k1)
//! k3 = f(s + dt/2 * k2)
//! k4 = f(s + dt * k3)
//! s_{n+1} = s + dt/6 * (k1 + 2 k2 + 2 k3 + k4)
//! ```

use strand_core::{StateVector, StepIntegrable};

use super::{Evaluate, Stage};

pub(super) fn step<E: Evaluate>(
    eval: &mut E,
    state: &StateVector,
    dt: f64,
) -> Result<StateVector, E::Error> {
    let half = 0.5 * dt;

    let k1 = eval.evaluate(Stage::K1, state)?;
    let k2 = eval.evaluate(Stage::K2, &state.step(&k1, half))?;
    let k3 = eval.evaluate(Stage::K3, &state.step(&k2, half))?;
    let k4 = eval.evaluate(Stage::K4, &state.step(&k3, dt))?;

    let slope = StateVector::weighted_sum(&[(1.0, &k1), (2.0, &k2), (2.0, &k3), (1.0, &k4)]);
    Ok(state.step(&slope, dt / 6.0))
}
