//! Explicit single-step integration schemes.
//!
//! Each scheme is written once against the [`Evaluate`] trait, which supplies
//! the derivative at every stage. The schemes do no checking of their own:
//! whatever error an evaluator returns is propagated with `?`, which is how
//! the [`StabilityGuard`](crate::StabilityGuard) halts a step at the first
//! bad stage.

mod euler;
mod midpoint;
mod rk4;

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strand_core::{Dynamics, StateVector};
use thiserror::Error;

/// A derivative evaluation within a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    K1,
    K2,
    K3,
    K4,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::K1 => "k1",
            Stage::K2 => "k2",
            Stage::K3 => "k3",
            Stage::K4 => "k4",
        };
        f.write_str(name)
    }
}

/// Supplies the derivative used at each stage of a scheme.
pub trait Evaluate {
    type Error;

    /// Evaluates the derivative for `stage` at `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] to abort the step.
    fn evaluate(&mut self, stage: Stage, state: &StateVector) -> Result<StateVector, Self::Error>;
}

/// Evaluates the dynamics directly, with no checks.
struct Unchecked<D>(D);

impl<D: Dynamics> Evaluate for Unchecked<D> {
    type Error = Infallible;

    fn evaluate(&mut self, _stage: Stage, state: &StateVector) -> Result<StateVector, Infallible> {
        Ok(self.0.derivative(state))
    }
}

/// An explicit fixed-step integration scheme.
///
/// Serialized by its lowercase name and deserialized with [`FromStr`], so
/// configuration files may use any case or an alias such as `rk2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scheme {
    /// Forward Euler, first order.
    Euler,

    /// Explicit midpoint (RK2), second order.
    Midpoint,

    /// Classical four-stage Runge–Kutta, fourth order.
    Rk4,
}

impl Scheme {
    /// All supported schemes, lowest order first.
    pub const ALL: [Scheme; 3] = [Scheme::Euler, Scheme::Midpoint, Scheme::Rk4];

    /// Returns the order of accuracy of the scheme.
    #[must_use]
    pub fn order(self) -> u32 {
        match self {
            Scheme::Euler => 1,
            Scheme::Midpoint => 2,
            Scheme::Rk4 => 4,
        }
    }

    /// Returns the stages evaluated per step, in order.
    #[must_use]
    pub fn stages(self) -> &'static [Stage] {
        match self {
            Scheme::Euler => &[Stage::K1],
            Scheme::Midpoint => &[Stage::K1, Stage::K2],
            Scheme::Rk4 => &[Stage::K1, Stage::K2, Stage::K3, Stage::K4],
        }
    }

    /// Advances `state` by one step of size `dt`, asking `eval` for each stage.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `eval`; later stages are not
    /// evaluated.
    pub fn step_with<E: Evaluate>(
        self,
        eval: &mut E,
        state: &StateVector,
        dt: f64,
    ) -> Result<StateVector, E::Error> {
        match self {
            Scheme::Euler => euler::step(eval, state, dt),
            Scheme::Midpoint => midpoint::step(eval, state, dt),
            Scheme::Rk4 => rk4::step(eval, state, dt),
        }
    }

    /// Advances `state` by one unchecked step of size `dt`.
    ///
    /// Non-finite values propagate silently; use a
    /// [`StabilityGuard`](crate::StabilityGuard) to detect them.
    #[must_use]
    pub fn step(self, dynamics: impl Dynamics, state: &StateVector, dt: f64) -> StateVector {
        match self.step_with(&mut Unchecked(dynamics), state, dt) {
            Ok(next) => next,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scheme::Euler => "euler",
            Scheme::Midpoint => "midpoint",
            Scheme::Rk4 => "rk4",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown scheme name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration scheme '{name}' (expected euler, midpoint, or rk4)")]
pub struct UnknownScheme {
    pub name: String,
}

impl FromStr for Scheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Scheme::Euler),
            "midpoint" | "rk2" => Ok(Scheme::Midpoint),
            "rk4" | "runge-kutta" => Ok(Scheme::Rk4),
            _ => Err(UnknownScheme { name: s.to_owned() }),
        }
    }
}

impl TryFrom<String> for Scheme {
    type Error = UnknownScheme;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Scheme> for String {
    fn from(scheme: Scheme) -> Self {
        scheme.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_utils::{ConstantAcceleration, Counting, Decay};

    #[test]
    fn parses_scheme_names() {
        assert_eq!("Euler".parse::<Scheme>(), Ok(Scheme::Euler));
        assert_eq!(" midpoint ".parse::<Scheme>(), Ok(Scheme::Midpoint));
        assert_eq!("RK2".parse::<Scheme>(), Ok(Scheme::Midpoint));
        assert_eq!("rk4".parse::<Scheme>(), Ok(Scheme::Rk4));
        assert!(matches!(
            "verlet".parse::<Scheme>(),
            Err(UnknownScheme { name }) if name == "verlet"
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for scheme in Scheme::ALL {
            assert_eq!(scheme.to_string().parse::<Scheme>(), Ok(scheme));
        }
    }

    #[test]
    fn string_conversions_match_names() {
        assert_eq!(Scheme::try_from("Runge-Kutta".to_owned()), Ok(Scheme::Rk4));
        assert_eq!(String::from(Scheme::Midpoint), "midpoint");
        assert!(Scheme::try_from(String::new()).is_err());
    }

    #[test]
    fn each_scheme_evaluates_its_stage_count() {
        for scheme in Scheme::ALL {
            let counting = Counting::new(Decay { rate: 1.0 });
            let _ = scheme.step(&counting, &StateVector::from([1.0]), 0.1);
            assert_eq!(counting.calls(), scheme.stages().len());
        }
    }

    #[test]
    fn one_step_of_exponential_decay_matches_taylor_series() {
        // For x' = -x, one step of an order-p scheme reproduces the Taylor
        // series of exp(-dt) through the dt^p term.
        let dt = 0.1_f64;
        let x0 = StateVector::from([1.0]);
        let decay = Decay { rate: 1.0 };

        let euler = Scheme::Euler.step(&decay, &x0, dt);
        assert_relative_eq!(euler[0], 1.0 - dt, epsilon = 1e-15);

        let midpoint = Scheme::Midpoint.step(&decay, &x0, dt);
        assert_relative_eq!(midpoint[0], 1.0 - dt + dt.powi(2) / 2.0, epsilon = 1e-15);

        let rk4 = Scheme::Rk4.step(&decay, &x0, dt);
        let taylor = 1.0 - dt + dt.powi(2) / 2.0 - dt.powi(3) / 6.0 + dt.powi(4) / 24.0;
        assert_relative_eq!(rk4[0], taylor, epsilon = 1e-15);
    }

    #[test]
    fn second_order_schemes_are_exact_for_constant_acceleration() {
        let model = ConstantAcceleration { acceleration: -9.81 };
        let start = StateVector::from([0.0, 10.0]);

        for scheme in [Scheme::Midpoint, Scheme::Rk4] {
            let next = scheme.step(&model, &start, 0.5);
            assert_relative_eq!(next[0], 10.0 * 0.5 - 0.5 * 9.81 * 0.25, epsilon = 1e-12);
            assert_relative_eq!(next[1], 10.0 - 9.81 * 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn unchecked_step_propagates_non_finite_values() {
        let next = Scheme::Rk4.step(Decay { rate: 1.0 }, &StateVector::from([f64::INFINITY]), 0.1);
        assert!(!next.is_finite());
    }
}
