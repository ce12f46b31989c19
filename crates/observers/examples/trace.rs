//! Runs a simulation and prints recorded traces as CSV.
//!
//! # Usage
//!
//! ```text
//! cargo run --example trace -- pendulum
//! cargo run --example trace -- pendulum midpoint 0.05
//! cargo run --example trace -- lorenz euler 0.02
//! ```
//!
//! # Modes
//!
//! - **pendulum [scheme] [dt]** — Swing a 1 m pendulum from 45° for 10 s.
//!   Prints angle and angular velocity against time.
//!
//! - **lorenz [scheme] [dt]** — Integrate the Lorenz system from (1, 1, 1) for
//!   20 time units. Prints x and z against time. Large steps with `euler`
//!   diverge; the output then stops at the failing step.

use std::{error::Error, f64::consts::FRAC_PI_4};

use strand_core::{Dynamics, Observer, StateVector};
use strand_models::{Lorenz, Pendulum, STANDARD_GRAVITY};
use strand_observers::{DivergenceLogger, ProgressObserver, TraceRecorder};
use strand_solvers::{
    Config, Horizon, Scheme,
    runner::{self, Event},
};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "pendulum".to_owned());
    let scheme: Scheme = args.next().as_deref().unwrap_or("rk4").parse()?;
    let dt: Option<f64> = args.next().map(|s| s.parse()).transpose()?;

    match mode.as_str() {
        "pendulum" => {
            let pendulum = Pendulum::new(STANDARD_GRAVITY, 1.0, 1.0)?;
            let initial = Pendulum::initial_state(FRAC_PI_4, 0.0)?;
            let config = Config::new(dt.unwrap_or(0.01), Horizon::Duration(10.0), scheme)?;
            let mut traces = TraceRecorder::components(["angle", "omega"], [0, 1]);
            trace(&pendulum, initial, &config, &mut traces)?;
            print_csv(&traces);
        }
        "lorenz" => {
            let initial = StateVector::from([1.0, 1.0, 1.0]);
            let config = Config::new(dt.unwrap_or(0.01), Horizon::Duration(20.0), scheme)?;
            let mut traces = TraceRecorder::components(["x", "z"], [0, 2]);
            trace(&Lorenz::default(), initial, &config, &mut traces)?;
            print_csv(&traces);
        }
        other => return Err(format!("unknown mode '{other}'").into()),
    }

    Ok(())
}

fn trace<const N: usize>(
    dynamics: &impl Dynamics,
    initial: StateVector,
    config: &Config,
    traces: &mut TraceRecorder<N>,
) -> Result<(), Box<dyn Error>> {
    let mut progress = ProgressObserver::new(10);
    let mut divergence = DivergenceLogger::new();

    let trajectory = runner::run(dynamics, initial, config, |event: &Event<'_>| {
        progress.observe(event);
        divergence.observe(event);
        traces.observe(event);
    })?;

    eprintln!("progress marks: {:?}", progress.reported());
    match divergence.failure() {
        Some(failure) => eprintln!("warning: {failure}"),
        None => eprintln!("completed {} samples", trajectory.len()),
    }
    Ok(())
}

fn print_csv<const N: usize>(traces: &TraceRecorder<N>) {
    let columns: Vec<_> = traces.traces().collect();
    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    println!("t,{}", header.join(","));

    let rows = columns.first().map_or(0, |(_, points)| points.len());
    for row in 0..rows {
        let time = columns[0].1[row][0];
        let values: Vec<String> = columns
            .iter()
            .map(|(_, points)| points.get(row).map_or(String::new(), |p| p[1].to_string()))
            .collect();
        println!("{time},{}", values.join(","));
    }
}
