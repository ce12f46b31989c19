use integration_tests::{CountingDynamics, run_steps};
use strand_core::{Dynamics, StateVector};
use strand_models::{
    DragProjectile, Lorenz, Pendulum, RollingBody, STANDARD_GRAVITY, Shape, SunEarthMoon,
    VibratingString,
};
use strand_solvers::{Checkpoint, Scheme, Stage, Status, Trajectory, diagnostics::diagnose};

fn boxed(model: impl Dynamics + 'static) -> Box<dyn Dynamics> {
    Box::new(model)
}

fn models() -> Vec<(Box<dyn Dynamics>, StateVector, f64)> {
    let sun_earth_moon = SunEarthMoon::default();
    let orbits = sun_earth_moon
        .circular_initial_state(
            SunEarthMoon::EARTH_SUN_DISTANCE,
            SunEarthMoon::EARTH_MOON_DISTANCE,
        )
        .unwrap();
    let string = VibratingString::new(1.0, 8, 2.0).unwrap();
    let plucked = string.half_sine_state(0.1).unwrap();

    vec![
        (
            boxed(Pendulum::new(STANDARD_GRAVITY, 1.0, 1.0).unwrap()),
            Pendulum::initial_state(0.3, 0.0).unwrap(),
            0.01,
        ),
        (
            boxed(
                RollingBody::new(Shape::Sphere, 1.0, 0.1, 0.4, 2.0, STANDARD_GRAVITY).unwrap(),
            ),
            RollingBody::initial_state(0.0, 0.0).unwrap(),
            0.01,
        ),
        (boxed(sun_earth_moon), orbits, 3600.0),
        (
            boxed(Lorenz::default()),
            StateVector::from([1.0, 1.0, 1.0]),
            0.01,
        ),
        (
            boxed(DragProjectile::new(0.1, 1.0, STANDARD_GRAVITY).unwrap()),
            DragProjectile::launch_state(0.0, 15.0, 0.6).unwrap(),
            0.01,
        ),
        (boxed(string), plucked, 0.001),
    ]
}

fn assert_failed_tail(trajectory: &Trajectory, steps: usize, dt: f64) {
    let failure = trajectory.failure().expect("run should have failed");
    let k = failure.step;

    assert_eq!(trajectory.status(), Status::Failed);
    assert!((1..=steps).contains(&k));
    assert_eq!(trajectory.len(), steps + 1);
    assert_eq!(trajectory.valid_len(), k);

    for (step, sample) in trajectory.samples().iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let time = step as f64 * dt;
        assert_eq!(sample.time.to_bits(), time.to_bits());
        if step < k {
            assert!(sample.state.is_finite(), "sample {step} should be valid");
        } else {
            assert!(sample.state.is_undefined(), "sample {step} should be undefined");
        }
    }
}

#[test]
fn every_model_and_scheme_yields_steps_plus_one_samples() {
    let steps = 25;
    for (model, initial, dt) in models() {
        for scheme in Scheme::ALL {
            let trajectory = run_steps(model.as_ref(), initial.clone(), dt, steps, scheme);

            assert!(trajectory.is_complete());
            assert_eq!(trajectory.len(), steps + 1);
            assert!(
                trajectory
                    .samples()
                    .iter()
                    .all(|sample| sample.state.dimension() == model.dimension())
            );
        }
    }
}

#[test]
fn identical_inputs_give_bitwise_identical_runs() {
    for (model, initial, dt) in models() {
        for scheme in Scheme::ALL {
            let first = run_steps(model.as_ref(), initial.clone(), dt, 200, scheme);
            let second = run_steps(model.as_ref(), initial.clone(), dt, 200, scheme);

            assert!(first.bitwise_eq(&second), "{scheme} run was not reproducible");
        }
    }
}

#[test]
fn coarse_euler_lorenz_diverges_and_marks_the_tail() {
    let (steps, dt) = (1000, 0.5);
    let trajectory = run_steps(
        &Lorenz::default(),
        StateVector::from([1.0, 1.0, 1.0]),
        dt,
        steps,
        Scheme::Euler,
    );

    assert_failed_tail(&trajectory, steps, dt);
    assert_eq!(trajectory.failure().unwrap().scheme, Scheme::Euler);

    let diagnostics = diagnose(&Lorenz::default(), &trajectory);
    let k = trajectory.valid_len();
    assert_eq!(diagnostics.len(), steps + 1);
    assert!(diagnostics.values()[..k].iter().all(Option::is_some));
    assert!(diagnostics.values()[k..].iter().all(Option::is_none));
}

#[test]
fn long_euler_lorenz_run_is_well_formed() {
    // At dt = 0.01 the Euler map may stay on a bounded attractor; either
    // outcome must produce a full-length, consistently marked trajectory.
    let (steps, dt) = (100_000, 0.01);
    let trajectory = run_steps(
        &Lorenz::default(),
        StateVector::from([1.0, 1.0, 1.0]),
        dt,
        steps,
        Scheme::Euler,
    );

    match trajectory.status() {
        Status::Completed => {
            assert_eq!(trajectory.len(), steps + 1);
            assert_eq!(trajectory.valid_len(), steps + 1);
        }
        Status::Failed => assert_failed_tail(&trajectory, steps, dt),
    }
}

#[test]
fn no_evaluation_happens_after_failure() {
    // Five healthy evaluations cover step 1 of RK4 and the first stage of
    // step 2; the second stage of step 2 is poisoned.
    let model = CountingDynamics::poisoned_after(
        Pendulum::new(STANDARD_GRAVITY, 1.0, 1.0).unwrap(),
        5,
    );
    let steps = 10;
    let trajectory = run_steps(
        &model,
        Pendulum::initial_state(0.2, 0.0).unwrap(),
        0.01,
        steps,
        Scheme::Rk4,
    );

    assert_failed_tail(&trajectory, steps, 0.01);
    let failure = trajectory.failure().unwrap();
    assert_eq!(failure.step, 2);
    assert_eq!(failure.checkpoint, Checkpoint::StageOutput(Stage::K2));
    assert_eq!(model.calls(), 6);
}

#[test]
fn healthy_runs_evaluate_each_stage_once_per_step() {
    for scheme in Scheme::ALL {
        let model = CountingDynamics::new(Lorenz::default());
        let trajectory = run_steps(
            &model,
            StateVector::from([1.0, 1.0, 1.0]),
            0.001,
            40,
            scheme,
        );

        assert!(trajectory.is_complete());
        assert_eq!(model.calls(), 40 * scheme.stages().len());
    }
}

#[test]
fn failure_at_the_first_stage_leaves_only_the_initial_sample() {
    let model = CountingDynamics::poisoned_after(Lorenz::default(), 0);
    let trajectory = run_steps(
        &model,
        StateVector::from([1.0, 1.0, 1.0]),
        0.01,
        5,
        Scheme::Midpoint,
    );

    assert_failed_tail(&trajectory, 5, 0.01);
    assert_eq!(trajectory.valid_len(), 1);
    assert_eq!(
        trajectory.failure().unwrap().checkpoint,
        Checkpoint::StageOutput(Stage::K1)
    );
    assert_eq!(model.calls(), 1);
}
