//! Whole-run descriptions loaded from TOML or JSON.
//!
//! A [`ScenarioConfig`] is plain data: time step, horizon, scheme name, model
//! parameters, and initial state. [`Scenario::from_config`] validates all of
//! it once and produces a [`Scenario`] that can be run repeatedly.
//!
//! ```toml
//! dt = 0.01
//! steps = 1000
//! scheme = "rk4"
//! initial = [0.785, 0.0]
//!
//! [model]
//! kind = "pendulum"
//! length = 1.0
//! mass = 1.0
//! ```

use serde::{Deserialize, Deserializer, Serialize, de};
use strand_core::{Diagnose, Dynamics, Observer, StateVector};
use strand_solvers::{
    Config, Diagnostics, Horizon, Scheme, Trajectory,
    runner::{self, ConfigError, Event},
};
use thiserror::Error;

use crate::{
    DragProjectile, Lorenz, ParamError, Pendulum, RollingBody, STANDARD_GRAVITY, Shape,
    SunEarthMoon, VibratingString,
};

/// Serializable description of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub dt: f64,

    /// Number of steps. Exactly one of `steps` and `duration` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,

    /// Simulated duration, converted to `ceil(duration / dt)` steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Scheme name, matched case-insensitively.
    #[serde(default = "default_scheme")]
    pub scheme: Scheme,

    pub initial: InitialConfig,

    pub model: ModelConfig,
}

fn default_scheme() -> Scheme {
    Scheme::Rk4
}

fn standard_gravity() -> f64 {
    STANDARD_GRAVITY
}

/// Model parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ModelConfig {
    Pendulum {
        #[serde(default = "standard_gravity")]
        gravity: f64,
        length: f64,
        mass: f64,
    },
    RollingBody {
        shape: Shape,
        mass: f64,
        radius: f64,
        incline_degrees: f64,
        height: f64,
        #[serde(default = "standard_gravity")]
        gravity: f64,
    },
    SunEarthMoon {
        #[serde(default = "sun_earth_moon::gravitational_constant")]
        gravitational_constant: f64,
        #[serde(default = "sun_earth_moon::sun_mass")]
        sun_mass: f64,
        #[serde(default = "sun_earth_moon::earth_mass")]
        earth_mass: f64,
        #[serde(default = "sun_earth_moon::moon_mass")]
        moon_mass: f64,
    },
    Lorenz {
        #[serde(default = "lorenz::a")]
        a: f64,
        #[serde(default = "lorenz::b")]
        b: f64,
        #[serde(default = "lorenz::c")]
        c: f64,
    },
    DragProjectile {
        drag: f64,
        mass: f64,
        #[serde(default = "standard_gravity")]
        gravity: f64,
    },
    VibratingString {
        length: f64,
        segments: usize,
        wave_speed: f64,
    },
}

mod sun_earth_moon {
    use crate::SunEarthMoon;

    pub(super) fn gravitational_constant() -> f64 {
        SunEarthMoon::GRAVITATIONAL_CONSTANT
    }
    pub(super) fn sun_mass() -> f64 {
        SunEarthMoon::SUN_MASS
    }
    pub(super) fn earth_mass() -> f64 {
        SunEarthMoon::EARTH_MASS
    }
    pub(super) fn moon_mass() -> f64 {
        SunEarthMoon::MOON_MASS
    }
    pub(super) fn earth_sun_distance() -> f64 {
        SunEarthMoon::EARTH_SUN_DISTANCE
    }
    pub(super) fn earth_moon_distance() -> f64 {
        SunEarthMoon::EARTH_MOON_DISTANCE
    }
}

mod lorenz {
    pub(super) fn a() -> f64 {
        10.0
    }
    pub(super) fn b() -> f64 {
        28.0
    }
    pub(super) fn c() -> f64 {
        8.0 / 3.0
    }
}

/// The initial state: explicit values, or a model-specific preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InitialConfig {
    Values(StateVector),
    Preset(Preset),
}

/// Either shape of `initial`, before a table is read as a [`Preset`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInitial {
    Values(StateVector),
    Table(serde_json::Value),
}

// An untagged `Preset` would hide which preset key was wrong.
impl<'de> Deserialize<'de> for InitialConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawInitial::deserialize(deserializer)? {
            RawInitial::Values(values) => Ok(InitialConfig::Values(values)),
            RawInitial::Table(table) => serde_json::from_value(table)
                .map(InitialConfig::Preset)
                .map_err(de::Error::custom),
        }
    }
}

/// Initial-state builders that depend on model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case", deny_unknown_fields)]
pub enum Preset {
    /// Circular orbits for the Sun-Earth-Moon system.
    CircularOrbits {
        #[serde(default = "sun_earth_moon::earth_sun_distance")]
        earth_sun_distance: f64,
        #[serde(default = "sun_earth_moon::earth_moon_distance")]
        earth_moon_distance: f64,
    },

    /// A resting half-sine for the vibrating string.
    HalfSine { amplitude: f64 },
}

impl Preset {
    fn name(self) -> &'static str {
        match self {
            Preset::CircularOrbits { .. } => "circular_orbits",
            Preset::HalfSine { .. } => "half_sine",
        }
    }
}

/// Errors that can occur while building or running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("exactly one of `steps` and `duration` must be given")]
    Horizon,

    #[error("invalid model parameter: {0}")]
    Param(#[from] ParamError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("initial state for {model} has dimension {actual}, expected {expected}")]
    Dimension {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("preset `{preset}` does not apply to the {model} model")]
    PresetMismatch {
        preset: &'static str,
        model: &'static str,
    },

    #[error(transparent)]
    Run(#[from] runner::Error),
}

/// Any of the built-in models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Model {
    Pendulum(Pendulum),
    RollingBody(RollingBody),
    SunEarthMoon(SunEarthMoon),
    Lorenz(Lorenz),
    DragProjectile(DragProjectile),
    VibratingString(VibratingString),
}

impl Model {
    /// Returns the model's `kind` name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Model::Pendulum(_) => "pendulum",
            Model::RollingBody(_) => "rolling_body",
            Model::SunEarthMoon(_) => "sun_earth_moon",
            Model::Lorenz(_) => "lorenz",
            Model::DragProjectile(_) => "drag_projectile",
            Model::VibratingString(_) => "vibrating_string",
        }
    }

    /// Computes the model's diagnostics for a trajectory.
    #[must_use]
    pub fn diagnostics(&self, trajectory: &Trajectory) -> ModelDiagnostics {
        match self {
            Model::Pendulum(m) => ModelDiagnostics::Pendulum(Diagnostics::compute(m, trajectory)),
            Model::RollingBody(m) => {
                ModelDiagnostics::RollingBody(Diagnostics::compute(m, trajectory))
            }
            Model::SunEarthMoon(m) => {
                ModelDiagnostics::SunEarthMoon(Diagnostics::compute(m, trajectory))
            }
            Model::Lorenz(m) => ModelDiagnostics::Lorenz(Diagnostics::compute(m, trajectory)),
            Model::DragProjectile(m) => {
                ModelDiagnostics::DragProjectile(Diagnostics::compute(m, trajectory))
            }
            Model::VibratingString(m) => {
                ModelDiagnostics::VibratingString(Diagnostics::compute(m, trajectory))
            }
        }
    }

    fn from_config(config: &ModelConfig) -> Result<Self, ParamError> {
        Ok(match *config {
            ModelConfig::Pendulum {
                gravity,
                length,
                mass,
            } => Model::Pendulum(Pendulum::new(gravity, length, mass)?),
            ModelConfig::RollingBody {
                shape,
                mass,
                radius,
                incline_degrees,
                height,
                gravity,
            } => Model::RollingBody(RollingBody::from_degrees(
                shape,
                mass,
                radius,
                incline_degrees,
                height,
                gravity,
            )?),
            ModelConfig::SunEarthMoon {
                gravitational_constant,
                sun_mass,
                earth_mass,
                moon_mass,
            } => Model::SunEarthMoon(SunEarthMoon::new(
                gravitational_constant,
                sun_mass,
                earth_mass,
                moon_mass,
            )?),
            ModelConfig::Lorenz { a, b, c } => Model::Lorenz(Lorenz::new(a, b, c)?),
            ModelConfig::DragProjectile {
                drag,
                mass,
                gravity,
            } => Model::DragProjectile(DragProjectile::new(drag, mass, gravity)?),
            ModelConfig::VibratingString {
                length,
                segments,
                wave_speed,
            } => Model::VibratingString(VibratingString::new(length, segments, wave_speed)?),
        })
    }

    fn preset_state(&self, preset: Preset) -> Result<StateVector, ScenarioError> {
        match (self, preset) {
            (
                Model::SunEarthMoon(system),
                Preset::CircularOrbits {
                    earth_sun_distance,
                    earth_moon_distance,
                },
            ) => Ok(system.circular_initial_state(earth_sun_distance, earth_moon_distance)?),
            (Model::VibratingString(string), Preset::HalfSine { amplitude }) => {
                Ok(string.half_sine_state(amplitude)?)
            }
            _ => Err(ScenarioError::PresetMismatch {
                preset: preset.name(),
                model: self.name(),
            }),
        }
    }
}

impl Dynamics for Model {
    fn dimension(&self) -> usize {
        match self {
            Model::Pendulum(m) => m.dimension(),
            Model::RollingBody(m) => m.dimension(),
            Model::SunEarthMoon(m) => m.dimension(),
            Model::Lorenz(m) => m.dimension(),
            Model::DragProjectile(m) => m.dimension(),
            Model::VibratingString(m) => m.dimension(),
        }
    }

    fn derivative(&self, state: &StateVector) -> StateVector {
        match self {
            Model::Pendulum(m) => m.derivative(state),
            Model::RollingBody(m) => m.derivative(state),
            Model::SunEarthMoon(m) => m.derivative(state),
            Model::Lorenz(m) => m.derivative(state),
            Model::DragProjectile(m) => m.derivative(state),
            Model::VibratingString(m) => m.derivative(state),
        }
    }
}

macro_rules! impl_from_model {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Model {
                fn from(model: $variant) -> Self {
                    Model::$variant(model)
                }
            }
        )*
    };
}

impl_from_model!(
    Pendulum,
    RollingBody,
    SunEarthMoon,
    Lorenz,
    DragProjectile,
    VibratingString,
);

/// Diagnostics for any of the built-in models.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelDiagnostics {
    Pendulum(Diagnostics<<Pendulum as Diagnose>::Diagnostic>),
    RollingBody(Diagnostics<<RollingBody as Diagnose>::Diagnostic>),
    SunEarthMoon(Diagnostics<<SunEarthMoon as Diagnose>::Diagnostic>),
    Lorenz(Diagnostics<<Lorenz as Diagnose>::Diagnostic>),
    DragProjectile(Diagnostics<<DragProjectile as Diagnose>::Diagnostic>),
    VibratingString(Diagnostics<<VibratingString as Diagnose>::Diagnostic>),
}

impl ModelDiagnostics {
    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ModelDiagnostics::Pendulum(d) => d.len(),
            ModelDiagnostics::RollingBody(d) => d.len(),
            ModelDiagnostics::SunEarthMoon(d) => d.len(),
            ModelDiagnostics::Lorenz(d) => d.len(),
            ModelDiagnostics::DragProjectile(d) => d.len(),
            ModelDiagnostics::VibratingString(d) => d.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total-energy series, `NaN` where undefined.
    ///
    /// The Lorenz system has no energy and yields `None`.
    #[must_use]
    pub fn total_energy(&self) -> Option<Vec<f64>> {
        match self {
            ModelDiagnostics::Pendulum(d) => Some(d.series(|e| e.total)),
            ModelDiagnostics::RollingBody(d) => Some(d.series(|e| e.total)),
            ModelDiagnostics::SunEarthMoon(d) => Some(d.series(|e| e.total)),
            ModelDiagnostics::Lorenz(_) => None,
            ModelDiagnostics::DragProjectile(d) => Some(d.series(|e| e.total)),
            ModelDiagnostics::VibratingString(d) => Some(d.series(|e| e.total)),
        }
    }
}

/// A validated model, initial state, and runner config.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    model: Model,
    initial: StateVector,
    config: Config,
}

impl Scenario {
    /// Creates a scenario, checking the initial state against the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial state has the wrong dimension or a
    /// non-finite component.
    pub fn new(
        model: impl Into<Model>,
        initial: StateVector,
        config: Config,
    ) -> Result<Self, ScenarioError> {
        let model = model.into();

        let expected = model.dimension();
        if initial.dimension() != expected {
            return Err(ScenarioError::Dimension {
                model: model.name(),
                expected,
                actual: initial.dimension(),
            });
        }
        if let Some((index, value)) = initial.first_non_finite() {
            return Err(runner::Error::NonFiniteInitialState { index, value }.into());
        }

        if let Model::VibratingString(string) = &model {
            let courant = string.courant_number(config.dt());
            tracing::debug!(courant, "vibrating string stability number");
        }

        Ok(Self {
            model,
            initial,
            config,
        })
    }

    /// Builds a scenario from its serializable description.
    ///
    /// # Errors
    ///
    /// Returns an error if the horizon is not exactly one of steps or duration,
    /// a parameter is out of range, the runner config is invalid, or the
    /// initial state does not fit the model.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ScenarioError> {
        let scheme = config.scheme;

        let horizon = match (config.steps, config.duration) {
            (Some(steps), None) => Horizon::Steps(steps),
            (None, Some(duration)) => Horizon::Duration(duration),
            _ => return Err(ScenarioError::Horizon),
        };
        let runner_config = Config::new(config.dt, horizon, scheme)?;

        let model = Model::from_config(&config.model)?;
        let initial = match &config.initial {
            InitialConfig::Values(values) => values.clone(),
            InitialConfig::Preset(preset) => model.preset_state(*preset)?,
        };

        tracing::debug!(
            model = model.name(),
            %scheme,
            dt = config.dt,
            steps = runner_config.steps(),
            "scenario loaded"
        );

        Self::new(model, initial, runner_config)
    }

    /// Parses and validates a TOML scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the scenario is invalid.
    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = toml::from_str(s)?;
        Self::from_config(&config)
    }

    /// Parses and validates a JSON scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the scenario is invalid.
    pub fn from_json_str(s: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_json::from_str(s)?;
        Self::from_config(&config)
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn initial(&self) -> &StateVector {
        &self.initial
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the scenario and computes its diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error only if the runner rejects the initial state, which
    /// [`Scenario::new`] has already checked.
    pub fn run(&self) -> Result<Report, ScenarioError> {
        self.run_observed(())
    }

    /// Runs the scenario with an observer and computes its diagnostics.
    ///
    /// # Errors
    ///
    /// See [`Scenario::run`].
    pub fn run_observed<Obs>(&self, observer: Obs) -> Result<Report, ScenarioError>
    where
        Obs: for<'a> Observer<Event<'a>>,
    {
        let trajectory = runner::run(&self.model, self.initial.clone(), &self.config, observer)?;
        let diagnostics = self.model.diagnostics(&trajectory);
        Ok(Report {
            trajectory,
            diagnostics,
        })
    }
}

/// The result of running a scenario.
#[derive(Debug, Clone)]
pub struct Report {
    pub trajectory: Trajectory,
    pub diagnostics: ModelDiagnostics,
}

impl Report {
    /// Returns `true` if every step completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.trajectory.is_complete()
    }

    /// Returns a one-line outcome message.
    ///
    /// A failed run is reported as a warning naming the step, scheme, and
    /// stage, rather than as a successful run with bad data.
    #[must_use]
    pub fn summary(&self) -> String {
        let total = self.trajectory.len();
        match self.trajectory.failure() {
            None => format!("completed: {total} samples"),
            Some(failure) => format!(
                "warning: {failure}; {} of {total} samples valid",
                self.trajectory.valid_len()
            ),
        }
    }
}
