use std::fmt;

use thiserror::Error;
use uom::si::f64::Length;

use crate::support::constraint::ConstraintError;

use super::{RunState, weather::Variable};

/// Errors raised while constructing a [`TurbineSpec`](super::TurbineSpec)
/// or a [`WeatherSeries`](super::WeatherSeries).
///
/// These are detected before any model runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A scalar field violated its numeric constraint.
    #[error("invalid {field}")]
    Constraint {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// A characteristic curve is malformed.
    #[error("invalid characteristic curve: {context}")]
    Curve { context: String },

    /// A power coefficient exceeds the Betz limit.
    #[error("power coefficient {value} at point {position} exceeds the Betz limit")]
    AboveBetzLimit { position: usize, value: f64 },

    /// The turbine has neither a power curve nor a power coefficient curve.
    #[error("turbine has no characteristic curve")]
    MissingCurve,

    /// A power coefficient curve was given without a rotor diameter.
    #[error("a power coefficient curve requires a rotor diameter")]
    MissingRotorDiameter,

    /// Nominal power is required but was not given.
    #[error("nominal power is required when no power curve is given")]
    MissingNominalPower,

    /// The timestamp index is empty.
    #[error("weather index is empty")]
    EmptyIndex,

    /// The timestamp index is not strictly increasing.
    #[error("weather index is not strictly increasing at position {position}")]
    UnorderedIndex { position: usize },

    /// A required variable is absent.
    #[error("missing required variable: {variable}")]
    MissingVariable { variable: Variable },

    /// A measurement height is negative or not finite.
    #[error("invalid {variable} height: {height:?}")]
    InvalidHeight { variable: Variable, height: Length },

    /// The same variable was supplied twice at one height.
    #[error("duplicate {variable} series at {height:?}")]
    DuplicateHeight { variable: Variable, height: Length },

    /// A series does not align with the timestamp index.
    #[error("{variable} series has {actual} values, expected {expected}")]
    LengthMismatch {
        variable: Variable,
        expected: usize,
        actual: usize,
    },

    /// A series contains a value that is not finite.
    #[error("{variable} series has a non-finite value at position {position}")]
    NonFinite { variable: Variable, position: usize },
}

/// Errors raised while parsing or checking a [`PipelineConfig`](super::PipelineConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A model option names a variant that does not exist.
    #[error("unknown {option} variant: {value:?}")]
    UnknownVariant { option: &'static str, value: String },

    /// An option key is not recognized.
    #[error("unknown configuration option: {key:?}")]
    UnknownOption { key: String },

    /// An option key appears more than once.
    #[error("duplicate configuration option: {key:?}")]
    DuplicateOption { key: String },

    /// An option value could not be parsed or is out of range.
    #[error("invalid value for {option}: {value:?}")]
    InvalidValue { option: &'static str, value: String },

    /// Options are inconsistent with each other or with the turbine.
    #[error("inconsistent configuration: {context}")]
    Inconsistent { context: String },
}

/// Errors raised by an individual model while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The selected variant needs data the weather series does not provide.
    #[error("insufficient data: {context}")]
    InsufficientData { context: String },

    /// An intermediate result left the physically valid range.
    #[error("outside physical range: {context}")]
    PhysicalRange { context: String },

    /// Characteristic curve lookup failed.
    #[error("curve interpolation failed: {context}")]
    Interpolation { context: String },
}

impl ModelError {
    pub(super) fn insufficient(context: impl Into<String>) -> Self {
        Self::InsufficientData {
            context: context.into(),
        }
    }

    pub(super) fn out_of_range(context: impl Into<String>) -> Self {
        Self::PhysicalRange {
            context: context.into(),
        }
    }
}

/// A stage of the model chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Temperature,
    Density,
    WindSpeed,
    PowerOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temperature => "temperature",
            Self::Density => "density",
            Self::WindSpeed => "wind speed",
            Self::PowerOutput => "power output",
        })
    }
}

/// Errors that abort a model chain run.
///
/// A failed run never produces a partial power series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelChainError {
    /// A model failed.
    #[error("{stage} model failed")]
    Stage {
        stage: Stage,
        #[source]
        source: ModelError,
    },

    /// A stage needed the output of an earlier stage that was not produced.
    #[error("{stage} model requires {missing} output, which was not produced")]
    UpstreamDependency { stage: Stage, missing: Stage },

    /// The run was already executed.
    #[error("run cannot be executed from state {state}")]
    Rerun { state: RunState },
}

impl ModelChainError {
    /// Returns the stage that failed, if the error came from a stage.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } | Self::UpstreamDependency { stage, .. } => Some(*stage),
            Self::Rerun { .. } => None,
        }
    }
}
