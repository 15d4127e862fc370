//! Hub-height weather resolution and turbine power evaluation.
//!
//! Each stage is a pure function over immutable inputs; [`ModelChain`]
//! sequences them and owns the error and state handling for a run.

mod catalog;
mod chain;
mod config;
mod density;
mod error;
mod power_output;
mod results;
mod temperature;
mod turbine;
mod vertical;
mod weather;
mod wind_profile;

#[cfg(test)]
mod test_support;

pub use catalog::{CatalogEntry, CatalogError, TurbineCatalog};
pub use chain::{ModelChain, ModelChainRun, RunState};
pub use config::{DensityModel, PipelineConfig, PowerOutputModel, TemperatureModel, WindSpeedModel};
pub use density::hub_density;
pub use error::{ConfigurationError, ModelChainError, ModelError, Stage, ValidationError};
pub use power_output::{density_correction_factor, power_coefficient_curve, power_curve};
pub use results::{Diagnostics, ModelChainResults, PowerSeries};
pub use temperature::hub_temperature;
pub use turbine::{BETZ_LIMIT, BetzLimit, Curve, CurveEnd, TurbineSpec, TurbineSpecBuilder};
pub use weather::{Level, Profile, RoughnessLength, Variable, WeatherSeries, WeatherSeriesBuilder};
pub use wind_profile::{
    DEFAULT_HELLMAN_EXPONENT, hellman, hellman_exponent, hub_wind_speed, logarithmic,
};
