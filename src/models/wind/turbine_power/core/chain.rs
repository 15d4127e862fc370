//! Orchestration of the temperature, density, wind speed and power stages.

use std::fmt;

use tracing::{debug, warn};

use super::{
    ConfigurationError, ModelChainError, ModelError, PipelineConfig, PowerOutputModel, Stage,
    TurbineSpec, WeatherSeries,
    density::hub_density,
    power_output,
    results::{Diagnostics, ModelChainResults, PowerSeries},
    temperature::hub_temperature,
    wind_profile::hub_wind_speed,
};

/// Lifecycle of a single model chain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Configured,
    Running,
    Completed,
    /// The run stopped at the given stage and produced no output.
    Failed(Stage),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => f.write_str("configured"),
            Self::Running => f.write_str("running"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(stage) => write!(f, "failed at {stage}"),
        }
    }
}

/// Estimates turbine power output from weather data.
///
/// Runs temperature → density → wind speed → power. Temperature and density
/// are only computed when the selected power model needs them.
///
/// A chain holds no mutable state and can be shared across threads; each
/// call to [`ModelChain::run`] is independent.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelChain {
    turbine: TurbineSpec,
    config: PipelineConfig,
}

impl ModelChain {
    /// Creates a chain for `turbine` using the models selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the config fails validation, the
    /// turbine lacks the curve the power model needs, or the obstacle height
    /// is above the hub height.
    pub fn new(turbine: TurbineSpec, config: PipelineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let has_curve = match config.power_output_model {
            PowerOutputModel::PowerCurve => turbine.power_curve().is_some(),
            PowerOutputModel::PowerCoefficientCurve => turbine.power_coefficient_curve().is_some(),
        };
        if !has_curve {
            return Err(ConfigurationError::Inconsistent {
                context: format!(
                    "{} model selected but the turbine has no matching curve",
                    config.power_output_model
                ),
            });
        }

        if config.obstacle_height > turbine.hub_height() {
            return Err(ConfigurationError::Inconsistent {
                context: format!(
                    "obstacle height {:?} is above hub height {:?}",
                    config.obstacle_height,
                    turbine.hub_height()
                ),
            });
        }

        Ok(Self { turbine, config })
    }

    #[must_use]
    pub fn turbine(&self) -> &TurbineSpec {
        &self.turbine
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the chain over a weather series.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelChainError`] naming the failed stage. No power series
    /// is produced for a failed run.
    pub fn run(&self, weather: &WeatherSeries) -> Result<ModelChainResults, ModelChainError> {
        ModelChainRun::new(self, weather).execute()
    }
}

/// A single invocation of a [`ModelChain`], tracking its [`RunState`].
#[derive(Debug)]
pub struct ModelChainRun<'a> {
    chain: &'a ModelChain,
    weather: &'a WeatherSeries,
    state: RunState,
}

impl<'a> ModelChainRun<'a> {
    #[must_use]
    pub fn new(chain: &'a ModelChain, weather: &'a WeatherSeries) -> Self {
        Self {
            chain,
            weather,
            state: RunState::Configured,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Executes every stage and moves to [`RunState::Completed`] or
    /// [`RunState::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelChainError::Rerun`] unless the run is still
    /// [`RunState::Configured`], otherwise any stage error.
    pub fn execute(&mut self) -> Result<ModelChainResults, ModelChainError> {
        if self.state != RunState::Configured {
            return Err(ModelChainError::Rerun { state: self.state });
        }

        self.state = RunState::Running;
        debug!(timestamps = self.weather.len(), "model chain running");

        match self.stages() {
            Ok(results) => {
                self.state = RunState::Completed;
                debug!("model chain completed");
                Ok(results)
            }
            Err(err) => {
                // Rerun never reaches here, so every error names a stage.
                if let Some(stage) = err.stage() {
                    self.state = RunState::Failed(stage);
                }
                warn!(error = %err, "model chain failed");
                Err(err)
            }
        }
    }

    fn stages(&self) -> Result<ModelChainResults, ModelChainError> {
        let ModelChain { turbine, config } = self.chain;
        let weather = self.weather;
        let hub_height = turbine.hub_height();

        let temperature_hub = if config.needs_temperature() {
            debug!(stage = %Stage::Temperature, model = %config.temperature_model, "running stage");
            Some(
                hub_temperature(config.temperature_model, weather.temperature(), hub_height)
                    .map_err(failed(Stage::Temperature))?,
            )
        } else {
            None
        };

        let density_hub = if config.needs_density() {
            debug!(stage = %Stage::Density, model = %config.density_model, "running stage");
            let temperature = if config.density_model.requires_temperature() {
                Some(upstream(
                    Stage::Density,
                    Stage::Temperature,
                    temperature_hub.as_deref(),
                )?)
            } else {
                None
            };
            Some(
                hub_density(config.density_model, weather, hub_height, temperature)
                    .map_err(failed(Stage::Density))?,
            )
        } else {
            None
        };

        debug!(stage = %Stage::WindSpeed, model = %config.wind_speed_model, "running stage");
        let wind_speed_hub = hub_wind_speed(
            config.wind_speed_model,
            weather,
            hub_height,
            config.obstacle_height,
            config.hellman_exponent,
        )
        .map_err(failed(Stage::WindSpeed))?;

        debug!(
            stage = %Stage::PowerOutput,
            model = %config.power_output_model,
            density_correction = config.density_correction,
            "running stage"
        );
        let power = match config.power_output_model {
            PowerOutputModel::PowerCurve => {
                let curve = turbine
                    .power_curve()
                    .ok_or_else(|| ModelError::insufficient("turbine has no power curve"))
                    .map_err(failed(Stage::PowerOutput))?;
                let density = if config.density_correction {
                    Some(upstream(
                        Stage::PowerOutput,
                        Stage::Density,
                        density_hub.as_deref(),
                    )?)
                } else {
                    None
                };
                power_output::power_curve(&wind_speed_hub, curve, turbine.nominal_power(), density)
            }
            PowerOutputModel::PowerCoefficientCurve => {
                let density =
                    upstream(Stage::PowerOutput, Stage::Density, density_hub.as_deref())?;
                match (turbine.power_coefficient_curve(), turbine.swept_area()) {
                    (Some(curve), Some(area)) => power_output::power_coefficient_curve(
                        &wind_speed_hub,
                        curve,
                        area,
                        turbine.nominal_power(),
                        density,
                    ),
                    _ => Err(ModelError::insufficient(
                        "turbine has no power coefficient curve or rotor diameter",
                    )),
                }
            }
        }
        .map_err(failed(Stage::PowerOutput))?;

        Ok(ModelChainResults {
            power_output: PowerSeries::new(weather.index().to_vec(), power),
            diagnostics: Diagnostics {
                wind_speed_hub,
                temperature_hub,
                density_hub,
            },
        })
    }
}

fn failed(stage: Stage) -> impl Fn(ModelError) -> ModelChainError {
    move |source| ModelChainError::Stage { stage, source }
}

/// Output of an earlier stage, or the dependency error if it was not produced.
fn upstream<T>(stage: Stage, missing: Stage, output: Option<&[T]>) -> Result<&[T], ModelChainError> {
    output.ok_or(ModelChainError::UpstreamDependency { stage, missing })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Power, power::watt};

    use crate::models::wind::turbine_power::core::{
        DensityModel, TemperatureModel, WindSpeedModel,
        test_support::{
            coefficient_curve, densities, example_power_curve, hourly_index, kelvins, meters, mps,
            pascals,
        },
    };

    fn turbine() -> TurbineSpec {
        TurbineSpec::builder(meters(100.0))
            .power_curve(example_power_curve())
            .build()
            .unwrap()
    }

    fn hub_height_weather() -> WeatherSeries {
        WeatherSeries::builder(hourly_index(3))
            .wind_speed(meters(100.0), mps(&[2.0, 5.0, 20.0]))
            .temperature(meters(2.0), kelvins(&[280.0, 281.0, 282.0]))
            .pressure(meters(0.0), pascals(&[101_000.0, 100_900.0, 100_800.0]))
            .build()
            .unwrap()
    }

    fn watts(series: &PowerSeries) -> Vec<f64> {
        series.values().iter().map(|p| p.get::<watt>()).collect()
    }

    #[test]
    fn power_curve_at_hub_height() {
        let chain = ModelChain::new(turbine(), PipelineConfig::default()).unwrap();
        let results = chain.run(&hub_height_weather()).unwrap();

        let power = watts(&results.power_output);
        assert_relative_eq!(power[0], 26_000.0, max_relative = 1e-12);
        assert_relative_eq!(power[1], 270_000.0);
        assert_relative_eq!(power[2], 4_500_000.0);

        assert_eq!(results.power_output.index(), hourly_index(3).as_slice());
        assert!(results.diagnostics.temperature_hub.is_none());
        assert!(results.diagnostics.density_hub.is_none());
    }

    #[test]
    fn density_correction_runs_temperature_and_density() {
        let config = PipelineConfig {
            density_correction: true,
            ..PipelineConfig::default()
        };
        let chain = ModelChain::new(turbine(), config).unwrap();
        let results = chain.run(&hub_height_weather()).unwrap();

        let temperature = results.diagnostics.temperature_hub.unwrap();
        let density = results.diagnostics.density_hub.unwrap();
        assert_eq!(temperature.len(), 3);
        assert_eq!(density.len(), 3);
        assert_eq!(results.power_output.len(), 3);
    }

    #[test]
    fn state_transitions() {
        let chain = ModelChain::new(turbine(), PipelineConfig::default()).unwrap();
        let weather = hub_height_weather();
        let mut run = ModelChainRun::new(&chain, &weather);

        assert_eq!(run.state(), RunState::Configured);
        assert!(run.execute().is_ok());
        assert_eq!(run.state(), RunState::Completed);
        assert_eq!(
            run.execute(),
            Err(ModelChainError::Rerun {
                state: RunState::Completed
            })
        );
    }

    #[test]
    fn failing_density_produces_no_power() {
        // No pressure data for the barometric model.
        let weather = WeatherSeries::builder(hourly_index(2))
            .wind_speed(meters(100.0), mps(&[5.0, 7.0]))
            .temperature(meters(2.0), kelvins(&[280.0, 281.0]))
            .build()
            .unwrap();
        let config = PipelineConfig {
            density_correction: true,
            ..PipelineConfig::default()
        };
        let chain = ModelChain::new(turbine(), config).unwrap();
        let mut run = ModelChainRun::new(&chain, &weather);

        let result = run.execute();
        assert!(matches!(
            result,
            Err(ModelChainError::Stage {
                stage: Stage::Density,
                source: ModelError::InsufficientData { .. },
            })
        ));
        assert_eq!(run.state(), RunState::Failed(Stage::Density));
    }

    #[test]
    fn failing_wind_stage_is_named() {
        // Logarithmic profile without roughness.
        let weather = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[5.0]))
            .build()
            .unwrap();
        let chain = ModelChain::new(turbine(), PipelineConfig::default()).unwrap();
        let err = chain.run(&weather).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::WindSpeed));
    }

    #[test]
    fn missing_upstream_output() {
        let result = upstream::<Power>(Stage::PowerOutput, Stage::Density, None);
        assert_eq!(
            result,
            Err(ModelChainError::UpstreamDependency {
                stage: Stage::PowerOutput,
                missing: Stage::Density,
            })
        );
    }

    #[test]
    fn coefficient_model_uses_measured_density() {
        let turbine = TurbineSpec::builder(meters(100.0))
            .power_coefficient_curve(coefficient_curve(&[(3.0, 0.2), (10.0, 0.45), (25.0, 0.1)]))
            .rotor_diameter(meters(100.0))
            .nominal_power(Power::new::<watt>(3e6))
            .build()
            .unwrap();
        let config = PipelineConfig {
            wind_speed_model: WindSpeedModel::InterpolationExtrapolation,
            temperature_model: TemperatureModel::InterpolationExtrapolation,
            density_model: DensityModel::InterpolationExtrapolation,
            power_output_model: PowerOutputModel::PowerCoefficientCurve,
            ..PipelineConfig::default()
        };
        let weather = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(100.0), mps(&[10.0]))
            .density(meters(100.0), densities(&[1.225]))
            .build()
            .unwrap();

        let chain = ModelChain::new(turbine, config).unwrap();
        let results = chain.run(&weather).unwrap();

        let area = std::f64::consts::PI * 50.0 * 50.0;
        let expected = 0.5 * 1.225 * area * 0.45 * 1000.0;
        assert_relative_eq!(
            watts(&results.power_output)[0],
            expected,
            max_relative = 1e-12
        );
        assert!(results.diagnostics.temperature_hub.is_none());
    }

    #[test]
    fn rejects_model_without_matching_curve() {
        let config = PipelineConfig {
            power_output_model: PowerOutputModel::PowerCoefficientCurve,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            ModelChain::new(turbine(), config),
            Err(ConfigurationError::Inconsistent { .. })
        ));
    }

    #[test]
    fn rejects_obstacle_above_hub() {
        let config = PipelineConfig {
            obstacle_height: meters(120.0),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            ModelChain::new(turbine(), config),
            Err(ConfigurationError::Inconsistent { .. })
        ));
    }

    #[test]
    fn obstacle_at_hub_height_uses_lowest_measurement() {
        let config = PipelineConfig {
            obstacle_height: meters(100.0),
            ..PipelineConfig::default()
        };
        let weather = WeatherSeries::builder(hourly_index(2))
            .wind_speed(meters(10.0), mps(&[5.0, 10.0]))
            .wind_speed(meters(80.0), mps(&[8.0, 14.0]))
            .build()
            .unwrap();

        let chain = ModelChain::new(turbine(), config).unwrap();
        let results = chain.run(&weather).unwrap();

        assert_eq!(results.diagnostics.wind_speed_hub, mps(&[5.0, 10.0]));
        let power = watts(&results.power_output);
        assert_relative_eq!(power[0], 270_000.0);
        assert_relative_eq!(power[1], 2_250_000.0);
    }
}
