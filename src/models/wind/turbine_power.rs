//! Wind turbine power output from weather time series.
//!
//! [`ModelChain`] is the [`twine_core::Model`] for this domain: given a
//! [`WeatherSeries`] it resolves hub-height temperature, density and wind
//! speed, then evaluates the turbine's characteristic curve at every
//! timestamp. The computational core lives in the internal `core` module;
//! the individual stage functions are re-exported for callers that only
//! need one of them.
//!
//! ```
//! use twine_core::Model;
//! use twine_wind::models::wind::turbine_power::{
//!     Curve, ModelChain, PipelineConfig, TurbineSpec, WeatherSeries,
//! };
//! use uom::si::{f64::{Length, Power, Velocity}, length::meter, power::watt, velocity::meter_per_second};
//!
//! let v = Velocity::new::<meter_per_second>;
//! let p = Power::new::<watt>;
//! let curve = Curve::new([(v(3.0), p(0.0)), (v(12.0), p(2.0e6)), (v(25.0), p(2.0e6))])?;
//! let turbine = TurbineSpec::builder(Length::new::<meter>(100.0))
//!     .power_curve(curve)
//!     .build()?;
//!
//! let index = vec![jiff::Timestamp::from_second(1_672_531_200)?];
//! let weather = WeatherSeries::builder(index)
//!     .wind_speed(Length::new::<meter>(100.0), vec![v(12.0)])
//!     .build()?;
//!
//! let chain = ModelChain::new(turbine, PipelineConfig::default())?;
//! let results = chain.call(&weather)?;
//! assert_eq!(results.power_output.values(), &[p(2.0e6)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod core;

pub use self::core::{
    BETZ_LIMIT, BetzLimit, CatalogEntry, CatalogError, ConfigurationError, Curve, CurveEnd,
    DEFAULT_HELLMAN_EXPONENT, DensityModel, Diagnostics, Level, ModelChain, ModelChainError,
    ModelChainResults, ModelChainRun, ModelError, PipelineConfig, PowerOutputModel, PowerSeries,
    Profile, RoughnessLength, RunState, Stage, TemperatureModel, TurbineCatalog, TurbineSpec,
    TurbineSpecBuilder, ValidationError, Variable, WeatherSeries, WeatherSeriesBuilder,
    WindSpeedModel, density_correction_factor, hellman, hellman_exponent, hub_density,
    hub_temperature, hub_wind_speed, logarithmic, power_coefficient_curve, power_curve,
};

use twine_core::Model;

impl Model for ModelChain {
    type Input = WeatherSeries;
    type Output = ModelChainResults;
    type Error = ModelChainError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.run(input)
    }
}
