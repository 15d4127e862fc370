//! Model chain configuration.

use std::{collections::HashSet, fmt, str::FromStr};

use uom::si::{f64::Length, length::meter};

use crate::support::constraint::{NonNegative, StrictlyPositive};

use super::ConfigurationError;

macro_rules! model_variants {
    (
        $(#[$meta:meta])*
        $name:ident, $option:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Name of the configuration option selecting this model.
            pub const OPTION: &'static str = $option;

            /// Canonical name of the variant.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigurationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ConfigurationError::UnknownVariant {
                        option: $option,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

model_variants!(
    /// Vertical wind profile used to move wind speed to hub height.
    WindSpeedModel, "wind_speed_model" {
        /// Logarithmic profile using the surface roughness length.
        #[default]
        Logarithmic => "logarithmic",
        /// Power law with the Hellman exponent.
        Hellman => "hellman",
        /// Linear in height between or beyond the two nearest levels.
        InterpolationExtrapolation => "interpolation_extrapolation",
        /// Linear in the logarithm of height between or beyond the two nearest levels.
        LogInterpolationExtrapolation => "log_interpolation_extrapolation",
    }
);

model_variants!(
    /// Model used to obtain hub-height temperature.
    TemperatureModel, "temperature_model" {
        /// Standard-atmosphere temperature gradient from the closest level.
        #[default]
        LinearGradient => "linear_gradient",
        /// Linear in height between or beyond the two nearest levels.
        InterpolationExtrapolation => "interpolation_extrapolation",
    }
);

model_variants!(
    /// Model used to obtain hub-height air density.
    DensityModel, "density_model" {
        /// Barometric form referenced to the standard atmosphere.
        #[default]
        Barometric => "barometric",
        /// Ideal gas equation of state.
        IdealGas => "ideal_gas",
        /// Linear in height between or beyond the two nearest density levels.
        InterpolationExtrapolation => "interpolation_extrapolation",
    }
);

model_variants!(
    /// Model used to turn hub-height wind speed into power.
    PowerOutputModel, "power_output_model" {
        /// Interpolate the tabulated power curve.
        #[default]
        PowerCurve => "power_curve",
        /// Interpolate the power coefficient and apply `½ ρ A c_p v³`.
        PowerCoefficientCurve => "power_coefficient_curve",
    }
);

impl DensityModel {
    /// Returns `true` if this model needs hub-height temperature.
    #[must_use]
    pub fn requires_temperature(self) -> bool {
        matches!(self, Self::Barometric | Self::IdealGas)
    }
}

/// Selects one variant per model plus scalar options for a model chain run.
///
/// Every option is enumerated here; [`PipelineConfig::default`] spells out
/// the default of each. [`PipelineConfig::validate`] checks the scalar
/// options and is called by the model chain on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PipelineConfig {
    pub wind_speed_model: WindSpeedModel,
    pub temperature_model: TemperatureModel,
    pub density_model: DensityModel,
    pub power_output_model: PowerOutputModel,

    /// Rescale the power curve for non-standard air density.
    ///
    /// Has no effect with [`PowerOutputModel::PowerCoefficientCurve`],
    /// where density enters the power formula directly.
    pub density_correction: bool,

    /// Height of obstacles upstream of the turbine.
    ///
    /// The wind profile is evaluated at hub height minus this value.
    pub obstacle_height: Length,

    /// Hellman exponent; estimated from roughness (or 1/7) when `None`.
    pub hellman_exponent: Option<f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            wind_speed_model: WindSpeedModel::Logarithmic,
            temperature_model: TemperatureModel::LinearGradient,
            density_model: DensityModel::Barometric,
            power_output_model: PowerOutputModel::PowerCurve,
            density_correction: false,
            obstacle_height: Length::new::<meter>(0.0),
            hellman_exponent: None,
        }
    }
}

impl PipelineConfig {
    /// Builds a configuration from keyword options.
    ///
    /// Recognized keys are `wind_speed_model`, `temperature_model`,
    /// `density_model`, `power_output_model`, `density_correction`
    /// (`true`/`false`), `obstacle_height` (metres) and `hellman_exponent`
    /// (a number, or `none`). Keys that are not given keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for unknown or duplicate keys,
    /// unknown variant names, and values that fail to parse or validate.
    pub fn from_options<'a, I>(options: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        let mut seen = HashSet::new();

        for (key, value) in options {
            if !seen.insert(key) {
                return Err(ConfigurationError::DuplicateOption {
                    key: key.to_owned(),
                });
            }

            match key {
                WindSpeedModel::OPTION => config.wind_speed_model = value.parse()?,
                TemperatureModel::OPTION => config.temperature_model = value.parse()?,
                DensityModel::OPTION => config.density_model = value.parse()?,
                PowerOutputModel::OPTION => config.power_output_model = value.parse()?,
                "density_correction" => {
                    config.density_correction = value
                        .parse()
                        .map_err(|_| invalid("density_correction", value))?;
                }
                "obstacle_height" => {
                    let height: f64 = value
                        .parse()
                        .map_err(|_| invalid("obstacle_height", value))?;
                    config.obstacle_height = Length::new::<meter>(height);
                }
                "hellman_exponent" => {
                    config.hellman_exponent = if value.eq_ignore_ascii_case("none") {
                        None
                    } else {
                        Some(
                            value
                                .parse()
                                .map_err(|_| invalid("hellman_exponent", value))?,
                        )
                    };
                }
                _ => {
                    return Err(ConfigurationError::UnknownOption {
                        key: key.to_owned(),
                    });
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the scalar options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] if the obstacle height is
    /// negative or not finite, or the Hellman exponent is not a finite
    /// positive number.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let obstacle = self.obstacle_height.get::<meter>();
        if !obstacle.is_finite() || NonNegative::new(obstacle).is_err() {
            return Err(invalid("obstacle_height", obstacle));
        }

        if let Some(exponent) = self.hellman_exponent {
            if !exponent.is_finite() || StrictlyPositive::new(exponent).is_err() {
                return Err(invalid("hellman_exponent", exponent));
            }
        }

        Ok(())
    }

    /// Returns `true` if the power model uses hub-height density.
    #[must_use]
    pub fn needs_density(&self) -> bool {
        self.density_correction
            || self.power_output_model == PowerOutputModel::PowerCoefficientCurve
    }

    /// Returns `true` if the density model needs hub-height temperature.
    #[must_use]
    pub fn needs_temperature(&self) -> bool {
        self.needs_density() && self.density_model.requires_temperature()
    }
}

fn invalid(option: &'static str, value: impl ToString) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        option,
        value: value.to_string(),
    }
}
