//! Vertical wind profiles.

use uom::si::f64::{Length, Velocity};

use crate::support::units::SiValue;

use super::{
    ModelError, WindSpeedModel,
    vertical::{Abscissa, interpolate_extrapolate},
    weather::{Variable, WeatherSeries},
};

/// Hellman exponent for neutral stability over open terrain.
pub const DEFAULT_HELLMAN_EXPONENT: f64 = 1.0 / 7.0;

/// Wind speed at `hub_height` from the logarithmic wind profile.
///
/// `v_hub = v · ln(h_hub / z0) / ln(h_data / z0)`
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] unless both heights exceed the
/// roughness length.
pub fn logarithmic(
    wind_speed: Velocity,
    data_height: Length,
    hub_height: Length,
    roughness_length: Length,
) -> Result<Velocity, ModelError> {
    let z0 = roughness_length.to_si();
    let (h_data, h_hub) = (data_height.to_si(), hub_height.to_si());

    if !(z0 > 0.0 && h_data > z0 && h_hub > z0) {
        return Err(ModelError::out_of_range(format!(
            "logarithmic profile needs heights above the roughness length \
             (z0={z0} m, data height={h_data} m, hub height={h_hub} m)"
        )));
    }

    Ok(Velocity::from_si(
        wind_speed.to_si() * (h_hub / z0).ln() / (h_data / z0).ln(),
    ))
}

/// Wind speed at `hub_height` from the Hellman power law.
///
/// `v_hub = v · (h_hub / h_data)^α`
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] if the data height is not positive.
pub fn hellman(
    wind_speed: Velocity,
    data_height: Length,
    hub_height: Length,
    exponent: f64,
) -> Result<Velocity, ModelError> {
    let h_data = data_height.to_si();
    if h_data <= 0.0 {
        return Err(ModelError::out_of_range(
            "Hellman profile needs a positive data height",
        ));
    }

    Ok(Velocity::from_si(
        wind_speed.to_si() * (hub_height.to_si() / h_data).powf(exponent),
    ))
}

/// Hellman exponent estimated from the roughness length, `α = 1 / ln(h_hub / z0)`.
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] unless the hub height exceeds the
/// roughness length.
pub fn hellman_exponent(hub_height: Length, roughness_length: Length) -> Result<f64, ModelError> {
    let (h_hub, z0) = (hub_height.to_si(), roughness_length.to_si());
    if !(z0 > 0.0 && h_hub > z0) {
        return Err(ModelError::out_of_range(format!(
            "Hellman exponent needs hub height above roughness length \
             (z0={z0} m, hub height={h_hub} m)"
        )));
    }
    Ok(1.0 / (h_hub / z0).ln())
}

/// Wind speed at hub height for every timestamp.
///
/// The profile is evaluated at `hub_height - obstacle_height`. When that
/// height is at or below the lowest measurement, the lowest measurement is
/// returned as is; when it matches a measured height, that series is
/// returned unchanged.
///
/// The logarithmic and Hellman profiles start from the measurement height
/// closest to the target.
///
/// # Errors
///
/// Returns [`ModelError::InsufficientData`] if the logarithmic profile has
/// no roughness length or an interpolating variant has a single height, and
/// [`ModelError::PhysicalRange`] for invalid heights or a negative result.
pub fn hub_wind_speed(
    model: WindSpeedModel,
    weather: &WeatherSeries,
    hub_height: Length,
    obstacle_height: Length,
    hellman_exponent_override: Option<f64>,
) -> Result<Vec<Velocity>, ModelError> {
    let profile = weather.wind_speed();
    let target = hub_height - obstacle_height;

    let lowest = profile
        .lowest()
        .ok_or_else(|| ModelError::insufficient("no wind speed data"))?;
    if target <= lowest.height() {
        return Ok(lowest.values().to_vec());
    }
    if let Some(level) = profile.at(target) {
        return Ok(level.values().to_vec());
    }

    let closest = || {
        profile
            .closest_to(target)
            .ok_or_else(|| ModelError::insufficient("no wind speed data"))
    };

    let speeds = match model {
        WindSpeedModel::Logarithmic => {
            let level = closest()?;
            let roughness = weather.roughness_length().ok_or_else(|| {
                ModelError::insufficient("logarithmic profile needs a roughness length")
            })?;
            level
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| logarithmic(*v, level.height(), target, roughness.at(i)))
                .collect::<Result<Vec<_>, _>>()?
        }
        WindSpeedModel::Hellman => {
            let level = closest()?;
            let roughness = weather.roughness_length();
            level
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let exponent = match (hellman_exponent_override, roughness) {
                        (Some(exponent), _) => exponent,
                        (None, Some(z0)) => hellman_exponent(target, z0.at(i))?,
                        (None, None) => DEFAULT_HELLMAN_EXPONENT,
                    };
                    hellman(*v, level.height(), target, exponent)
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        WindSpeedModel::InterpolationExtrapolation => {
            interpolate_extrapolate(profile, Variable::WindSpeed, target, Abscissa::Height)?
        }
        WindSpeedModel::LogInterpolationExtrapolation => {
            interpolate_extrapolate(profile, Variable::WindSpeed, target, Abscissa::LogHeight)?
        }
    };

    if let Some(position) = speeds.iter().position(|v| !(v.to_si() >= 0.0)) {
        return Err(ModelError::out_of_range(format!(
            "hub-height wind speed at position {position} is negative or not a number"
        )));
    }

    Ok(speeds)
}
