//! Hub-height air temperature.

use uom::si::f64::{Length, ThermodynamicTemperature};

use crate::support::{atmosphere, units::SiValue};

use super::{
    ModelError, TemperatureModel,
    vertical::{Abscissa, interpolate_extrapolate},
    weather::{Profile, Variable},
};

/// Temperature at hub height for every timestamp.
///
/// A temperature measured exactly at hub height is returned unchanged.
/// [`TemperatureModel::LinearGradient`] applies the standard temperature
/// gradient from the measurement height closest to the hub.
///
/// # Errors
///
/// Returns [`ModelError::InsufficientData`] without temperature data (or
/// with a single height for interpolation), and
/// [`ModelError::PhysicalRange`] if a result is not above absolute zero.
pub fn hub_temperature(
    model: TemperatureModel,
    profile: &Profile<ThermodynamicTemperature>,
    hub_height: Length,
) -> Result<Vec<ThermodynamicTemperature>, ModelError> {
    if profile.is_empty() {
        return Err(ModelError::insufficient("no temperature data"));
    }

    let temperatures = match (model, profile.at(hub_height)) {
        (_, Some(level)) => level.values().to_vec(),
        (TemperatureModel::LinearGradient, None) => {
            let level = profile
                .closest_to(hub_height)
                .ok_or_else(|| ModelError::insufficient("no temperature data"))?;
            level
                .values()
                .iter()
                .map(|t| atmosphere::temperature_at_height(*t, level.height(), hub_height))
                .collect()
        }
        (TemperatureModel::InterpolationExtrapolation, None) => interpolate_extrapolate(
            profile,
            Variable::Temperature,
            hub_height,
            Abscissa::Height,
        )?,
    };

    if let Some(position) = temperatures.iter().position(|t| !(t.to_si() > 0.0)) {
        return Err(ModelError::out_of_range(format!(
            "hub-height temperature at position {position} is not above absolute zero"
        )));
    }

    Ok(temperatures)
}
