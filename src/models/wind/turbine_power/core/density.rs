//! Hub-height air density.

use uom::si::f64::{Length, MassDensity, ThermodynamicTemperature};

use crate::support::{atmosphere, units::SiValue};

use super::{
    DensityModel, ModelError,
    vertical::{Abscissa, interpolate_extrapolate},
    weather::{Variable, WeatherSeries},
};

/// Air density at hub height for every timestamp.
///
/// [`DensityModel::Barometric`] and [`DensityModel::IdealGas`] move the
/// pressure from the measurement height closest to the hub along the
/// near-ground pressure gradient and combine it with `temperature_hub`.
/// [`DensityModel::InterpolationExtrapolation`] uses measured densities.
///
/// # Errors
///
/// Returns [`ModelError::InsufficientData`] if the required pressure,
/// density or hub temperature data is missing or `temperature_hub` does
/// not have one value per timestamp, and
/// [`ModelError::PhysicalRange`] if a density is not strictly positive.
pub fn hub_density(
    model: DensityModel,
    weather: &WeatherSeries,
    hub_height: Length,
    temperature_hub: Option<&[ThermodynamicTemperature]>,
) -> Result<Vec<MassDensity>, ModelError> {
    let densities = match model {
        DensityModel::Barometric | DensityModel::IdealGas => {
            let temperature_hub = temperature_hub.ok_or_else(|| {
                ModelError::insufficient(format!("{model} density needs hub-height temperature"))
            })?;
            if temperature_hub.len() != weather.len() {
                return Err(ModelError::insufficient(format!(
                    "{} hub temperatures for {} timestamps",
                    temperature_hub.len(),
                    weather.len()
                )));
            }
            let level = weather
                .pressure()
                .closest_to(hub_height)
                .ok_or_else(|| ModelError::insufficient("no pressure data"))?;

            level
                .values()
                .iter()
                .zip(temperature_hub)
                .map(|(p, t)| {
                    let p_hub = atmosphere::pressure_at_height(*p, level.height(), hub_height);
                    if model == DensityModel::Barometric {
                        atmosphere::barometric_density(p_hub, *t)
                    } else {
                        atmosphere::ideal_gas_density(*t, p_hub, atmosphere::dry_air_gas_constant())
                    }
                })
                .collect::<Vec<_>>()
        }
        DensityModel::InterpolationExtrapolation => interpolate_extrapolate(
            weather.density(),
            Variable::Density,
            hub_height,
            Abscissa::Height,
        )?,
    };

    if let Some(position) = densities
        .iter()
        .position(|rho| !(rho.to_si() > 0.0 && rho.to_si().is_finite()))
    {
        return Err(ModelError::out_of_range(format!(
            "hub-height density at position {position} is not strictly positive"
        )));
    }

    Ok(densities)
}
