//! Power output from hub-height wind speed.

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use num_traits::Zero;
use uom::si::f64::{Area, MassDensity, Power, Ratio, Velocity};

use crate::support::{atmosphere::standard_density, units::SiValue};

use super::{
    ModelError,
    turbine::{Curve, CurveEnd},
};

/// Wind-speed scale factor `(ρ / 1.225 kg/m³)^(1/3)` for density correction.
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] if the density is not strictly positive.
pub fn density_correction_factor(density: MassDensity) -> Result<f64, ModelError> {
    let rho = density.to_si();
    if !(rho > 0.0 && rho.is_finite()) {
        return Err(ModelError::out_of_range(format!(
            "density correction needs a positive density, got {rho} kg/m³"
        )));
    }
    Ok((rho / standard_density().to_si()).cbrt())
}

/// Power from a tabulated power curve.
///
/// Below the first point the output is zero. Above the last point it is zero
/// for [`CurveEnd::CutOut`] and `nominal_power` for [`CurveEnd::Plateau`].
/// In between the curve is interpolated linearly.
///
/// With `density` given, the curve's wind-speed axis is scaled by
/// [`density_correction_factor`] at each timestamp. Scaling the axis by `f`
/// is the same as evaluating the original curve at `v / f`.
///
/// Results are clamped to `[0, nominal_power]`.
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] for negative wind speeds or
/// non-positive densities.
pub fn power_curve(
    wind_speed: &[Velocity],
    curve: &Curve<Power>,
    nominal_power: Power,
    density: Option<&[MassDensity]>,
) -> Result<Vec<Power>, ModelError> {
    if let Some(density) = density {
        check_aligned(wind_speed, density)?;
    }

    let lookup = CurveLookup::new(curve)?;
    let nominal = nominal_power.to_si();

    wind_speed
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let v = checked_speed(*v, i)?;
            let v = match density {
                Some(density) => v / density_correction_factor(density[i])?,
                None => v,
            };
            let power = match lookup.at(v)? {
                Lookup::Outside => 0.0,
                Lookup::Plateau => nominal,
                Lookup::Value(power) => power,
            };
            Ok(Power::from_si(power.clamp(0.0, nominal)))
        })
        .collect()
}

/// Power from a power coefficient curve, `P = ½ · ρ · A · c_p · v³`.
///
/// The coefficient is interpolated linearly; outside the curve the same
/// cut-in, cut-out and plateau rules as [`power_curve`] apply.
/// Results are clamped to `[0, nominal_power]`.
///
/// # Errors
///
/// Returns [`ModelError::PhysicalRange`] for negative wind speeds or
/// non-positive densities.
pub fn power_coefficient_curve(
    wind_speed: &[Velocity],
    curve: &Curve<Ratio>,
    swept_area: Area,
    nominal_power: Power,
    density: &[MassDensity],
) -> Result<Vec<Power>, ModelError> {
    check_aligned(wind_speed, density)?;

    let lookup = CurveLookup::new(curve)?;
    let nominal = nominal_power.to_si();
    let area = swept_area.to_si();

    wind_speed
        .iter()
        .zip(density)
        .enumerate()
        .map(|(i, (v, rho))| {
            let v = checked_speed(*v, i)?;
            let rho = rho.to_si();
            if !(rho > 0.0 && rho.is_finite()) {
                return Err(ModelError::out_of_range(format!(
                    "density at position {i} is not strictly positive"
                )));
            }
            let power = match lookup.at(v)? {
                Lookup::Outside => 0.0,
                Lookup::Plateau => nominal,
                Lookup::Value(cp) => 0.5 * rho * area * cp * v.powi(3),
            };
            Ok(Power::from_si(power.clamp(0.0, nominal)))
        })
        .collect()
}

enum Lookup {
    Outside,
    Plateau,
    Value(f64),
}

/// Linear interpolation over a characteristic curve with explicit end handling.
struct CurveLookup {
    interp: Interp1DOwned<f64, Linear>,
    first: f64,
    last: f64,
    end: CurveEnd,
}

impl CurveLookup {
    fn new<Q>(curve: &Curve<Q>) -> Result<Self, ModelError>
    where
        Q: SiValue + PartialOrd + Zero,
    {
        let speeds = curve.wind_speeds();
        let (first, last) = match (speeds.first(), speeds.last()) {
            (Some(first), Some(last)) => (first.to_si(), last.to_si()),
            _ => return Err(ModelError::insufficient("characteristic curve is empty")),
        };

        let x = Array1::from_iter(speeds.iter().map(|v| v.to_si()));
        let f_x = Array1::from_iter(curve.values().iter().map(|value| value.to_si()));
        let interp = Interp1DOwned::new(x, f_x, Linear, Extrapolate::Error).map_err(|err| {
            ModelError::Interpolation {
                context: err.to_string(),
            }
        })?;

        Ok(Self {
            interp,
            first,
            last,
            end: curve.end(),
        })
    }

    fn at(&self, wind_speed: f64) -> Result<Lookup, ModelError> {
        if wind_speed < self.first {
            return Ok(Lookup::Outside);
        }
        if wind_speed > self.last {
            return Ok(match self.end {
                CurveEnd::CutOut => Lookup::Outside,
                CurveEnd::Plateau => Lookup::Plateau,
            });
        }
        self.interp
            .interpolate(&[wind_speed])
            .map(Lookup::Value)
            .map_err(|err| ModelError::Interpolation {
                context: err.to_string(),
            })
    }
}

fn checked_speed(wind_speed: Velocity, position: usize) -> Result<f64, ModelError> {
    let v = wind_speed.to_si();
    if v >= 0.0 && v.is_finite() {
        Ok(v)
    } else {
        Err(ModelError::out_of_range(format!(
            "wind speed at position {position} is negative or not finite"
        )))
    }
}

fn check_aligned(wind_speed: &[Velocity], density: &[MassDensity]) -> Result<(), ModelError> {
    if wind_speed.len() == density.len() {
        Ok(())
    } else {
        Err(ModelError::insufficient(format!(
            "{} wind speeds but {} densities",
            wind_speed.len(),
            density.len()
        )))
    }
}
