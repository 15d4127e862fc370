//! Turbine characteristic curves and geometry.

use std::f64::consts::PI;

use num_traits::Zero;
use uom::si::{
    area::square_meter,
    f64::{Area, Length, MassDensity, Power, Ratio, Velocity},
    length::meter,
    ratio::ratio,
};

use crate::support::{
    constraint::{Constrained, Constraint, ConstraintError, NonNegative, StrictlyPositive},
    units::SiValue,
};

use super::{ModelError, ValidationError, power_output::density_correction_factor};

/// Theoretical maximum power coefficient of a wind turbine (16/27).
pub const BETZ_LIMIT: f64 = 16.0 / 27.0;

/// Marker type bounding a power coefficient to `0 ≤ c_p ≤ 16/27`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetzLimit;

impl Constraint<Ratio> for BetzLimit {
    fn check(value: &Ratio) -> Result<(), ConstraintError> {
        <NonNegative as Constraint<Ratio>>::check(value)?;
        if value.get::<ratio>() > BETZ_LIMIT {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(())
    }
}

/// Behavior of a characteristic curve above its last tabulated wind speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveEnd {
    /// The turbine shuts down: output is zero above the last point.
    #[default]
    CutOut,
    /// The turbine keeps producing rated power above the last point.
    Plateau,
}

/// A characteristic curve of (wind speed, output) points.
///
/// Output `Q` is either [`Power`] for a power curve or a dimensionless
/// [`Ratio`] for a power coefficient curve.
///
/// Wind speeds are finite, non-negative and strictly increasing; outputs are
/// finite and non-negative; there are at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve<Q> {
    wind_speeds: Vec<Velocity>,
    values: Vec<Q>,
    end: CurveEnd,
}

impl<Q> Curve<Q>
where
    Q: SiValue + PartialOrd + Zero,
{
    /// Creates a curve that cuts out above its last point.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Curve`] if the points violate a curve invariant.
    pub fn new(points: impl IntoIterator<Item = (Velocity, Q)>) -> Result<Self, ValidationError> {
        let (wind_speeds, values): (Vec<Velocity>, Vec<Q>) = points.into_iter().unzip();

        if wind_speeds.len() < 2 {
            return Err(curve_error(format!(
                "needs at least 2 points, got {}",
                wind_speeds.len()
            )));
        }

        for (position, (speed, value)) in wind_speeds.iter().zip(&values).enumerate() {
            if !speed.to_si().is_finite() || NonNegative::new(*speed).is_err() {
                return Err(curve_error(format!(
                    "wind speed at point {position} must be finite and non-negative"
                )));
            }
            if !value.to_si().is_finite() || NonNegative::new(*value).is_err() {
                return Err(curve_error(format!(
                    "output at point {position} must be finite and non-negative"
                )));
            }
        }

        if let Some(position) = wind_speeds.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(curve_error(format!(
                "wind speeds must be strictly increasing (point {})",
                position + 1
            )));
        }

        Ok(Self {
            wind_speeds,
            values,
            end: CurveEnd::CutOut,
        })
    }

    /// Sets the behavior above the last point.
    #[must_use]
    pub fn with_end(mut self, end: CurveEnd) -> Self {
        self.end = end;
        self
    }

    #[must_use]
    pub fn wind_speeds(&self) -> &[Velocity] {
        &self.wind_speeds
    }

    #[must_use]
    pub fn values(&self) -> &[Q] {
        &self.values
    }

    #[must_use]
    pub fn end(&self) -> CurveEnd {
        self.end
    }

    /// Iterates over `(wind speed, output)` points.
    pub fn points(&self) -> impl Iterator<Item = (Velocity, Q)> + '_ {
        self.wind_speeds.iter().copied().zip(self.values.iter().copied())
    }

    /// Largest tabulated output.
    #[must_use]
    pub fn max_value(&self) -> Q {
        self.values
            .iter()
            .copied()
            .fold(Q::zero(), |max, value| if value > max { value } else { max })
    }

    /// Returns the curve with its wind-speed axis scaled for air density.
    ///
    /// Each wind speed is multiplied by `(ρ / 1.225 kg/m³)^(1/3)`. The factor
    /// is positive, so the order of the points is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PhysicalRange`] if the density is not strictly positive.
    pub fn density_corrected(&self, density: MassDensity) -> Result<Self, ModelError> {
        let factor = density_correction_factor(density)?;
        Ok(Self {
            wind_speeds: self
                .wind_speeds
                .iter()
                .map(|v| Velocity::from_si(v.to_si() * factor))
                .collect(),
            values: self.values.clone(),
            end: self.end,
        })
    }
}

fn curve_error(context: String) -> ValidationError {
    ValidationError::Curve { context }
}

/// A wind turbine described by its characteristic curves and geometry.
///
/// Built with [`TurbineSpec::builder`]; read-only afterwards and reusable
/// across any number of model chain runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TurbineSpec {
    hub_height: Length,
    rotor_diameter: Option<Length>,
    nominal_power: Power,
    power_curve: Option<Curve<Power>>,
    power_coefficient_curve: Option<Curve<Ratio>>,
}

impl TurbineSpec {
    /// Starts building a turbine with the given hub height.
    #[must_use]
    pub fn builder(hub_height: Length) -> TurbineSpecBuilder {
        TurbineSpecBuilder {
            hub_height,
            rotor_diameter: None,
            nominal_power: None,
            power_curve: None,
            power_coefficient_curve: None,
        }
    }

    #[must_use]
    pub fn hub_height(&self) -> Length {
        self.hub_height
    }

    #[must_use]
    pub fn rotor_diameter(&self) -> Option<Length> {
        self.rotor_diameter
    }

    /// Rated power; model chain output never exceeds it.
    #[must_use]
    pub fn nominal_power(&self) -> Power {
        self.nominal_power
    }

    #[must_use]
    pub fn power_curve(&self) -> Option<&Curve<Power>> {
        self.power_curve.as_ref()
    }

    #[must_use]
    pub fn power_coefficient_curve(&self) -> Option<&Curve<Ratio>> {
        self.power_coefficient_curve.as_ref()
    }

    /// Rotor swept area `π (D/2)²`, if the rotor diameter is known.
    #[must_use]
    pub fn swept_area(&self) -> Option<Area> {
        self.rotor_diameter.map(|d| {
            let radius = d.get::<meter>() / 2.0;
            Area::new::<square_meter>(PI * radius * radius)
        })
    }
}

/// Builder for [`TurbineSpec`].
#[derive(Debug, Clone)]
pub struct TurbineSpecBuilder {
    hub_height: Length,
    rotor_diameter: Option<Length>,
    nominal_power: Option<Power>,
    power_curve: Option<Curve<Power>>,
    power_coefficient_curve: Option<Curve<Ratio>>,
}

impl TurbineSpecBuilder {
    #[must_use]
    pub fn rotor_diameter(mut self, rotor_diameter: Length) -> Self {
        self.rotor_diameter = Some(rotor_diameter);
        self
    }

    /// Sets the rated power.
    ///
    /// Defaults to the maximum of the power curve when not set.
    #[must_use]
    pub fn nominal_power(mut self, nominal_power: Power) -> Self {
        self.nominal_power = Some(nominal_power);
        self
    }

    #[must_use]
    pub fn power_curve(mut self, curve: Curve<Power>) -> Self {
        self.power_curve = Some(curve);
        self
    }

    #[must_use]
    pub fn power_coefficient_curve(mut self, curve: Curve<Ratio>) -> Self {
        self.power_coefficient_curve = Some(curve);
        self
    }

    /// Validates the turbine description.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if:
    /// - the hub height, rotor diameter or nominal power is not strictly positive,
    /// - no characteristic curve is given,
    /// - a power coefficient curve is given without a rotor diameter,
    /// - a power coefficient exceeds the Betz limit,
    /// - nominal power is neither given nor derivable from a power curve.
    pub fn build(self) -> Result<TurbineSpec, ValidationError> {
        let hub_height = positive("hub height", self.hub_height)?;

        if self.power_curve.is_none() && self.power_coefficient_curve.is_none() {
            return Err(ValidationError::MissingCurve);
        }

        let rotor_diameter = self
            .rotor_diameter
            .map(|d| positive("rotor diameter", d))
            .transpose()?;

        if let Some(curve) = &self.power_coefficient_curve {
            if rotor_diameter.is_none() {
                return Err(ValidationError::MissingRotorDiameter);
            }
            for (position, cp) in curve.values().iter().enumerate() {
                Constrained::<Ratio, BetzLimit>::new(*cp).map_err(|_| {
                    ValidationError::AboveBetzLimit {
                        position,
                        value: cp.get::<ratio>(),
                    }
                })?;
            }
        }

        let nominal_power = match (self.nominal_power, &self.power_curve) {
            (Some(power), _) => power,
            (None, Some(curve)) => curve.max_value(),
            (None, None) => return Err(ValidationError::MissingNominalPower),
        };

        Ok(TurbineSpec {
            hub_height,
            rotor_diameter,
            nominal_power: positive("nominal power", nominal_power)?,
            power_curve: self.power_curve,
            power_coefficient_curve: self.power_coefficient_curve,
        })
    }
}

fn positive<T: PartialOrd + Zero>(field: &'static str, value: T) -> Result<T, ValidationError> {
    StrictlyPositive::new(value)
        .map(Constrained::into_inner)
        .map_err(|source| ValidationError::Constraint { field, source })
}
