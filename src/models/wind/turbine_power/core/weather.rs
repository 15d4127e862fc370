//! Normalized multi-height weather time series.

use std::{cmp::Ordering, fmt};

use jiff::Timestamp;
use uom::si::{
    f64::{Length, MassDensity, Pressure, ThermodynamicTemperature, Velocity},
    velocity::meter_per_second,
};

use crate::support::{
    constraint::{NonNegative, StrictlyPositive},
    units::SiValue,
};

use super::ValidationError;

/// A weather variable carried by a [`WeatherSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    WindSpeed,
    Temperature,
    Pressure,
    Density,
    RoughnessLength,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WindSpeed => "wind_speed",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Density => "density",
            Self::RoughnessLength => "roughness_length",
        })
    }
}

/// A time series measured at one height.
#[derive(Debug, Clone, PartialEq)]
pub struct Level<Q> {
    height: Length,
    values: Vec<Q>,
}

impl<Q> Level<Q> {
    /// Measurement height above ground.
    #[must_use]
    pub fn height(&self) -> Length {
        self.height
    }

    /// Values, one per timestamp of the owning series.
    #[must_use]
    pub fn values(&self) -> &[Q] {
        &self.values
    }
}

/// All measurement heights of one variable, ordered from lowest to highest.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile<Q> {
    levels: Vec<Level<Q>>,
}

impl<Q> Default for Profile<Q> {
    fn default() -> Self {
        Self { levels: Vec::new() }
    }
}

impl<Q> Profile<Q> {
    /// Levels ordered by increasing height.
    #[must_use]
    pub fn levels(&self) -> &[Level<Q>] {
        &self.levels
    }

    /// Returns `true` if the variable was not measured at any height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level measured exactly at `height`, if any.
    #[must_use]
    pub fn at(&self, height: Length) -> Option<&Level<Q>> {
        self.levels.iter().find(|level| level.height == height)
    }

    /// Returns the level whose height is closest to `height`.
    ///
    /// Ties resolve to the lower level.
    #[must_use]
    pub fn closest_to(&self, height: Length) -> Option<&Level<Q>> {
        self.levels.iter().min_by(|a, b| {
            let da = (a.height - height).abs();
            let db = (b.height - height).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        })
    }

    /// Returns the lowest level.
    #[must_use]
    pub fn lowest(&self) -> Option<&Level<Q>> {
        self.levels.first()
    }
}

/// Surface roughness length, either constant or one value per timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum RoughnessLength {
    Constant(Length),
    Series(Vec<Length>),
}

impl RoughnessLength {
    /// Roughness length at the given timestamp position.
    ///
    /// Positions are valid for the [`WeatherSeries`] that owns this value.
    #[must_use]
    pub fn at(&self, position: usize) -> Length {
        match self {
            Self::Constant(z0) => *z0,
            Self::Series(values) => values[position],
        }
    }
}

/// Weather observations at one or more heights on a shared timestamp index.
///
/// Units follow the SI base units: wind speed in m/s, temperature in K,
/// pressure in Pa, density in kg/m³, heights and roughness length in m.
///
/// A `WeatherSeries` is only constructed through [`WeatherSeriesBuilder`],
/// which guarantees that:
///
/// - the index is non-empty and strictly increasing,
/// - wind speed is present at one or more heights,
/// - every series has exactly one finite value per timestamp,
/// - heights are finite, non-negative and unique per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    index: Vec<Timestamp>,
    wind_speed: Profile<Velocity>,
    temperature: Profile<ThermodynamicTemperature>,
    pressure: Profile<Pressure>,
    density: Profile<MassDensity>,
    roughness_length: Option<RoughnessLength>,
}

impl WeatherSeries {
    /// Starts building a series on the given timestamp index.
    #[must_use]
    pub fn builder(index: Vec<Timestamp>) -> WeatherSeriesBuilder {
        WeatherSeriesBuilder {
            index,
            ..WeatherSeriesBuilder::default()
        }
    }

    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false`; an empty index is rejected at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn wind_speed(&self) -> &Profile<Velocity> {
        &self.wind_speed
    }

    #[must_use]
    pub fn temperature(&self) -> &Profile<ThermodynamicTemperature> {
        &self.temperature
    }

    #[must_use]
    pub fn pressure(&self) -> &Profile<Pressure> {
        &self.pressure
    }

    #[must_use]
    pub fn density(&self) -> &Profile<MassDensity> {
        &self.density
    }

    #[must_use]
    pub fn roughness_length(&self) -> Option<&RoughnessLength> {
        self.roughness_length.as_ref()
    }
}

/// Builder for [`WeatherSeries`].
#[derive(Debug, Clone, Default)]
pub struct WeatherSeriesBuilder {
    index: Vec<Timestamp>,
    wind_speed: Vec<Level<Velocity>>,
    temperature: Vec<Level<ThermodynamicTemperature>>,
    pressure: Vec<Level<Pressure>>,
    density: Vec<Level<MassDensity>>,
    roughness_length: Option<RoughnessLength>,
}

impl WeatherSeriesBuilder {
    /// Adds wind speed measured at `height`.
    #[must_use]
    pub fn wind_speed(mut self, height: Length, values: impl Into<Vec<Velocity>>) -> Self {
        self.wind_speed.push(Level {
            height,
            values: values.into(),
        });
        self
    }

    /// Adds wind speed at `height` from its eastward (`u`) and northward (`v`) components.
    ///
    /// Reanalysis products publish wind as two horizontal components;
    /// the speed is their Euclidean norm.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LengthMismatch`] if the component series differ in length.
    pub fn wind_speed_from_components(
        self,
        height: Length,
        u: &[Velocity],
        v: &[Velocity],
    ) -> Result<Self, ValidationError> {
        if u.len() != v.len() {
            return Err(ValidationError::LengthMismatch {
                variable: Variable::WindSpeed,
                expected: u.len(),
                actual: v.len(),
            });
        }

        let speeds: Vec<Velocity> = u
            .iter()
            .zip(v)
            .map(|(u, v)| {
                Velocity::new::<meter_per_second>(
                    u.get::<meter_per_second>().hypot(v.get::<meter_per_second>()),
                )
            })
            .collect();

        Ok(self.wind_speed(height, speeds))
    }

    /// Adds air temperature measured at `height`.
    #[must_use]
    pub fn temperature(
        mut self,
        height: Length,
        values: impl Into<Vec<ThermodynamicTemperature>>,
    ) -> Self {
        self.temperature.push(Level {
            height,
            values: values.into(),
        });
        self
    }

    /// Adds air pressure measured at `height`.
    #[must_use]
    pub fn pressure(mut self, height: Length, values: impl Into<Vec<Pressure>>) -> Self {
        self.pressure.push(Level {
            height,
            values: values.into(),
        });
        self
    }

    /// Adds air density measured at `height`.
    #[must_use]
    pub fn density(mut self, height: Length, values: impl Into<Vec<MassDensity>>) -> Self {
        self.density.push(Level {
            height,
            values: values.into(),
        });
        self
    }

    /// Sets the surface roughness length.
    #[must_use]
    pub fn roughness_length(mut self, roughness_length: RoughnessLength) -> Self {
        self.roughness_length = Some(roughness_length);
        self
    }

    /// Validates the collected data and builds the series.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any invariant of [`WeatherSeries`] is violated.
    pub fn build(self) -> Result<WeatherSeries, ValidationError> {
        check_index(&self.index)?;
        let len = self.index.len();

        if self.wind_speed.is_empty() {
            return Err(ValidationError::MissingVariable {
                variable: Variable::WindSpeed,
            });
        }

        let roughness_length = match self.roughness_length {
            Some(roughness) => Some(check_roughness(roughness, len)?),
            None => None,
        };

        Ok(WeatherSeries {
            wind_speed: profile(Variable::WindSpeed, self.wind_speed, len)?,
            temperature: profile(Variable::Temperature, self.temperature, len)?,
            pressure: profile(Variable::Pressure, self.pressure, len)?,
            density: profile(Variable::Density, self.density, len)?,
            roughness_length,
            index: self.index,
        })
    }
}

fn check_index(index: &[Timestamp]) -> Result<(), ValidationError> {
    if index.is_empty() {
        return Err(ValidationError::EmptyIndex);
    }

    match index.windows(2).position(|pair| pair[0] >= pair[1]) {
        Some(position) => Err(ValidationError::UnorderedIndex {
            position: position + 1,
        }),
        None => Ok(()),
    }
}

fn check_roughness(
    roughness: RoughnessLength,
    len: usize,
) -> Result<RoughnessLength, ValidationError> {
    let constraint = |source| ValidationError::Constraint {
        field: "roughness length",
        source,
    };

    match &roughness {
        RoughnessLength::Constant(z0) => {
            StrictlyPositive::new(*z0).map_err(constraint)?;
        }
        RoughnessLength::Series(values) => {
            if values.len() != len {
                return Err(ValidationError::LengthMismatch {
                    variable: Variable::RoughnessLength,
                    expected: len,
                    actual: values.len(),
                });
            }
            for z0 in values {
                StrictlyPositive::new(*z0).map_err(constraint)?;
            }
        }
    }

    Ok(roughness)
}

fn profile<Q: SiValue>(
    variable: Variable,
    mut levels: Vec<Level<Q>>,
    len: usize,
) -> Result<Profile<Q>, ValidationError> {
    for level in &levels {
        if NonNegative::new(level.height).is_err() || !level.height.to_si().is_finite() {
            return Err(ValidationError::InvalidHeight {
                variable,
                height: level.height,
            });
        }

        if level.values.len() != len {
            return Err(ValidationError::LengthMismatch {
                variable,
                expected: len,
                actual: level.values.len(),
            });
        }

        if let Some(position) = level.values.iter().position(|v| !v.to_si().is_finite()) {
            return Err(ValidationError::NonFinite { variable, position });
        }
    }

    levels.sort_by(|a, b| a.height.partial_cmp(&b.height).unwrap_or(Ordering::Equal));

    if let Some(pair) = levels.windows(2).find(|pair| pair[0].height == pair[1].height) {
        return Err(ValidationError::DuplicateHeight {
            variable,
            height: pair[0].height,
        });
    }

    Ok(Profile { levels })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::wind::turbine_power::core::test_support::{hourly_index, meters, mps};

    #[test]
    fn levels_are_sorted_by_height() {
        let weather = WeatherSeries::builder(hourly_index(2))
            .wind_speed(meters(100.0), mps(&[7.0, 8.0]))
            .wind_speed(meters(10.0), mps(&[5.0, 6.0]))
            .build()
            .unwrap();

        let heights: Vec<f64> = weather
            .wind_speed()
            .levels()
            .iter()
            .map(|level| level.height().to_si())
            .collect();
        assert_eq!(heights, vec![10.0, 100.0]);
        assert_eq!(weather.len(), 2);
    }

    #[test]
    fn closest_level_prefers_lower_on_ties() {
        let weather = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[5.0]))
            .wind_speed(meters(30.0), mps(&[6.0]))
            .build()
            .unwrap();

        let profile = weather.wind_speed();
        assert_eq!(profile.closest_to(meters(20.0)).unwrap().height(), meters(10.0));
        assert_eq!(profile.closest_to(meters(80.0)).unwrap().height(), meters(30.0));
        assert!(profile.at(meters(20.0)).is_none());
    }

    #[test]
    fn wind_speed_from_components() {
        let u = mps(&[3.0, 0.0]);
        let v = mps(&[4.0, -2.0]);
        let weather = WeatherSeries::builder(hourly_index(2))
            .wind_speed_from_components(meters(100.0), &u, &v)
            .unwrap()
            .build()
            .unwrap();

        let speeds = weather.wind_speed().levels()[0].values();
        assert_relative_eq!(speeds[0].get::<meter_per_second>(), 5.0);
        assert_relative_eq!(speeds[1].get::<meter_per_second>(), 2.0);
    }

    #[test]
    fn rejects_mismatched_components() {
        let result = WeatherSeries::builder(hourly_index(2)).wind_speed_from_components(
            meters(10.0),
            &mps(&[1.0, 2.0]),
            &mps(&[1.0]),
        );
        assert!(matches!(
            result,
            Err(ValidationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn requires_wind_speed() {
        let result = WeatherSeries::builder(hourly_index(1)).build();
        assert_eq!(
            result,
            Err(ValidationError::MissingVariable {
                variable: Variable::WindSpeed
            })
        );
    }

    #[test]
    fn rejects_unordered_index() {
        let mut index = hourly_index(3);
        index.swap(1, 2);
        let result = WeatherSeries::builder(index)
            .wind_speed(meters(10.0), mps(&[1.0, 2.0, 3.0]))
            .build();
        assert_eq!(result, Err(ValidationError::UnorderedIndex { position: 2 }));
    }

    #[test]
    fn rejects_misaligned_series() {
        let result = WeatherSeries::builder(hourly_index(3))
            .wind_speed(meters(10.0), mps(&[1.0, 2.0]))
            .build();
        assert_eq!(
            result,
            Err(ValidationError::LengthMismatch {
                variable: Variable::WindSpeed,
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn rejects_duplicate_heights() {
        let result = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[1.0]))
            .wind_speed(meters(10.0), mps(&[2.0]))
            .build();
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateHeight { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let result = WeatherSeries::builder(hourly_index(2))
            .wind_speed(meters(10.0), mps(&[1.0, f64::NAN]))
            .build();
        assert_eq!(
            result,
            Err(ValidationError::NonFinite {
                variable: Variable::WindSpeed,
                position: 1,
            })
        );
    }

    #[test]
    fn rejects_non_positive_roughness() {
        let result = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[1.0]))
            .roughness_length(RoughnessLength::Constant(meters(0.0)))
            .build();
        assert!(matches!(
            result,
            Err(ValidationError::Constraint {
                field: "roughness length",
                ..
            })
        ));
    }
}
