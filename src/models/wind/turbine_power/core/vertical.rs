//! Interpolation and extrapolation across measurement heights.
//!
//! Shared by the wind speed, temperature and density models when they use
//! their `interpolation_extrapolation` variants.

use uom::si::f64::Length;

use crate::support::units::SiValue;

use super::{
    ModelError,
    weather::{Level, Profile, Variable},
};

/// Quantity that varies linearly between two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Abscissa {
    /// Values vary linearly with height.
    Height,
    /// Values vary linearly with the natural logarithm of height.
    LogHeight,
}

impl Abscissa {
    fn position(self, height: Length) -> Result<f64, ModelError> {
        let h = height.to_si();
        match self {
            Self::Height => Ok(h),
            Self::LogHeight if h > 0.0 => Ok(h.ln()),
            Self::LogHeight => Err(ModelError::out_of_range(format!(
                "logarithmic interpolation needs positive heights, got {h} m"
            ))),
        }
    }
}

/// Estimates a variable at `target` from a multi-height profile.
///
/// A level measured exactly at `target` is returned unchanged. Otherwise the
/// two levels bracketing `target` are interpolated, or, when `target` lies
/// outside the measured range, the two nearest levels are extrapolated.
pub(super) fn interpolate_extrapolate<Q: SiValue>(
    profile: &Profile<Q>,
    variable: Variable,
    target: Length,
    abscissa: Abscissa,
) -> Result<Vec<Q>, ModelError> {
    if let Some(level) = profile.at(target) {
        return Ok(level.values().to_vec());
    }

    let levels = profile.levels();
    if levels.len() < 2 {
        return Err(ModelError::insufficient(format!(
            "{variable} interpolation needs at least 2 heights, got {}",
            levels.len()
        )));
    }

    let (lower, upper) = bracket(levels, target);
    let x0 = abscissa.position(lower.height())?;
    let x1 = abscissa.position(upper.height())?;
    let weight = (abscissa.position(target)? - x0) / (x1 - x0);

    Ok(lower
        .values()
        .iter()
        .zip(upper.values())
        .map(|(a, b)| {
            let (a, b) = (a.to_si(), b.to_si());
            Q::from_si(a + (b - a) * weight)
        })
        .collect())
}

/// Picks adjacent levels around `target`, or the outermost pair beyond the range.
///
/// Requires at least two levels.
fn bracket<Q>(levels: &[Level<Q>], target: Length) -> (&Level<Q>, &Level<Q>) {
    let upper = levels
        .iter()
        .position(|level| level.height() > target)
        .unwrap_or(levels.len() - 1)
        .max(1);
    (&levels[upper - 1], &levels[upper])
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::velocity::meter_per_second;

    use crate::models::wind::turbine_power::core::{
        WeatherSeries,
        test_support::{hourly_index, meters, mps},
    };

    fn three_level_weather() -> WeatherSeries {
        WeatherSeries::builder(hourly_index(2))
            .wind_speed(meters(10.0), mps(&[4.0, 6.0]))
            .wind_speed(meters(50.0), mps(&[6.0, 5.0]))
            .wind_speed(meters(100.0), mps(&[8.0, 9.0]))
            .build()
            .unwrap()
    }

    fn speeds(values: &[uom::si::f64::Velocity]) -> Vec<f64> {
        values.iter().map(|v| v.get::<meter_per_second>()).collect()
    }

    #[test]
    fn measured_height_is_returned_unchanged() {
        let weather = three_level_weather();
        let result = interpolate_extrapolate(
            weather.wind_speed(),
            Variable::WindSpeed,
            meters(50.0),
            Abscissa::LogHeight,
        )
        .unwrap();
        assert_eq!(speeds(&result), vec![6.0, 5.0]);
    }

    #[test]
    fn interpolates_between_bracketing_levels() {
        let weather = three_level_weather();
        let result = interpolate_extrapolate(
            weather.wind_speed(),
            Variable::WindSpeed,
            meters(75.0),
            Abscissa::Height,
        )
        .unwrap();
        assert_relative_eq!(result[0].get::<meter_per_second>(), 7.0);
        assert_relative_eq!(result[1].get::<meter_per_second>(), 7.0);
    }

    #[test]
    fn extrapolates_from_nearest_pair() {
        let weather = three_level_weather();
        let result = interpolate_extrapolate(
            weather.wind_speed(),
            Variable::WindSpeed,
            meters(150.0),
            Abscissa::Height,
        )
        .unwrap();
        assert_relative_eq!(result[0].get::<meter_per_second>(), 10.0);
        assert_relative_eq!(result[1].get::<meter_per_second>(), 13.0);
    }

    #[test]
    fn log_height_abscissa() {
        let weather = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[5.0]))
            .wind_speed(meters(100.0), mps(&[8.0]))
            .build()
            .unwrap();

        // Geometric mean of the heights sits halfway in log space.
        let result = interpolate_extrapolate(
            weather.wind_speed(),
            Variable::WindSpeed,
            meters(1000.0_f64.sqrt()),
            Abscissa::LogHeight,
        )
        .unwrap();
        assert_relative_eq!(result[0].get::<meter_per_second>(), 6.5, epsilon = 1e-12);
    }

    #[test]
    fn interpolation_stays_within_measured_values() {
        let weather = three_level_weather();
        for abscissa in [Abscissa::Height, Abscissa::LogHeight] {
            for step in 1..100 {
                let target = meters(10.0 + 0.9 * f64::from(step));
                let result = interpolate_extrapolate(
                    weather.wind_speed(),
                    Variable::WindSpeed,
                    target,
                    abscissa,
                )
                .unwrap();
                for v in speeds(&result) {
                    assert!((4.0..=9.0).contains(&v), "{v} outside measured range");
                }
            }
        }
    }

    #[test]
    fn single_level_is_insufficient() {
        let weather = WeatherSeries::builder(hourly_index(1))
            .wind_speed(meters(10.0), mps(&[5.0]))
            .build()
            .unwrap();
        let result = interpolate_extrapolate(
            weather.wind_speed(),
            Variable::WindSpeed,
            meters(100.0),
            Abscissa::Height,
        );
        assert!(matches!(result, Err(ModelError::InsufficientData { .. })));
    }
}
