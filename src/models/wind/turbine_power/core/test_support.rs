//! Fixtures shared by the model tests.

use jiff::Timestamp;
use uom::si::{
    f64::{Length, MassDensity, Power, Pressure, Ratio, ThermodynamicTemperature, Velocity},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    power::watt,
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use super::turbine::Curve;

/// Hourly timestamps starting 2023-01-01T00:00Z.
pub(crate) fn hourly_index(len: usize) -> Vec<Timestamp> {
    (0..len)
        .map(|hour| {
            let offset = i64::try_from(hour).unwrap() * 3600;
            Timestamp::from_second(1_672_531_200 + offset).unwrap()
        })
        .collect()
}

pub(crate) fn meters(value: f64) -> Length {
    Length::new::<meter>(value)
}

pub(crate) fn mps(values: &[f64]) -> Vec<Velocity> {
    values
        .iter()
        .map(|v| Velocity::new::<meter_per_second>(*v))
        .collect()
}

pub(crate) fn kelvins(values: &[f64]) -> Vec<ThermodynamicTemperature> {
    values
        .iter()
        .map(|t| ThermodynamicTemperature::new::<kelvin>(*t))
        .collect()
}

pub(crate) fn pascals(values: &[f64]) -> Vec<Pressure> {
    values.iter().map(|p| Pressure::new::<pascal>(*p)).collect()
}

pub(crate) fn densities(values: &[f64]) -> Vec<MassDensity> {
    values
        .iter()
        .map(|rho| MassDensity::new::<kilogram_per_cubic_meter>(*rho))
        .collect()
}

/// Power curve from `(m/s, W)` points.
pub(crate) fn power_curve(points: &[(f64, f64)]) -> Curve<Power> {
    Curve::new(
        points
            .iter()
            .map(|(v, p)| (Velocity::new::<meter_per_second>(*v), Power::new::<watt>(*p))),
    )
    .unwrap()
}

/// Power coefficient curve from `(m/s, c_p)` points.
pub(crate) fn coefficient_curve(points: &[(f64, f64)]) -> Curve<Ratio> {
    Curve::new(
        points
            .iter()
            .map(|(v, cp)| (Velocity::new::<meter_per_second>(*v), Ratio::new::<ratio>(*cp))),
    )
    .unwrap()
}

/// A 4.5 MW power curve cutting out above 25 m/s.
pub(crate) fn example_power_curve() -> Curve<Power> {
    power_curve(&[
        (0.0, 0.0),
        (3.0, 39_000.0),
        (5.0, 270_000.0),
        (10.0, 2_250_000.0),
        (15.0, 4_500_000.0),
        (25.0, 4_500_000.0),
    ])
}
