//! Standard-atmosphere relations used to move air properties between heights.
//!
//! The relations here are the simple engineering forms commonly used for
//! wind resource assessment near the ground:
//!
//! - Temperature falls linearly with height at [`TEMPERATURE_GRADIENT`] K/m.
//! - Pressure falls linearly with height at 1/8 hPa per metre.
//! - Density follows either the barometric form referenced to the standard
//!   atmosphere or the ideal gas equation of state `p = ρ·R·T`.

use uom::si::{
    f64::{Length, MassDensity, Pressure, ThermodynamicTemperature},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Temperature gradient of the standard atmosphere, in K/m.
pub const TEMPERATURE_GRADIENT: f64 = -0.0065;

/// Pressure gradient near the ground, in Pa/m (1/8 hPa per metre).
pub const PRESSURE_GRADIENT: f64 = -12.5;

/// Specific gas constant of dry air, in J/(kg·K).
pub const DRY_AIR_GAS_CONSTANT: f64 = 287.058;

const STANDARD_DENSITY: f64 = 1.225;
const STANDARD_TEMPERATURE: f64 = 288.15;
const STANDARD_PRESSURE: f64 = 101_330.0;

/// Air density at standard conditions (1.225 kg/m³).
///
/// Tabulated power curves are defined at this density.
#[must_use]
pub fn standard_density() -> MassDensity {
    MassDensity::new::<kilogram_per_cubic_meter>(STANDARD_DENSITY)
}

/// Specific gas constant of dry air.
#[must_use]
pub fn dry_air_gas_constant() -> SpecificGasConstant {
    SpecificGasConstant::new::<joule_per_kilogram_kelvin>(DRY_AIR_GAS_CONSTANT)
}

/// Moves a temperature from `from` to `to` along the standard temperature gradient.
#[must_use]
pub fn temperature_at_height(
    temperature: ThermodynamicTemperature,
    from: Length,
    to: Length,
) -> ThermodynamicTemperature {
    let dh = (to - from).get::<meter>();
    ThermodynamicTemperature::new::<kelvin>(
        temperature.get::<kelvin>() + TEMPERATURE_GRADIENT * dh,
    )
}

/// Moves a pressure from `from` to `to` along the near-ground pressure gradient.
#[must_use]
pub fn pressure_at_height(pressure: Pressure, from: Length, to: Length) -> Pressure {
    let dh = (to - from).get::<meter>();
    Pressure::new::<pascal>(pressure.get::<pascal>() + PRESSURE_GRADIENT * dh)
}

/// Computes density with the barometric form referenced to the standard atmosphere.
///
/// `ρ = p · ρ₀ · T₀ / (p₀ · T)`, with `ρ₀ = 1.225 kg/m³`, `T₀ = 288.15 K`
/// and `p₀ = 1013.3 hPa`.
#[must_use]
pub fn barometric_density(
    pressure: Pressure,
    temperature: ThermodynamicTemperature,
) -> MassDensity {
    MassDensity::new::<kilogram_per_cubic_meter>(
        pressure.get::<pascal>() * STANDARD_DENSITY * STANDARD_TEMPERATURE
            / (STANDARD_PRESSURE * temperature.get::<kelvin>()),
    )
}

/// Computes density using the ideal gas equation of state.
#[must_use]
pub fn ideal_gas_density(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    gas_constant: SpecificGasConstant,
) -> MassDensity {
    pressure / (gas_constant * temperature)
}
