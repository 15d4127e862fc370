use uom::si::{
    area::square_meter,
    f64::{Area, Length, MassDensity, Power, Pressure, Ratio, ThermodynamicTemperature, Velocity},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    power::watt,
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

/// Conversion between a quantity and its value in the coherent SI unit.
///
/// For [`ThermodynamicTemperature`] the SI value is the absolute temperature
/// in kelvin, so interpolating SI values interpolates absolute temperatures.
pub trait SiValue: Copy {
    /// Returns the value expressed in the coherent SI unit.
    fn to_si(self) -> f64;

    /// Creates a quantity from a value in the coherent SI unit.
    fn from_si(value: f64) -> Self;
}

macro_rules! impl_si_value {
    ($($quantity:ty => $unit:ty),+ $(,)?) => {
        $(
            impl SiValue for $quantity {
                fn to_si(self) -> f64 {
                    self.get::<$unit>()
                }

                fn from_si(value: f64) -> Self {
                    <$quantity>::new::<$unit>(value)
                }
            }
        )+
    };
}

impl_si_value!(
    Area => square_meter,
    Length => meter,
    MassDensity => kilogram_per_cubic_meter,
    Power => watt,
    Pressure => pascal,
    Ratio => ratio,
    ThermodynamicTemperature => kelvin,
    Velocity => meter_per_second,
);
