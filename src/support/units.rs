//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical units (wind speed, temperature,
//! pressure, density, power). This module provides extensions that are useful
//! for the wind models but aren't included in [`uom`].
//!
//! ## SI values
//!
//! The [`SiValue`] trait converts a quantity to and from its value in the
//! coherent SI unit. Vertical interpolation works the same way for wind
//! speed, temperature and density, so it is written once against this trait:
//!
//! ```
//! use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::degree_celsius};
//! use twine_wind::support::units::SiValue;
//!
//! let t = ThermodynamicTemperature::new::<degree_celsius>(15.0);
//! assert!((t.to_si() - 288.15).abs() < 1e-9);
//! ```

mod quantities;
mod si_value;

pub use quantities::SpecificGasConstant;
pub use si_value::SiValue;
