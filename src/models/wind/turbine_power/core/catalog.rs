//! Turbine catalogs.
//!
//! The crate ships no turbine data. Callers supply turbines through a
//! [`TurbineCatalog`], typically a map of [`CatalogEntry`] tables loaded from
//! their own data source.

use std::{collections::HashMap, hash::BuildHasher};

use thiserror::Error;
use uom::si::{
    f64::{Length, Power, Ratio, Velocity},
    length::meter,
    power::watt,
    ratio::ratio,
    velocity::meter_per_second,
};

use super::{
    ValidationError,
    turbine::{Curve, CurveEnd, TurbineSpec},
};

/// Errors returned by a [`TurbineCatalog`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// No turbine with the requested name.
    #[error("turbine not found: {name:?}")]
    NotFound { name: String },

    /// The catalog entry does not describe a valid turbine.
    #[error("invalid catalog entry for {name:?}")]
    Invalid {
        name: String,
        #[source]
        source: ValidationError,
    },
}

/// A source of turbine descriptions, looked up by name.
pub trait TurbineCatalog {
    /// Returns the turbine registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown name and
    /// [`CatalogError::Invalid`] if the stored entry fails validation.
    fn turbine(&self, name: &str) -> Result<TurbineSpec, CatalogError>;
}

/// Tabulated turbine data in plain SI numbers.
///
/// Curves are `(wind speed in m/s, value)` pairs, with power in W and
/// power coefficients dimensionless.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct CatalogEntry {
    /// Hub height in m.
    pub hub_height: f64,

    /// Rotor diameter in m.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotor_diameter: Option<f64>,

    /// Rated power in W.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nominal_power: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub power_curve: Option<Vec<(f64, f64)>>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub power_coefficient_curve: Option<Vec<(f64, f64)>>,

    /// Whether the curves hold their last value instead of cutting out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub plateau: bool,
}

impl TryFrom<&CatalogEntry> for TurbineSpec {
    type Error = ValidationError;

    fn try_from(entry: &CatalogEntry) -> Result<Self, Self::Error> {
        let end = if entry.plateau {
            CurveEnd::Plateau
        } else {
            CurveEnd::CutOut
        };

        let mut builder = TurbineSpec::builder(Length::new::<meter>(entry.hub_height));

        if let Some(d) = entry.rotor_diameter {
            builder = builder.rotor_diameter(Length::new::<meter>(d));
        }
        if let Some(p) = entry.nominal_power {
            builder = builder.nominal_power(Power::new::<watt>(p));
        }
        if let Some(points) = &entry.power_curve {
            let curve = Curve::new(
                points
                    .iter()
                    .map(|(v, p)| (Velocity::new::<meter_per_second>(*v), Power::new::<watt>(*p))),
            )?;
            builder = builder.power_curve(curve.with_end(end));
        }
        if let Some(points) = &entry.power_coefficient_curve {
            let curve = Curve::new(
                points
                    .iter()
                    .map(|(v, cp)| (Velocity::new::<meter_per_second>(*v), Ratio::new::<ratio>(*cp))),
            )?;
            builder = builder.power_coefficient_curve(curve.with_end(end));
        }

        builder.build()
    }
}

impl<S: BuildHasher> TurbineCatalog for HashMap<String, CatalogEntry, S> {
    fn turbine(&self, name: &str) -> Result<TurbineSpec, CatalogError> {
        let entry = self.get(name).ok_or_else(|| CatalogError::NotFound {
            name: name.to_owned(),
        })?;
        TurbineSpec::try_from(entry).map_err(|source| CatalogError::Invalid {
            name: name.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn catalog() -> HashMap<String, CatalogEntry> {
        let mut catalog = HashMap::new();
        catalog.insert(
            "E-126/4200".to_owned(),
            CatalogEntry {
                hub_height: 135.0,
                rotor_diameter: Some(127.0),
                power_curve: Some(vec![
                    (0.0, 0.0),
                    (3.0, 58_000.0),
                    (10.0, 3_000_000.0),
                    (14.0, 4_200_000.0),
                    (25.0, 4_200_000.0),
                ]),
                ..CatalogEntry::default()
            },
        );
        catalog.insert(
            "coefficient-only".to_owned(),
            CatalogEntry {
                hub_height: 100.0,
                rotor_diameter: Some(90.0),
                nominal_power: Some(2_000_000.0),
                power_coefficient_curve: Some(vec![(3.0, 0.2), (9.0, 0.47), (20.0, 0.1)]),
                plateau: true,
                ..CatalogEntry::default()
            },
        );
        catalog.insert(
            "broken".to_owned(),
            CatalogEntry {
                hub_height: 100.0,
                power_curve: Some(vec![(5.0, 0.0), (4.0, 1000.0)]),
                ..CatalogEntry::default()
            },
        );
        catalog
    }

    #[test]
    fn looks_up_power_curve_turbine() {
        let turbine = catalog().turbine("E-126/4200").unwrap();
        assert_relative_eq!(turbine.hub_height().get::<meter>(), 135.0);
        assert_relative_eq!(turbine.nominal_power().get::<watt>(), 4.2e6);
        assert_eq!(turbine.power_curve().map(Curve::end), Some(CurveEnd::CutOut));
    }

    #[test]
    fn plateau_flag_applies_to_curves() {
        let turbine = catalog().turbine("coefficient-only").unwrap();
        assert_eq!(
            turbine.power_coefficient_curve().map(Curve::end),
            Some(CurveEnd::Plateau)
        );
        assert!(turbine.power_curve().is_none());
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            catalog().turbine("V90"),
            Err(CatalogError::NotFound {
                name: "V90".to_owned()
            })
        );
    }

    #[test]
    fn invalid_entry_reports_validation_error() {
        let result = catalog().turbine("broken");
        assert!(matches!(
            result,
            Err(CatalogError::Invalid {
                source: ValidationError::Curve { .. },
                ..
            })
        ));
    }
}
