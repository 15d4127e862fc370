//! Results types for a model chain run.

use jiff::Timestamp;
use uom::si::f64::{MassDensity, Power, ThermodynamicTemperature, Velocity};

/// Power output aligned with the weather index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PowerSeries {
    index: Vec<Timestamp>,
    values: Vec<Power>,
}

impl PowerSeries {
    pub(super) fn new(index: Vec<Timestamp>, values: Vec<Power>) -> Self {
        debug_assert_eq!(index.len(), values.len());
        Self { index, values }
    }

    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    #[must_use]
    pub fn values(&self) -> &[Power] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(timestamp, power)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, Power)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Total power summed over all timestamps.
    #[must_use]
    pub fn sum(&self) -> Power {
        self.values.iter().copied().sum()
    }
}

/// Hub-height intermediates computed during a run.
///
/// Temperature and density are `None` when the configuration did not need them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostics {
    pub wind_speed_hub: Vec<Velocity>,
    pub temperature_hub: Option<Vec<ThermodynamicTemperature>>,
    pub density_hub: Option<Vec<MassDensity>>,
}

/// Output of a successful model chain run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelChainResults {
    pub power_output: PowerSeries,
    pub diagnostics: Diagnostics,
}
