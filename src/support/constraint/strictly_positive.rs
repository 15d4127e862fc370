use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// Hub heights, rotor diameters, roughness lengths and nominal power all
/// appear as divisors or inside logarithms, so zero is rejected along with
/// negative values.
///
/// # Examples
///
/// ```
/// use twine_wind::support::constraint::StrictlyPositive;
/// use uom::si::{f64::Length, length::meter};
///
/// let diameter = StrictlyPositive::new(Length::new::<meter>(127.0)).unwrap();
/// assert_eq!(diameter.into_inner().get::<meter>(), 127.0);
///
/// assert!(StrictlyPositive::new(Length::new::<meter>(0.0)).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

    #[test]
    fn floats() {
        assert!(StrictlyPositive::new(0.1).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-5.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn densities() {
        let rho = MassDensity::new::<kilogram_per_cubic_meter>(1.225);
        assert!(StrictlyPositive::new(rho).is_ok());

        let rho = MassDensity::new::<kilogram_per_cubic_meter>(0.0);
        assert!(StrictlyPositive::new(rho).is_err());
    }
}
