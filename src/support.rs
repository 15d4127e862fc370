//! Supporting utilities used by the wind models.
//!
//! - [`atmosphere`]: standard-atmosphere temperature, pressure and density relations
//! - [`constraint`]: type-level numeric constraints checked at construction
//! - [`units`]: extensions to [`uom`]

pub mod atmosphere;
pub mod constraint;
pub mod units;
