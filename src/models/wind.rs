//! Wind energy models.

pub mod turbine_power;
