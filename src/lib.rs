//! # Twine Wind
//!
//! Wind turbine power estimation from weather time series, built as a
//! [Twine](https://github.com/isentropic-dev/twine) model.
//!
//! Weather measured at one or more heights is brought to hub height with a
//! selectable wind profile, temperature and density model, then converted to
//! power with the turbine's power or power coefficient curve.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Support code
//!
//! [`support`] holds the pieces that are not specific to one stage: the
//! standard-atmosphere relations, numeric constraints and unit helpers.
//! They are public because callers building their own stages need them,
//! but their APIs may still change between releases. Helpers that only a
//! single stage uses stay private inside the model's `core` module.

pub mod models;
pub mod support;
