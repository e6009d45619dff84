//! Measure Core - Fundamental types
//!
//! This crate provides the leaf types every unit depends on:
//! - `UnitConverter`: composable, invertible mapping between unit representations
//! - `UnitError`: structured errors raised while constructing or converting units

mod converter;
mod error;

pub use converter::UnitConverter;
pub use error::{codes, Severity, UnitError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Severity, UnitConverter, UnitError};
    pub use crate::error::codes;
}
