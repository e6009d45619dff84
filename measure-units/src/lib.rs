//! Measure Units - Unit identity, registration and reduction
//!
//! Units are strongly typed by quantity kind and can be combined,
//! converted and compared without losing dimensional correctness.
//!
//! Variants:
//! - Base units (m, kg, s, ...): dimensional roots
//! - Alternate units (Hz, J, Ω, ...): standard units with their own symbol
//! - Product units (m·s^-1, ...): units raised to integer powers
//! - Transformed units (km, °C, ...): a converter applied to another unit
//!
//! Every symbol is owned by exactly one unit of a `SymbolRegistry`.
//! Redefining a unit identically is accepted; reusing its symbol for a
//! different unit is a conflict.

mod dimension;
mod kind;
mod quantity;
mod registry;
mod system;
mod unit;

pub use dimension::Dimension;
pub use kind::{AlternateUnit, BaseUnit, Element, ProductUnit, TransformedUnit, UnitKind};
pub use quantity::*;
pub use registry::SymbolRegistry;
pub use system::Si;
pub use unit::Unit;

pub use measure_core::{Severity, UnitConverter, UnitError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dimension, Quantity, Si, SymbolRegistry, Unit, Untyped};
    pub use measure_core::{UnitConverter, UnitError};
}
