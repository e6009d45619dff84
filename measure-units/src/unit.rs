//! Typed unit handles
//!
//! `Unit<Q>` is a cheap, cloneable handle to an immutable unit variant,
//! tagged with the quantity kind `Q`. The tag exists only at compile time:
//! it stops a frequency from being converted into a radioactive activity
//! even though both reduce to `1/s`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Div, Mul};
use std::sync::Arc;

use measure_core::{UnitConverter, UnitError};
use tracing::debug;

use crate::kind::{self, AlternateUnit, BaseUnit, TransformedUnit, UnitKind};
use crate::registry::Registration;
use crate::{Dimension, Dimensionless, Quantity, SymbolRegistry, Untyped};

/// A unit of measure for quantities of kind `Q`
pub struct Unit<Q = Untyped> {
    kind: Arc<UnitKind>,
    quantity: PhantomData<fn() -> Q>,
}

impl<Q: Quantity> Unit<Q> {
    pub(crate) fn from_kind(kind: Arc<UnitKind>) -> Self {
        Unit { kind, quantity: PhantomData }
    }

    // ========== Construction ==========

    /// Define a base unit and register its symbol.
    ///
    /// Redefining a base unit with the same symbol and dimension succeeds;
    /// any other owner of the symbol is a conflict.
    pub fn base(
        symbol: impl Into<String>,
        dimension: Dimension,
        registry: &SymbolRegistry,
    ) -> Result<Self, UnitError> {
        let symbol = symbol.into();
        check_dimension::<Q>(&symbol, dimension)?;

        let candidate = Arc::new(UnitKind::Base(BaseUnit { symbol: symbol.clone(), dimension }));
        match registry.insert_if_absent(&symbol, &candidate) {
            Registration::Inserted => {
                debug!(symbol = %symbol, dimension = %dimension, "registered base unit");
                Ok(Self::from_kind(candidate))
            }
            Registration::Existing(existing) => match existing.as_ref() {
                UnitKind::Base(b) if b.dimension == dimension => {
                    debug!(symbol = %symbol, "base unit already registered");
                    Ok(Self::from_kind(candidate))
                }
                _ => Err(conflict(&symbol, &existing)),
            },
        }
    }

    /// Define an alternate unit of this unit under `symbol`.
    ///
    /// If the symbol is already owned by an alternate unit with the same
    /// parent, the definition is accepted as a duplicate: the returned unit
    /// equals the registered one, which stays authoritative for lookups.
    ///
    /// # Panics
    ///
    /// Panics if this unit is not a standard unit, before the registry is
    /// consulted. Use [`Unit::check_standard`] to test first.
    pub fn alternate<R: Quantity>(
        &self,
        symbol: impl Into<String>,
        registry: &SymbolRegistry,
    ) -> Result<Unit<R>, UnitError> {
        assert!(self.is_standard_unit(), "{} is not a standard unit", self);
        let symbol = symbol.into();
        check_dimension::<R>(&symbol, self.dimension())?;

        let candidate = Arc::new(UnitKind::Alternate(AlternateUnit {
            symbol: symbol.clone(),
            parent: Arc::clone(&self.kind),
        }));
        match registry.insert_if_absent(&symbol, &candidate) {
            Registration::Inserted => {
                debug!(symbol = %symbol, parent = %self, "registered alternate unit");
                Ok(Unit::from_kind(candidate))
            }
            Registration::Existing(existing) => match existing.as_ref() {
                UnitKind::Alternate(a) if a.symbol == symbol && a.parent == self.kind => {
                    debug!(symbol = %symbol, parent = %self, "alternate unit already registered");
                    Ok(Unit::from_kind(candidate))
                }
                _ => Err(conflict(&symbol, &existing)),
            },
        }
    }

    /// Err with `NotStandard` unless this is a standard unit
    pub fn check_standard(&self) -> Result<(), UnitError> {
        if self.is_standard_unit() {
            Ok(())
        } else {
            Err(UnitError::NotStandard { unit: self.to_string() })
        }
    }

    // ========== Standard-unit reduction ==========

    /// True iff this unit is its own standard unit
    pub fn is_standard_unit(&self) -> bool {
        self.kind.is_standard()
    }

    /// The canonical standard form of this unit
    pub fn standard_unit(&self) -> Unit<Q> {
        Unit::from_kind(kind::standard_unit(&self.kind))
    }

    /// Converter from this unit to its standard unit
    pub fn to_standard_unit(&self) -> UnitConverter {
        self.kind.to_standard_unit()
    }

    /// Converter from this unit to `that`.
    ///
    /// Both units must reduce to the same standard unit; this is what keeps
    /// two alternate units of one dimension (Gy, Sv) apart.
    pub fn converter_to(&self, that: &Unit<Q>) -> Result<UnitConverter, UnitError> {
        if self == that {
            return Ok(UnitConverter::IDENTITY);
        }
        if kind::standard_unit(&self.kind) != kind::standard_unit(&that.kind) {
            return Err(UnitError::Incompatible {
                from: self.to_string(),
                to: that.to_string(),
            });
        }
        Ok(that.to_standard_unit().inverse().compose(&self.to_standard_unit()))
    }

    // ========== Inspection ==========

    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    /// Symbol of a base or alternate unit
    pub fn symbol(&self) -> Option<&str> {
        self.kind.symbol()
    }

    /// Parent of an alternate or transformed unit
    pub fn parent(&self) -> Option<Unit<Untyped>> {
        match self.kind.as_ref() {
            UnitKind::Alternate(a) => Some(a.parent()),
            UnitKind::Transformed(t) => Some(t.parent()),
            _ => None,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.kind.dimension()
    }

    /// True for every unit that is not a base unit
    pub fn is_derived(&self) -> bool {
        !matches!(self.kind.as_ref(), UnitKind::Base(_))
    }

    /// Check if both units have the same dimension, whatever their kind tags
    pub fn is_compatible<R: Quantity>(&self, that: &Unit<R>) -> bool {
        self == that || self.dimension() == that.dimension()
    }

    /// Check if both handles point at the very same unit instance.
    ///
    /// Equal units need not be the same instance: a duplicate alternate
    /// definition equals, but is not, the registered unit.
    pub fn same_instance<R: Quantity>(&self, that: &Unit<R>) -> bool {
        Arc::ptr_eq(&self.kind, &that.kind)
    }

    /// Re-tag this unit with quantity kind `R`, checking `R`'s dimension
    pub fn as_type<R: Quantity>(&self) -> Result<Unit<R>, UnitError> {
        check_dimension::<R>(&self.to_string(), self.dimension())?;
        Ok(Unit::from_kind(Arc::clone(&self.kind)))
    }

    /// Drop the quantity kind tag
    pub fn untyped(&self) -> Unit<Untyped> {
        Unit::from_kind(Arc::clone(&self.kind))
    }

    // ========== Unit algebra ==========

    pub fn times<R: Quantity>(&self, that: &Unit<R>) -> Unit<Untyped> {
        Unit::from_kind(kind::product([(Arc::clone(&self.kind), 1), (Arc::clone(&that.kind), 1)]))
    }

    pub fn divide<R: Quantity>(&self, that: &Unit<R>) -> Unit<Untyped> {
        Unit::from_kind(kind::product([(Arc::clone(&self.kind), 1), (Arc::clone(&that.kind), -1)]))
    }

    pub fn inverse(&self) -> Unit<Untyped> {
        self.pow(-1)
    }

    /// This unit raised to `exp`.
    ///
    /// # Panics
    ///
    /// Panics if a resulting exponent overflows `i32` (e.g. `pow(i32::MIN)`
    /// followed by `inverse()`).
    pub fn pow(&self, exp: i32) -> Unit<Untyped> {
        Unit::from_kind(kind::product([(Arc::clone(&self.kind), exp)]))
    }

    /// Derive a unit whose values convert to this unit through `converter`.
    ///
    /// Transforming by the identity returns this unit; transforming a
    /// transformed unit folds both converters onto the original parent.
    pub fn transform(&self, converter: UnitConverter) -> Unit<Q> {
        if converter.is_identity() {
            return self.clone();
        }
        let (parent, to_parent) = match self.kind.as_ref() {
            UnitKind::Transformed(t) => (Arc::clone(&t.parent), t.to_parent.compose(&converter)),
            _ => (Arc::clone(&self.kind), converter),
        };
        if to_parent.is_identity() {
            return Unit::from_kind(parent);
        }
        Unit::from_kind(Arc::new(UnitKind::Transformed(TransformedUnit { parent, to_parent })))
    }

    /// Unit offset from this one (°C = K plus 273.15)
    pub fn plus(&self, offset: f64) -> Unit<Q> {
        self.transform(UnitConverter::add(offset))
    }

    /// Unit scaled from this one by an inexact factor
    pub fn scale(&self, factor: f64) -> Unit<Q> {
        self.transform(UnitConverter::multiply(factor))
    }

    /// Unit scaled from this one by an exact ratio (km = m scaled 1000/1)
    pub fn scale_ratio(&self, numerator: i64, denominator: i64) -> Unit<Q> {
        self.transform(UnitConverter::rational(numerator, denominator))
    }
}

impl Unit<Dimensionless> {
    /// The dimensionless unit (empty product)
    pub fn one() -> Self {
        Unit::from_kind(kind::product(std::iter::empty()))
    }
}

fn check_dimension<R: Quantity>(label: &str, actual: Dimension) -> Result<(), UnitError> {
    match R::DIMENSION {
        Some(expected) if expected != actual => Err(UnitError::DimensionMismatch {
            unit: label.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}

fn conflict(symbol: &str, existing: &UnitKind) -> UnitError {
    UnitError::SymbolConflict {
        symbol: symbol.to_string(),
        existing: match existing {
            UnitKind::Alternate(a) => format!("alternate of {}", a.parent),
            UnitKind::Base(b) => format!("base unit of dimension {}", b.dimension),
            other => other.to_string(),
        },
    }
}

impl<Q> Clone for Unit<Q> {
    fn clone(&self) -> Self {
        Unit { kind: Arc::clone(&self.kind), quantity: PhantomData }
    }
}

impl<Q: Quantity, R: Quantity> PartialEq<Unit<R>> for Unit<Q> {
    fn eq(&self, other: &Unit<R>) -> bool {
        self.kind == other.kind
    }
}

impl<Q: Quantity> Eq for Unit<Q> {}

impl<Q: Quantity> Hash for Unit<Q> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl<Q: Quantity> fmt::Display for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<Q: Quantity> fmt::Debug for Unit<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit<{}>({})", Q::NAME, self.kind)
    }
}

impl<Q: Quantity, R: Quantity> Mul<&Unit<R>> for &Unit<Q> {
    type Output = Unit<Untyped>;

    fn mul(self, rhs: &Unit<R>) -> Unit<Untyped> {
        self.times(rhs)
    }
}

impl<Q: Quantity, R: Quantity> Div<&Unit<R>> for &Unit<Q> {
    type Output = Unit<Untyped>;

    fn div(self, rhs: &Unit<R>) -> Unit<Untyped> {
        self.divide(rhs)
    }
}
