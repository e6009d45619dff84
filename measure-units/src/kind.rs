//! Unit variants and their standard-unit reduction
//!
//! Every unit is one of four immutable variants, shared behind an `Arc`.
//! Alternate, product and transformed units are *derived*; base units are
//! the dimensional roots everything reduces to.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use measure_core::UnitConverter;

use crate::dimension::exponent;
use crate::{Dimension, Unit, Untyped};

/// Irreducible root unit (e.g. metre)
#[derive(Debug)]
pub struct BaseUnit {
    pub(crate) symbol: String,
    pub(crate) dimension: Dimension,
}

impl BaseUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

/// Standard unit with its own symbol, distinguishing quantities of a
/// different nature but the same dimensions (hertz vs becquerel).
#[derive(Debug)]
pub struct AlternateUnit {
    pub(crate) symbol: String,
    pub(crate) parent: Arc<UnitKind>,
}

impl AlternateUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The standard unit this alternate unit was derived from
    pub fn parent(&self) -> Unit<Untyped> {
        Unit::from_kind(Arc::clone(&self.parent))
    }
}

/// One factor of a product unit
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) unit: Arc<UnitKind>,
    pub(crate) pow: i32,
}

impl Element {
    pub fn unit(&self) -> Unit<Untyped> {
        Unit::from_kind(Arc::clone(&self.unit))
    }

    pub fn pow(&self) -> i32 {
        self.pow
    }
}

/// Product of units raised to integer powers (e.g. m·s^-1)
///
/// Elements are never products themselves, appear at most once and never
/// with a zero exponent. The empty product is the dimensionless unit.
#[derive(Debug)]
pub struct ProductUnit {
    pub(crate) elements: Vec<Element>,
}

impl ProductUnit {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// A unit obtained by applying a converter to another unit (e.g. km, °C)
#[derive(Debug)]
pub struct TransformedUnit {
    pub(crate) parent: Arc<UnitKind>,
    /// Converts values of this unit into values of `parent`
    pub(crate) to_parent: UnitConverter,
}

impl TransformedUnit {
    pub fn parent(&self) -> Unit<Untyped> {
        Unit::from_kind(Arc::clone(&self.parent))
    }

    pub fn to_parent(&self) -> &UnitConverter {
        &self.to_parent
    }
}

#[derive(Debug)]
pub enum UnitKind {
    Base(BaseUnit),
    Alternate(AlternateUnit),
    Product(ProductUnit),
    Transformed(TransformedUnit),
}

impl UnitKind {
    pub(crate) fn symbol(&self) -> Option<&str> {
        match self {
            UnitKind::Base(u) => Some(&u.symbol),
            UnitKind::Alternate(u) => Some(&u.symbol),
            _ => None,
        }
    }

    pub(crate) fn is_standard(&self) -> bool {
        match self {
            UnitKind::Base(_) | UnitKind::Alternate(_) => true,
            UnitKind::Product(p) => p.elements.iter().all(|e| e.unit.is_standard()),
            UnitKind::Transformed(_) => false,
        }
    }

    /// Converter from this unit to its standard unit
    pub(crate) fn to_standard_unit(&self) -> UnitConverter {
        match self {
            UnitKind::Base(_) | UnitKind::Alternate(_) => UnitConverter::IDENTITY,
            UnitKind::Transformed(t) => t.parent.to_standard_unit().compose(&t.to_parent),
            UnitKind::Product(p) => p.elements.iter().fold(UnitConverter::IDENTITY, |acc, e| {
                acc.compose(&e.unit.to_standard_unit().linear_part().pow(e.pow))
            }),
        }
    }

    pub(crate) fn dimension(&self) -> Dimension {
        match self {
            UnitKind::Base(u) => u.dimension,
            UnitKind::Alternate(u) => u.parent.dimension(),
            UnitKind::Transformed(u) => u.parent.dimension(),
            UnitKind::Product(p) => p
                .elements
                .iter()
                .fold(Dimension::NONE, |acc, e| acc.multiply(&e.unit.dimension().power(e.pow))),
        }
    }
}

/// Canonical standard form of `unit`. Idempotent: a standard unit returns
/// the very same instance.
pub(crate) fn standard_unit(unit: &Arc<UnitKind>) -> Arc<UnitKind> {
    if unit.is_standard() {
        return Arc::clone(unit);
    }
    match unit.as_ref() {
        UnitKind::Transformed(t) => standard_unit(&t.parent),
        UnitKind::Product(p) => product(p.elements.iter().map(|e| (standard_unit(&e.unit), e.pow))),
        UnitKind::Base(_) | UnitKind::Alternate(_) => Arc::clone(unit),
    }
}

/// Build the product of `factors`, folding like units and flattening nested
/// products. A lone factor with exponent one collapses to that factor.
///
/// Panics if a folded exponent overflows `i32`.
pub(crate) fn product(factors: impl IntoIterator<Item = (Arc<UnitKind>, i32)>) -> Arc<UnitKind> {
    let mut elements: Vec<Element> = Vec::new();
    for (unit, pow) in factors {
        match unit.as_ref() {
            UnitKind::Product(p) => {
                for e in &p.elements {
                    push_element(&mut elements, Arc::clone(&e.unit), exponent(e.pow.checked_mul(pow)));
                }
            }
            _ => push_element(&mut elements, unit, pow),
        }
    }
    elements.retain(|e| e.pow != 0);

    match elements.as_slice() {
        [single] if single.pow == 1 => Arc::clone(&single.unit),
        _ => Arc::new(UnitKind::Product(ProductUnit { elements })),
    }
}

fn push_element(elements: &mut Vec<Element>, unit: Arc<UnitKind>, pow: i32) {
    if let Some(existing) = elements.iter_mut().find(|e| e.unit == unit) {
        existing.pow = exponent(existing.pow.checked_add(pow));
        return;
    }
    elements.push(Element { unit, pow });
}

impl PartialEq for UnitKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Symbols are unique within a registry.
            (UnitKind::Base(a), UnitKind::Base(b)) => a.symbol == b.symbol,
            (UnitKind::Alternate(a), UnitKind::Alternate(b)) => a.symbol == b.symbol,
            (UnitKind::Product(a), UnitKind::Product(b)) => {
                a.elements.len() == b.elements.len()
                    && a.elements.iter().all(|e| {
                        b.elements.iter().any(|f| f.pow == e.pow && f.unit == e.unit)
                    })
            }
            (UnitKind::Transformed(a), UnitKind::Transformed(b)) => {
                a.to_parent == b.to_parent && a.parent == b.parent
            }
            _ => false,
        }
    }
}

impl Eq for UnitKind {}

impl Hash for UnitKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            UnitKind::Base(u) => u.symbol.hash(state),
            UnitKind::Alternate(u) => u.symbol.hash(state),
            UnitKind::Product(p) => {
                // order-insensitive, to agree with eq
                let combined = p.elements.iter().fold(0u64, |acc, e| {
                    let mut h = DefaultHasher::new();
                    e.unit.hash(&mut h);
                    e.pow.hash(&mut h);
                    acc.wrapping_add(h.finish())
                });
                p.elements.len().hash(state);
                combined.hash(state);
            }
            UnitKind::Transformed(t) => {
                t.parent.hash(state);
                t.to_parent.hash(state);
            }
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Base(u) => write!(f, "{}", u.symbol),
            UnitKind::Alternate(u) => write!(f, "{}", u.symbol),
            UnitKind::Product(p) => {
                if p.elements.is_empty() {
                    return write!(f, "1");
                }
                let parts: Vec<String> = p
                    .elements
                    .iter()
                    .map(|e| match e.pow {
                        1 => e.unit.to_string(),
                        pow => format!("{}^{}", e.unit, pow),
                    })
                    .collect();
                write!(f, "{}", parts.join("·"))
            }
            UnitKind::Transformed(t) => {
                let parent = match t.parent.as_ref() {
                    UnitKind::Product(_) => format!("({})", t.parent),
                    _ => t.parent.to_string(),
                };
                match &t.to_parent {
                    UnitConverter::Add(offset) => write!(f, "{}+{}", parent, offset),
                    UnitConverter::Multiply(factor) => write!(f, "{}*{}", parent, factor),
                    UnitConverter::Rational(ratio) => write!(f, "{}*{}", parent, ratio),
                    other => write!(f, "{}[{}]", parent, other),
                }
            }
        }
    }
}
