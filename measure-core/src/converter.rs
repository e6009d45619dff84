//! Unit converters
//!
//! A converter maps a numeric value expressed in one unit to the same value
//! expressed in another unit. Converters are pure values: they can be
//! inverted and composed, and adjacent stages of the same shape are folded
//! so that chains of scale factors stay flat.

use std::fmt;
use std::hash::{Hash, Hasher};

use dashu_base::Approximation;
use dashu_int::IBig;
use dashu_ratio::RBig;

/// Invertible, composable mapping between two unit representations.
#[derive(Debug, Clone)]
pub enum UnitConverter {
    /// Leaves values unchanged
    Identity,
    /// Adds a constant offset (non-linear, e.g. °C -> K)
    Add(f64),
    /// Multiplies by an inexact factor (e.g. degree -> radian)
    Multiply(f64),
    /// Multiplies by an exact rational factor (e.g. km -> m)
    Rational(RBig),
    /// Applies `first`, then `second`
    Compound(Box<UnitConverter>, Box<UnitConverter>),
}

impl UnitConverter {
    /// The identity converter
    pub const IDENTITY: UnitConverter = UnitConverter::Identity;

    /// Converter adding `offset`; a zero offset is the identity
    ///
    /// # Panics
    ///
    /// Panics if `offset` is not finite.
    pub fn add(offset: f64) -> Self {
        assert!(offset.is_finite(), "converter offset must be finite, got {}", offset);
        Self::folded_add(offset)
    }

    /// Converter multiplying by `factor`; a factor of one is the identity
    ///
    /// # Panics
    ///
    /// Panics if `factor` is zero or not finite, since such a converter has
    /// no inverse.
    pub fn multiply(factor: f64) -> Self {
        assert!(
            factor != 0.0 && factor.is_finite(),
            "converter factor must be finite and non-zero, got {}",
            factor
        );
        Self::folded_multiply(factor)
    }

    fn folded_add(offset: f64) -> Self {
        if offset == 0.0 {
            Self::Identity
        } else {
            Self::Add(offset)
        }
    }

    fn folded_multiply(factor: f64) -> Self {
        if factor == 1.0 {
            Self::Identity
        } else {
            Self::Multiply(factor)
        }
    }

    /// Converter multiplying by `numerator / denominator`, held exactly.
    ///
    /// # Panics
    ///
    /// Panics if `numerator` or `denominator` is zero. Either one in a unit
    /// definition is a defect in the calling code, not a data error.
    pub fn rational(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "rational converter with zero denominator");
        assert!(numerator != 0, "rational converter with zero numerator");
        Self::from_ratio(RBig::from(IBig::from(numerator)) / RBig::from(IBig::from(denominator)))
    }

    /// Converter multiplying by an exact ratio; a ratio of one is the identity
    pub fn from_ratio(ratio: RBig) -> Self {
        if ratio == RBig::ONE {
            Self::Identity
        } else {
            Self::Rational(ratio)
        }
    }

    /// Check if this is the identity converter
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Check if this converter preserves zero and scales linearly
    pub fn is_linear(&self) -> bool {
        match self {
            Self::Identity | Self::Multiply(_) | Self::Rational(_) => true,
            Self::Add(_) => false,
            Self::Compound(first, second) => first.is_linear() && second.is_linear(),
        }
    }

    /// Convert a value. Non-finite input propagates through unchanged in kind.
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Add(offset) => value + offset,
            Self::Multiply(factor) => value * factor,
            Self::Rational(ratio) => value * ratio_to_f64(ratio),
            Self::Compound(first, second) => second.convert(first.convert(value)),
        }
    }

    /// Returns the converter that exactly undoes this one
    pub fn inverse(&self) -> UnitConverter {
        match self {
            Self::Identity => Self::Identity,
            Self::Add(offset) => Self::Add(-offset),
            Self::Multiply(factor) => Self::Multiply(1.0 / factor),
            Self::Rational(ratio) => Self::Rational(RBig::ONE / ratio),
            Self::Compound(first, second) => {
                Self::Compound(Box::new(second.inverse()), Box::new(first.inverse()))
            }
        }
    }

    /// Returns a converter equivalent to applying `other`, then `self`.
    ///
    /// Composition with the identity returns the other operand unchanged.
    pub fn compose(&self, other: &UnitConverter) -> UnitConverter {
        match (self, other) {
            (Self::Identity, c) | (c, Self::Identity) => c.clone(),
            (Self::Add(a), Self::Add(b)) => Self::folded_add(a + b),
            (Self::Multiply(a), Self::Multiply(b)) => Self::folded_multiply(a * b),
            (Self::Rational(a), Self::Rational(b)) => Self::from_ratio(a * b),
            (Self::Multiply(f), Self::Rational(r)) | (Self::Rational(r), Self::Multiply(f)) => {
                Self::folded_multiply(f * ratio_to_f64(r))
            }
            _ => Self::Compound(Box::new(other.clone()), Box::new(self.clone())),
        }
    }

    /// Returns this converter composed with itself `exp` times.
    /// Negative exponents compose the inverse.
    pub fn pow(&self, exp: i32) -> UnitConverter {
        let step = if exp < 0 { self.inverse() } else { self.clone() };
        (0..exp.unsigned_abs()).fold(Self::Identity, |acc, _| acc.compose(&step))
    }

    /// Returns this converter with every offset stage removed.
    ///
    /// A unit with an offset that takes part in a product denotes an
    /// interval (J/°C is J/K), so only its scale survives.
    pub fn linear_part(&self) -> UnitConverter {
        match self {
            Self::Add(_) => Self::Identity,
            Self::Compound(first, second) => second.linear_part().compose(&first.linear_part()),
            other => other.clone(),
        }
    }
}

fn ratio_to_f64(ratio: &RBig) -> f64 {
    match ratio.to_f64() {
        Approximation::Exact(v) => v,
        Approximation::Inexact(v, _) => v,
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::Identity
    }
}

// Floats compare bitwise so that equality stays reflexive and agrees with Hash.
impl PartialEq for UnitConverter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity, Self::Identity) => true,
            (Self::Add(a), Self::Add(b)) | (Self::Multiply(a), Self::Multiply(b)) => {
                a.to_bits() == b.to_bits()
            }
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Compound(a1, a2), Self::Compound(b1, b2)) => a1 == b1 && a2 == b2,
            _ => false,
        }
    }
}

impl Eq for UnitConverter {}

impl Hash for UnitConverter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Identity => {}
            Self::Add(v) | Self::Multiply(v) => v.to_bits().hash(state),
            Self::Rational(ratio) => {
                ratio.numerator().hash(state);
                ratio.denominator().hash(state);
            }
            Self::Compound(first, second) => {
                first.hash(state);
                second.hash(state);
            }
        }
    }
}

impl fmt::Display for UnitConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "x"),
            Self::Add(offset) => write!(f, "x + {}", offset),
            Self::Multiply(factor) => write!(f, "x * {}", factor),
            Self::Rational(ratio) => write!(f, "x * {}", ratio),
            Self::Compound(first, second) => write!(f, "({}) then ({})", first, second),
        }
    }
}
