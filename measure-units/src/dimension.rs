//! Dimensional analysis types
//!
//! A dimension is a vector of exponents over the seven SI base quantities:
//! [length, mass, time, current, temperature, amount, luminosity]

use std::fmt;
use serde::{Serialize, Deserialize};

const SYMBOLS: [&str; 7] = ["L", "M", "T", "I", "Θ", "N", "J"];

/// Exponents of the seven SI base dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub exponents: [i32; 7],
}

impl Dimension {
    pub const NONE: Dimension = Dimension::new([0, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: Dimension = Dimension::new([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Dimension = Dimension::new([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: Dimension = Dimension::new([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: Dimension = Dimension::new([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: Dimension = Dimension::new([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT: Dimension = Dimension::new([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOSITY: Dimension = Dimension::new([0, 0, 0, 0, 0, 0, 1]);

    /// [L T^-1]
    pub const VELOCITY: Dimension = Dimension::new([1, 0, -1, 0, 0, 0, 0]);
    /// [L T^-2]
    pub const ACCELERATION: Dimension = Dimension::new([1, 0, -2, 0, 0, 0, 0]);
    /// [L^2]
    pub const AREA: Dimension = Dimension::new([2, 0, 0, 0, 0, 0, 0]);
    /// [L^3]
    pub const VOLUME: Dimension = Dimension::new([3, 0, 0, 0, 0, 0, 0]);
    /// [T^-1]
    pub const FREQUENCY: Dimension = Dimension::new([0, 0, -1, 0, 0, 0, 0]);
    /// [M L T^-2]
    pub const FORCE: Dimension = Dimension::new([1, 1, -2, 0, 0, 0, 0]);
    /// [M L^-1 T^-2]
    pub const PRESSURE: Dimension = Dimension::new([-1, 1, -2, 0, 0, 0, 0]);
    /// [M L^2 T^-2]
    pub const ENERGY: Dimension = Dimension::new([2, 1, -2, 0, 0, 0, 0]);
    /// [M L^2 T^-3]
    pub const POWER: Dimension = Dimension::new([2, 1, -3, 0, 0, 0, 0]);
    /// [I T]
    pub const CHARGE: Dimension = Dimension::new([0, 0, 1, 1, 0, 0, 0]);
    /// [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension = Dimension::new([2, 1, -3, -1, 0, 0, 0]);
    /// [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension = Dimension::new([2, 1, -3, -2, 0, 0, 0]);
    /// [L^2 T^-2], energy per unit mass (absorbed and equivalent dose)
    pub const SPECIFIC_ENERGY: Dimension = Dimension::new([2, 0, -2, 0, 0, 0, 0]);

    pub const fn new(exponents: [i32; 7]) -> Self {
        Dimension { exponents }
    }

    pub fn is_none(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Product of two dimensions (exponents add)
    ///
    /// # Panics
    ///
    /// Panics if an exponent overflows `i32`.
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        Dimension::new(std::array::from_fn(|i| {
            exponent(self.exponents[i].checked_add(other.exponents[i]))
        }))
    }

    /// Quotient of two dimensions (exponents subtract)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.multiply(&other.invert())
    }

    /// # Panics
    ///
    /// Panics if an exponent overflows `i32`.
    pub fn power(&self, exp: i32) -> Dimension {
        Dimension::new(self.exponents.map(|e| exponent(e.checked_mul(exp))))
    }

    pub fn invert(&self) -> Dimension {
        self.power(-1)
    }
}

/// Unwraps an exponent computed with checked arithmetic
pub(crate) fn exponent(value: Option<i32>) -> i32 {
    match value {
        Some(v) => v,
        None => panic!("unit exponent overflow"),
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = SYMBOLS
            .iter()
            .zip(self.exponents)
            .filter(|(_, exp)| *exp != 0)
            .map(|(sym, exp)| match exp {
                1 => sym.to_string(),
                _ => format!("{}^{}", sym, exp),
            })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::NONE
    }
}
