//! Quantity kinds
//!
//! Zero-sized marker types used as the phantom parameter of `Unit<Q>`.
//! They are never inspected at runtime except by `Unit::as_type`, which
//! checks a unit's dimension against the marker before re-tagging it.

use crate::Dimension;

/// A kind of physical quantity
pub trait Quantity: 'static + Send + Sync {
    /// Human-readable name of the quantity kind
    const NAME: &'static str;
    /// Dimension every unit of this kind must have; `None` accepts any
    const DIMENSION: Option<Dimension>;
}

macro_rules! quantities {
    ($($(#[$doc:meta])* $ty:ident => $name:literal, $dim:expr;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $ty;

            impl Quantity for $ty {
                const NAME: &'static str = $name;
                const DIMENSION: Option<Dimension> = Some($dim);
            }
        )*
    };
}

quantities! {
    Length => "length", Dimension::LENGTH;
    Mass => "mass", Dimension::MASS;
    /// Time interval (named to avoid clashing with `std::time`)
    Duration => "duration", Dimension::TIME;
    ElectricCurrent => "electric current", Dimension::CURRENT;
    Temperature => "temperature", Dimension::TEMPERATURE;
    AmountOfSubstance => "amount of substance", Dimension::AMOUNT;
    LuminousIntensity => "luminous intensity", Dimension::LUMINOSITY;
    Dimensionless => "dimensionless", Dimension::NONE;
    Angle => "angle", Dimension::NONE;
    SolidAngle => "solid angle", Dimension::NONE;
    Frequency => "frequency", Dimension::FREQUENCY;
    /// Decays per unit time; same dimension as frequency, different meaning
    RadioactiveActivity => "radioactive activity", Dimension::FREQUENCY;
    Velocity => "velocity", Dimension::VELOCITY;
    Acceleration => "acceleration", Dimension::ACCELERATION;
    Area => "area", Dimension::AREA;
    Volume => "volume", Dimension::VOLUME;
    Force => "force", Dimension::FORCE;
    Pressure => "pressure", Dimension::PRESSURE;
    Energy => "energy", Dimension::ENERGY;
    Power => "power", Dimension::POWER;
    ElectricCharge => "electric charge", Dimension::CHARGE;
    ElectricPotential => "electric potential", Dimension::VOLTAGE;
    ElectricResistance => "electric resistance", Dimension::RESISTANCE;
    AbsorbedDose => "absorbed dose", Dimension::SPECIFIC_ENERGY;
    EquivalentDose => "equivalent dose", Dimension::SPECIFIC_ENERGY;
}

/// Quantity kind of units built by unit algebra before they are re-tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Untyped;

impl Quantity for Untyped {
    const NAME: &'static str = "untyped";
    const DIMENSION: Option<Dimension> = None;
}
