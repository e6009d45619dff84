//! The International System of Units
//!
//! Base units, the named derived units (as alternate units of products of
//! base units) and a handful of common transformed units. Defining the
//! system twice against one registry is harmless: every definition is
//! accepted as a duplicate of the first.

use std::sync::OnceLock;

use measure_core::UnitError;

use crate::quantity::*;
use crate::{Dimension, SymbolRegistry, Unit};

/// SI units defined against one symbol registry
#[derive(Debug, Clone)]
pub struct Si {
    // Base units
    pub metre: Unit<Length>,
    pub kilogram: Unit<Mass>,
    pub second: Unit<Duration>,
    pub ampere: Unit<ElectricCurrent>,
    pub kelvin: Unit<Temperature>,
    pub mole: Unit<AmountOfSubstance>,
    pub candela: Unit<LuminousIntensity>,
    pub one: Unit<Dimensionless>,

    // Named derived units
    pub radian: Unit<Angle>,
    pub steradian: Unit<SolidAngle>,
    pub hertz: Unit<Frequency>,
    pub becquerel: Unit<RadioactiveActivity>,
    pub newton: Unit<Force>,
    pub pascal: Unit<Pressure>,
    pub joule: Unit<Energy>,
    pub watt: Unit<Power>,
    pub coulomb: Unit<ElectricCharge>,
    pub volt: Unit<ElectricPotential>,
    pub ohm: Unit<ElectricResistance>,
    pub gray: Unit<AbsorbedDose>,
    pub sievert: Unit<EquivalentDose>,

    // Products and transformed units
    pub square_metre: Unit<Area>,
    pub cubic_metre: Unit<Volume>,
    pub metre_per_second: Unit<Velocity>,
    pub metre_per_square_second: Unit<Acceleration>,
    pub kilometre: Unit<Length>,
    pub centimetre: Unit<Length>,
    pub gram: Unit<Mass>,
    pub minute: Unit<Duration>,
    pub hour: Unit<Duration>,
    pub celsius: Unit<Temperature>,
    pub litre: Unit<Volume>,
    pub degree: Unit<Angle>,
}

impl Si {
    /// Define the SI units, registering every symbol in `registry`
    pub fn define(registry: &SymbolRegistry) -> Result<Si, UnitError> {
        let metre = Unit::<Length>::base("m", Dimension::LENGTH, registry)?;
        let kilogram = Unit::<Mass>::base("kg", Dimension::MASS, registry)?;
        let second = Unit::<Duration>::base("s", Dimension::TIME, registry)?;
        let ampere = Unit::<ElectricCurrent>::base("A", Dimension::CURRENT, registry)?;
        let kelvin = Unit::<Temperature>::base("K", Dimension::TEMPERATURE, registry)?;
        let mole = Unit::<AmountOfSubstance>::base("mol", Dimension::AMOUNT, registry)?;
        let candela = Unit::<LuminousIntensity>::base("cd", Dimension::LUMINOSITY, registry)?;
        let one = Unit::<Dimensionless>::one();

        let per_second = second.inverse();
        let square_metre = metre.pow(2).as_type::<Area>()?;
        let metre_per_square_second = metre.divide(&second.pow(2)).as_type::<Acceleration>()?;

        let radian = metre.divide(&metre).alternate::<Angle>("rad", registry)?;
        let steradian = square_metre.divide(&square_metre).alternate::<SolidAngle>("sr", registry)?;
        let hertz = per_second.alternate::<Frequency>("Hz", registry)?;
        let becquerel = per_second.alternate::<RadioactiveActivity>("Bq", registry)?;
        let newton = kilogram.times(&metre_per_square_second).alternate::<Force>("N", registry)?;
        let pascal = newton.divide(&square_metre).alternate::<Pressure>("Pa", registry)?;
        let joule = newton.times(&metre).alternate::<Energy>("J", registry)?;
        let watt = joule.divide(&second).alternate::<Power>("W", registry)?;
        let coulomb = second.times(&ampere).alternate::<ElectricCharge>("C", registry)?;
        let volt = watt.divide(&ampere).alternate::<ElectricPotential>("V", registry)?;
        let ohm = volt.divide(&ampere).alternate::<ElectricResistance>("Ω", registry)?;
        let gray = joule.divide(&kilogram).alternate::<AbsorbedDose>("Gy", registry)?;
        let sievert = joule.divide(&kilogram).alternate::<EquivalentDose>("Sv", registry)?;

        let cubic_metre = metre.pow(3).as_type::<Volume>()?;
        let degree = radian.scale(std::f64::consts::PI / 180.0);

        Ok(Si {
            kilometre: metre.scale_ratio(1000, 1),
            centimetre: metre.scale_ratio(1, 100),
            gram: kilogram.scale_ratio(1, 1000),
            minute: second.scale_ratio(60, 1),
            hour: second.scale_ratio(3600, 1),
            celsius: kelvin.plus(273.15),
            litre: cubic_metre.scale_ratio(1, 1000),
            metre_per_second: metre.divide(&second).as_type::<Velocity>()?,
            metre,
            kilogram,
            second,
            ampere,
            kelvin,
            mole,
            candela,
            one,
            radian,
            steradian,
            hertz,
            becquerel,
            newton,
            pascal,
            joule,
            watt,
            coulomb,
            volt,
            ohm,
            gray,
            sievert,
            square_metre,
            cubic_metre,
            metre_per_square_second,
            degree,
        })
    }

    /// SI defined once against the global registry.
    ///
    /// Fails only if another unit took one of the SI symbols first.
    pub fn global() -> Result<&'static Si, UnitError> {
        static SI: OnceLock<Result<Si, UnitError>> = OnceLock::new();
        SI.get_or_init(|| Si::define(SymbolRegistry::global()))
            .as_ref()
            .map_err(Clone::clone)
    }
}
