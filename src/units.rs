//! Unit registry: canonical names, symbols and aliases mapped to
//! SI-convertible quantities, populated from line-oriented definition tables.
use std::collections::HashMap;

use log::debug;

use crate::error::Error;

/// Built-in definition table, loaded by [UnitRegistry::builtin].
/// Same grammar as user extension tables, see [UnitRegistry::load_table].
const BASE_TABLE: &str = "\
# length
meter = [length] = m = metre
kilometer = 1000 * meter = km
centimeter = meter / 100 = cm
millimeter = meter / 1000 = mm
micrometer = meter / 1000000 = um
Megameter = 1000 * kilometer = Mm

# time
second = [time] = s = sec
minute = 60 * second = min
hour = 60 * minute = h
day = 24 * hour = d
week = 7 * day
year = 365.25 * day = yr = julian_year

# angle
radian = [angle] = rad
degree = 3.141592653589793 * radian / 180 = deg
arcminute = degree / 60 = amin
arcsecond = degree / 3600 = asec
milliarcsecond = arcsecond / 1000 = mas
microarcsecond = arcsecond / 1000000 = uas

# dimensionless ratios
unit = []
percent = unit / 100 = %
ppm = unit / 1000000
ppb = unit / 1000000000

# rates
meter per second = meter / second = m/s
meter per year = meter / year = m/yr
millimeter per year = millimeter / year = mm/yr
radian per year = radian / year = rad/yr
milliarcsecond per year = milliarcsecond / year = mas/yr
milliarcsecond per day = milliarcsecond / day = mas/d
degree per megayear = degree / 1000000 / year = deg/Myr
";

/// Dimensionality of a [Unit], as integer exponents over the three
/// base quantities this crate manipulates: length, time and angle.
/// Compound rates combine exponents (milliarcsecond per day is
/// angle¹ time⁻¹).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub length: i8,
    pub time: i8,
    pub angle: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Self = Self {
        length: 0,
        time: 0,
        angle: 0,
    };

    pub const LENGTH: Self = Self {
        length: 1,
        time: 0,
        angle: 0,
    };

    pub const TIME: Self = Self {
        length: 0,
        time: 1,
        angle: 0,
    };

    pub const ANGLE: Self = Self {
        length: 0,
        time: 0,
        angle: 1,
    };

    fn multiplied(self, rhs: Self) -> Self {
        Self {
            length: self.length + rhs.length,
            time: self.time + rhs.time,
            angle: self.angle + rhs.angle,
        }
    }

    fn divided(self, rhs: Self) -> Self {
        Self {
            length: self.length - rhs.length,
            time: self.time - rhs.time,
            angle: self.angle - rhs.angle,
        }
    }
}

/// One registered [Unit]. The factor converts a quantity expressed in this
/// unit to the base unit of its [Dimension] (meter, second, radian, or a
/// combination of those for compound rates).
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Canonical name, as spelled in the definition table
    pub name: String,
    /// Short symbol, if the table declared one
    pub symbol: Option<String>,
    /// Alternate spellings
    pub aliases: Vec<String>,
    /// Dimensionality
    pub dimension: Dimension,
    /// Conversion factor towards the base unit of [Self::dimension]
    pub factor: f64,
}

/// Process-wide unit table, built once at startup from [UnitRegistry::builtin]
/// plus optional extension tables, then only read.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    index: HashMap<String, usize>,
}

impl UnitRegistry {
    /// Builds an empty registry. Most callers want [Self::builtin].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the registry from the built-in definition table.
    pub fn builtin() -> Result<Self, Error> {
        let mut registry = Self::empty();
        registry.load_table(BASE_TABLE)?;
        Ok(registry)
    }

    /// Loads one definition table, line oriented:
    ///
    /// ```text
    /// canonical_name = definition [= symbol [= alias ...]]
    /// ```
    ///
    /// where `definition` is either a base dimension marker (`[length]`,
    /// `[time]`, `[angle]`, `[]` for dimensionless) or a whitespace
    /// separated expression of numbers and previously defined unit names,
    /// combined with `*` and `/` (`1000 * meter`, `unit / 100`,
    /// `milliarcsecond / day`). Blank lines and `#` comments are skipped.
    /// Later definitions shadow earlier ones.
    pub fn load_table(&mut self, table: &str) -> Result<(), Error> {
        let mut defined = 0;

        for line in table.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.define(line)?;
            defined += 1;
        }

        debug!("loaded {} unit definitions", defined);
        Ok(())
    }

    /// Registers a single `name = definition [= symbol [= alias ...]]` line.
    pub fn define(&mut self, line: &str) -> Result<(), Error> {
        let mut fields = line.split('=').map(str::trim);

        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::InvalidUnitDefinition(line.to_string()))?;

        let definition = fields
            .next()
            .ok_or_else(|| Error::InvalidUnitDefinition(line.to_string()))?;

        let (dimension, factor) = self.parse_definition(definition)?;

        let symbol = fields.next().map(str::to_string);
        let aliases: Vec<String> = fields.map(str::to_string).collect();

        let unit = Unit {
            name: name.to_string(),
            symbol,
            aliases,
            dimension,
            factor,
        };

        let index = self.units.len();
        self.index.insert(unit.name.clone(), index);

        if let Some(symbol) = &unit.symbol {
            self.index.insert(symbol.clone(), index);
        }

        for alias in &unit.aliases {
            self.index.insert(alias.clone(), index);
        }

        self.units.push(unit);
        Ok(())
    }

    /// Evaluates a definition expression into (dimension, factor).
    fn parse_definition(&self, definition: &str) -> Result<(Dimension, f64), Error> {
        // base dimension markers
        match definition {
            "[length]" => return Ok((Dimension::LENGTH, 1.0)),
            "[time]" => return Ok((Dimension::TIME, 1.0)),
            "[angle]" => return Ok((Dimension::ANGLE, 1.0)),
            "[]" => return Ok((Dimension::DIMENSIONLESS, 1.0)),
            _ => {},
        }

        if definition.is_empty() || definition.starts_with('[') {
            return Err(Error::InvalidUnitDefinition(definition.to_string()));
        }

        let mut dimension = Dimension::DIMENSIONLESS;
        let mut factor = 1.0;
        let mut divide = false;

        for token in definition.split_whitespace() {
            match token {
                "*" => divide = false,
                "/" => divide = true,
                operand => {
                    let (dim, f) = if let Ok(value) = operand.parse::<f64>() {
                        (Dimension::DIMENSIONLESS, value)
                    } else {
                        let unit = self.get(operand)?;
                        (unit.dimension, unit.factor)
                    };

                    if divide {
                        dimension = dimension.divided(dim);
                        factor /= f;
                    } else {
                        dimension = dimension.multiplied(dim);
                        factor *= f;
                    }

                    divide = false;
                },
            }
        }

        Ok((dimension, factor))
    }

    /// Resolves a [Unit] by canonical name, symbol or alias (exact match).
    pub fn get(&self, name: &str) -> Result<&Unit, Error> {
        self.index
            .get(name)
            .map(|index| &self.units[*index])
            .ok_or_else(|| Error::UnknownUnit(name.to_string()))
    }

    /// Multiplicative factor converting quantities expressed in `from`
    /// to quantities expressed in `to`. Both must share one [Dimension].
    pub fn factor(&self, from: &str, to: &str) -> Result<f64, Error> {
        let from = self.get(from)?;
        let to = self.get(to)?;

        if from.dimension != to.dimension {
            return Err(Error::IncompatibleDimensions {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }

        Ok(from.factor / to.factor)
    }

    /// Converts `value` expressed in `from` into `to`.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, Error> {
        Ok(value * self.factor(from, to)?)
    }

    /// Number of registered units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::{Dimension, UnitRegistry};
    use crate::error::Error;

    #[test]
    fn ratio_units() {
        let registry = UnitRegistry::builtin().unwrap();

        // 1 * percent == 0.01 * unit
        assert_eq!(registry.convert(1.0, "percent", "unit").unwrap(), 0.01);
        assert_eq!(registry.convert(1.0, "%", "unit").unwrap(), 0.01);
    }

    #[test]
    fn length_chain() {
        let registry = UnitRegistry::builtin().unwrap();

        // 1 * Megameter == 1000 * kilometer
        assert_eq!(registry.convert(1.0, "Megameter", "kilometer").unwrap(), 1000.0);
        assert_eq!(registry.convert(1.0, "Mm", "m").unwrap(), 1.0E6);
        assert_eq!(registry.convert(2500.0, "mm", "meter").unwrap(), 2.5);
    }

    #[test]
    fn angle_chain() {
        let registry = UnitRegistry::builtin().unwrap();

        let rad = registry.convert(180.0, "degree", "radian").unwrap();
        assert!((rad - std::f64::consts::PI).abs() < 1.0E-12);

        // 1 degree = 3.6e6 mas
        let mas = registry.convert(1.0, "deg", "mas").unwrap();
        assert!((mas - 3.6E6).abs() < 1.0E-6);
    }

    #[test]
    fn compound_rates() {
        let registry = UnitRegistry::builtin().unwrap();

        let unit = registry.get("milliarcsecond per day").unwrap();
        assert_eq!(
            unit.dimension,
            Dimension {
                length: 0,
                time: -1,
                angle: 1,
            },
        );

        // mas/yr -> rad/yr is the plate catalog conversion
        let rad_yr = registry
            .convert(1000.0, "milliarcsecond per year", "radian per year")
            .unwrap();
        assert!((rad_yr - 1.0_f64.to_radians() / 3600.0).abs() < 1.0E-15);
    }

    #[test]
    fn dimension_checking() {
        let registry = UnitRegistry::builtin().unwrap();

        assert!(matches!(
            registry.convert(1.0, "meter", "second"),
            Err(Error::IncompatibleDimensions { .. }),
        ));

        assert!(matches!(
            registry.convert(1.0, "meter", "furlong"),
            Err(Error::UnknownUnit(_)),
        ));
    }

    #[test]
    fn extension_table() {
        let mut registry = UnitRegistry::builtin().unwrap();

        registry
            .load_table(
                "# custom\n\
                 furlong = 201.168 * meter = fur\n\
                 fortnight = 2 * week\n",
            )
            .unwrap();

        let m = registry.convert(1.0, "furlong", "meter").unwrap();
        assert!((m - 201.168).abs() < 1.0E-12);

        let days = registry.convert(1.0, "fortnight", "day").unwrap();
        assert!((days - 14.0).abs() < 1.0E-12);
    }

    #[test]
    fn malformed_definitions() {
        let mut registry = UnitRegistry::builtin().unwrap();

        assert!(matches!(
            registry.define("orphan"),
            Err(Error::InvalidUnitDefinition(_)),
        ));

        assert!(matches!(
            registry.define("bad = [mass]"),
            Err(Error::InvalidUnitDefinition(_)),
        ));

        assert!(matches!(
            registry.define("bad = 2 * undefined_unit"),
            Err(Error::UnknownUnit(_)),
        ));
    }
}
