#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Reference [Ellipsoid], defined by its semi-major axis and flattening.
/// The catalog is fixed at process start: grab one of the associated
/// constants, or resolve one by name with [Ellipsoid::from_name].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// Catalog name
    pub name: &'static str,
    /// Semi-major (equatorial) axis, in meters
    pub semi_major_axis_m: f64,
    /// Flattening
    pub flattening: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984
    pub const WGS84: Self = Self {
        name: "WGS84",
        semi_major_axis_m: 6378137.0,
        flattening: 1.0 / 298.257223563,
    };

    /// Geodetic Reference System 1980
    pub const GRS80: Self = Self {
        name: "GRS80",
        semi_major_axis_m: 6378137.0,
        flattening: 1.0 / 298.257222101,
    };

    /// IERS Conventions (2003)
    pub const IERS2003: Self = Self {
        name: "IERS2003",
        semi_major_axis_m: 6378136.6,
        flattening: 1.0 / 298.25642,
    };

    /// IERS Conventions (2010)
    pub const IERS2010: Self = Self {
        name: "IERS2010",
        semi_major_axis_m: 6378136.6,
        flattening: 1.0 / 298.25642,
    };

    /// DORIS processing ellipsoid
    pub const DORIS: Self = Self {
        name: "DORIS",
        semi_major_axis_m: 6378136.0,
        flattening: 1.0 / 298.2572,
    };

    /// Complete catalog
    pub const CATALOG: [Self; 5] = [
        Self::WGS84,
        Self::GRS80,
        Self::IERS2003,
        Self::IERS2010,
        Self::DORIS,
    ];

    /// Resolves catalog [Ellipsoid] by name (case insensitive).
    pub fn from_name(name: &str) -> Result<Self, Error> {
        Self::CATALOG
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownEllipsoid(name.to_string()))
    }

    /// Semi-minor (polar) axis, in meters
    pub fn semi_minor_axis_m(&self) -> f64 {
        self.semi_major_axis_m * (1.0 - self.flattening)
    }

    /// First eccentricity squared: e² = f (2 - f)
    pub fn first_eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Second eccentricity squared: e'² = e² / (1 - e²)
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.first_eccentricity_squared();
        e2 / (1.0 - e2)
    }

    /// Prime vertical radius of curvature at given latitude (radians),
    /// in meters.
    pub fn prime_vertical_radius_m(&self, latitude_rad: f64) -> f64 {
        let e2 = self.first_eccentricity_squared();
        let sin_lat = latitude_rad.sin();
        self.semi_major_axis_m / (1.0 - e2 * sin_lat.powi(2)).sqrt()
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.name)
    }
}

#[cfg(test)]
mod test {
    use super::Ellipsoid;
    use crate::error::Error;

    #[test]
    fn catalog_lookup() {
        for e in Ellipsoid::CATALOG {
            assert_eq!(Ellipsoid::from_name(e.name), Ok(e));
        }

        assert_eq!(Ellipsoid::from_name("wgs84"), Ok(Ellipsoid::WGS84));
        assert_eq!(Ellipsoid::from_name(" GRS80 "), Ok(Ellipsoid::GRS80));

        assert_eq!(
            Ellipsoid::from_name("WGS72"),
            Err(Error::UnknownEllipsoid("WGS72".to_string())),
        );
    }

    #[test]
    fn derived_quantities() {
        let wgs84 = Ellipsoid::WGS84;
        assert!((wgs84.semi_minor_axis_m() - 6356752.314245).abs() < 1.0E-5);
        assert!((wgs84.first_eccentricity_squared() - 6.69437999014E-3).abs() < 1.0E-12);

        // prime vertical radius: a at equator, a²/b at the pole
        assert!((wgs84.prime_vertical_radius_m(0.0) - wgs84.semi_major_axis_m).abs() < 1.0E-9);

        let polar = wgs84.semi_major_axis_m.powi(2) / wgs84.semi_minor_axis_m();
        assert!((wgs84.prime_vertical_radius_m(std::f64::consts::FRAC_PI_2) - polar).abs() < 1.0E-3);
    }
}
