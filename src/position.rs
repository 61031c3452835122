use nalgebra::Vector3;

use crate::{
    ellipsoid::Ellipsoid,
    error::Error,
    transform::{geocentric_to_geodetic, geodetic_to_geocentric, GeodeticPosition},
};

/// One point maintained under both geocentric (ECEF) and geodetic
/// representations, with respect to one reference [Ellipsoid].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    ecef_m: Vector3<f64>,
    /// Geodetic coordinates
    geodetic: GeodeticPosition,
    /// Reference [Ellipsoid]
    ellipsoid: Ellipsoid,
}

impl Position {
    /// Builds new [Position] from ECEF coordinates expressed in meters,
    /// on given reference [Ellipsoid].
    pub fn from_ecef_m(ecef_m: Vector3<f64>, ellipsoid: Ellipsoid) -> Result<Self, Error> {
        let geodetic = geocentric_to_geodetic(&ecef_m, &ellipsoid)?;

        Ok(Self {
            ecef_m,
            geodetic,
            ellipsoid,
        })
    }

    /// Builds new [Position] from [GeodeticPosition] on given reference
    /// [Ellipsoid].
    pub fn from_geodetic(geodetic: GeodeticPosition, ellipsoid: Ellipsoid) -> Result<Self, Error> {
        let ecef_m = geodetic_to_geocentric(&geodetic, &ellipsoid)?;

        Ok(Self {
            ecef_m,
            geodetic,
            ellipsoid,
        })
    }

    /// Returns ECEF coordinates, in meters.
    pub fn ecef_m(&self) -> Vector3<f64> {
        self.ecef_m
    }

    /// Returns geodetic coordinates.
    pub fn geodetic(&self) -> GeodeticPosition {
        self.geodetic
    }

    /// Returns the reference [Ellipsoid].
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }
}

#[cfg(test)]
mod test {
    use super::Position;
    use crate::{ellipsoid::Ellipsoid, transform::GeodeticPosition};
    use nalgebra::Vector3;

    #[test]
    fn representations_are_coupled() {
        let ecef_m = Vector3::new(4696989.6880, 723994.1970, 4239678.3040);
        let position = Position::from_ecef_m(ecef_m, Ellipsoid::WGS84).unwrap();

        let rebuilt = Position::from_geodetic(position.geodetic(), Ellipsoid::WGS84).unwrap();
        assert!((rebuilt.ecef_m() - ecef_m).norm() < 1.0E-6);

        // mid-latitude European site
        assert!(position.geodetic().latitude_deg() > 40.0);
        assert!(position.geodetic().latitude_deg() < 50.0);
    }

    #[test]
    fn geocenter_rejected() {
        assert!(Position::from_ecef_m(Vector3::zeros(), Ellipsoid::GRS80).is_err());
    }
}
