use log::trace;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ellipsoid::Ellipsoid, error::Error};

/// Geocentric to geodetic iteration budget. Bowring's initial guess already
/// lands within micrometers for Earth-bound points, the refinement loop
/// terminates in 2 or 3 rounds.
const MAX_ITERATIONS: usize = 10;

/// Convergence criteria: height within 0.1 mm
const HEIGHT_TOLERANCE_M: f64 = 1.0E-4;

/// Convergence criteria: latitude within 1e-12 rad (sub micrometer on ground)
const LATITUDE_TOLERANCE_RAD: f64 = 1.0E-12;

/// Geodetic coordinates with respect to a reference [Ellipsoid].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude, in radians
    pub latitude_rad: f64,
    /// Longitude, in radians
    pub longitude_rad: f64,
    /// Height above the ellipsoid, in meters
    pub height_m: f64,
}

impl GeodeticPosition {
    /// Builds [GeodeticPosition] from latitude and longitude in radians,
    /// height above ellipsoid in meters.
    pub fn new(latitude_rad: f64, longitude_rad: f64, height_m: f64) -> Self {
        Self {
            latitude_rad,
            longitude_rad,
            height_m,
        }
    }

    /// Builds [GeodeticPosition] from latitude and longitude in degrees,
    /// height above ellipsoid in meters.
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Self {
        Self {
            latitude_rad: latitude_deg.to_radians(),
            longitude_rad: longitude_deg.to_radians(),
            height_m,
        }
    }

    /// Latitude in degrees
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_rad.to_degrees()
    }

    /// Longitude in degrees
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_rad.to_degrees()
    }
}

impl std::fmt::Display for GeodeticPosition {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            fmt,
            "lat={:.8}° lon={:.8}° h={:.4}m",
            self.latitude_deg(),
            self.longitude_deg(),
            self.height_m,
        )
    }
}

/// Converts [GeodeticPosition] to geocentric cartesian coordinates (ECEF,
/// meters), with respect to the same [Ellipsoid]. Closed form, exact within
/// IEEE double precision. Only fails on non finite input.
pub fn geodetic_to_geocentric(
    geodetic: &GeodeticPosition,
    ellipsoid: &Ellipsoid,
) -> Result<Vector3<f64>, Error> {
    let (lat, lon, h) = (
        geodetic.latitude_rad,
        geodetic.longitude_rad,
        geodetic.height_m,
    );

    if !lat.is_finite() || !lon.is_finite() || !h.is_finite() {
        return Err(Error::NonFiniteInput);
    }

    let e2 = ellipsoid.first_eccentricity_squared();
    let nu = ellipsoid.prime_vertical_radius_m(lat);

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    Ok(Vector3::new(
        (nu + h) * cos_lat * cos_lon,
        (nu + h) * cos_lat * sin_lon,
        (nu * (1.0 - e2) + h) * sin_lat,
    ))
}

/// Converts geocentric cartesian coordinates (ECEF, meters) to
/// [GeodeticPosition] on given [Ellipsoid]. Iterative (Bowring initial
/// guess, fixed point refinement), converges to sub-millimeter height
/// accuracy. On the polar axis (x=y=0) longitude is reported as 0,
/// the geocenter itself has no geodetic equivalent and errors out with
/// [Error::GeocenterSingularity].
pub fn geocentric_to_geodetic(
    ecef_m: &Vector3<f64>,
    ellipsoid: &Ellipsoid,
) -> Result<GeodeticPosition, Error> {
    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);

    if !x.is_finite() || !y.is_finite() || !z.is_finite() {
        return Err(Error::NonFiniteInput);
    }

    let a = ellipsoid.semi_major_axis_m;
    let b = ellipsoid.semi_minor_axis_m();
    let e2 = ellipsoid.first_eccentricity_squared();
    let ep2 = ellipsoid.second_eccentricity_squared();

    let p = (x.powi(2) + y.powi(2)).sqrt();

    if p == 0.0 {
        if z == 0.0 {
            return Err(Error::GeocenterSingularity);
        }

        // polar axis: longitude undefined, reported as 0
        return Ok(GeodeticPosition {
            latitude_rad: std::f64::consts::FRAC_PI_2.copysign(z),
            longitude_rad: 0.0,
            height_m: z.abs() - b,
        });
    }

    let longitude_rad = y.atan2(x);

    // Bowring's starting value
    let u = (z * a).atan2(p * b);
    let (sin_u, cos_u) = u.sin_cos();
    let mut latitude_rad =
        (z + ep2 * b * sin_u.powi(3)).atan2(p - e2 * a * cos_u.powi(3));

    let mut height_m = 0.0;

    for iteration in 0..MAX_ITERATIONS {
        let nu = ellipsoid.prime_vertical_radius_m(latitude_rad);
        let (sin_lat, cos_lat) = latitude_rad.sin_cos();

        let new_height_m = if cos_lat.abs() > sin_lat.abs() {
            p / cos_lat - nu
        } else {
            z / sin_lat - nu * (1.0 - e2)
        };

        let new_latitude_rad = z.atan2(p * (1.0 - e2 * nu / (nu + new_height_m)));

        let converged = (new_height_m - height_m).abs() < HEIGHT_TOLERANCE_M
            && (new_latitude_rad - latitude_rad).abs() < LATITUDE_TOLERANCE_RAD;

        latitude_rad = new_latitude_rad;
        height_m = new_height_m;

        if converged {
            trace!("geodetic conversion converged in {} iterations", iteration + 1);

            return Ok(GeodeticPosition {
                latitude_rad,
                longitude_rad,
                height_m,
            });
        }
    }

    Err(Error::NonConvergentGeodetic(MAX_ITERATIONS))
}

#[cfg(test)]
mod test {
    use super::{geocentric_to_geodetic, geodetic_to_geocentric, GeodeticPosition};
    use crate::{ellipsoid::Ellipsoid, error::Error};
    use nalgebra::Vector3;

    #[test]
    fn equator_and_pole() {
        let wgs84 = Ellipsoid::WGS84;

        // equator, prime meridian, on the ellipsoid surface
        let geodetic = GeodeticPosition::new(0.0, 0.0, 0.0);
        let ecef = geodetic_to_geocentric(&geodetic, &wgs84).unwrap();
        assert!((ecef[0] - wgs84.semi_major_axis_m).abs() < 1.0E-9);
        assert!(ecef[1].abs() < 1.0E-9);
        assert!(ecef[2].abs() < 1.0E-9);

        // north pole, 100m above the surface
        let geodetic = GeodeticPosition::from_degrees(90.0, 0.0, 100.0);
        let ecef = geodetic_to_geocentric(&geodetic, &wgs84).unwrap();
        assert!(ecef[0].abs() < 1.0E-6);
        assert!(ecef[1].abs() < 1.0E-6);
        assert!((ecef[2] - wgs84.semi_minor_axis_m() - 100.0).abs() < 1.0E-6);
    }

    #[test]
    fn polar_axis_longitude_convention() {
        let wgs84 = Ellipsoid::WGS84;
        let b = wgs84.semi_minor_axis_m();

        let geodetic =
            geocentric_to_geodetic(&Vector3::new(0.0, 0.0, b + 50.0), &wgs84).unwrap();
        assert_eq!(geodetic.longitude_rad, 0.0);
        assert!((geodetic.latitude_deg() - 90.0).abs() < 1.0E-12);
        assert!((geodetic.height_m - 50.0).abs() < 1.0E-6);

        let geodetic =
            geocentric_to_geodetic(&Vector3::new(0.0, 0.0, -b), &wgs84).unwrap();
        assert!((geodetic.latitude_deg() + 90.0).abs() < 1.0E-12);
        assert!(geodetic.height_m.abs() < 1.0E-6);
    }

    #[test]
    fn geocenter_is_singular() {
        assert_eq!(
            geocentric_to_geodetic(&Vector3::zeros(), &Ellipsoid::WGS84),
            Err(Error::GeocenterSingularity),
        );
    }

    #[test]
    fn non_finite_input() {
        let wgs84 = Ellipsoid::WGS84;

        assert_eq!(
            geodetic_to_geocentric(&GeodeticPosition::new(f64::NAN, 0.0, 0.0), &wgs84),
            Err(Error::NonFiniteInput),
        );

        assert_eq!(
            geocentric_to_geodetic(&Vector3::new(f64::INFINITY, 0.0, 0.0), &wgs84),
            Err(Error::NonFiniteInput),
        );
    }

    #[test]
    fn round_trip_catalog() {
        // |lat| < 90°, all catalog ellipsoids: recovered within
        // 1e-9 rad / 1e-6 m
        let latitudes_deg = [-89.9, -60.0, -30.0, -5.0, 0.0, 12.5, 45.0, 75.0, 89.9];
        let longitudes_deg = [-179.5, -90.0, -45.0, 0.0, 60.0, 120.0, 179.5];
        let heights_m = [-500.0, 0.0, 250.0, 8848.0, 20200.0E3];

        for ellipsoid in Ellipsoid::CATALOG {
            for lat in latitudes_deg {
                for lon in longitudes_deg {
                    for h in heights_m {
                        let geodetic = GeodeticPosition::from_degrees(lat, lon, h);
                        let ecef = geodetic_to_geocentric(&geodetic, &ellipsoid).unwrap();
                        let recovered = geocentric_to_geodetic(&ecef, &ellipsoid).unwrap();

                        assert!(
                            (recovered.latitude_rad - geodetic.latitude_rad).abs() < 1.0E-9,
                            "latitude drift on {} at ({}, {}, {})",
                            ellipsoid,
                            lat,
                            lon,
                            h,
                        );
                        assert!(
                            (recovered.longitude_rad - geodetic.longitude_rad).abs() < 1.0E-9,
                            "longitude drift on {} at ({}, {}, {})",
                            ellipsoid,
                            lat,
                            lon,
                            h,
                        );
                        assert!(
                            (recovered.height_m - geodetic.height_m).abs() < 1.0E-6,
                            "height drift on {} at ({}, {}, {})",
                            ellipsoid,
                            lat,
                            lon,
                            h,
                        );
                    }
                }
            }
        }
    }
}
