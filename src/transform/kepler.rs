use hifitime::{Duration, Epoch};
use log::trace;
use nalgebra::{Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::EARTH_GRAVITATION_MU_M3_S2, error::Error};

/// Kepler equation convergence criteria (radians)
const KEPLER_TOLERANCE_RAD: f64 = 1.0E-12;

/// Kepler equation iteration budget
const KEPLER_MAX_ITERATIONS: usize = 50;

/// Eccentricity below this describes a circular orbit: the argument of
/// perigee is undefined and reported as 0, anomalies are measured from
/// the ascending node.
const CIRCULAR_THRESHOLD: f64 = 1.0E-11;

/// Relative node vector magnitude below this describes an equatorial
/// orbit: the right ascension of the ascending node is undefined and
/// reported as 0, the node direction is taken along +X.
const EQUATORIAL_THRESHOLD: f64 = 1.0E-11;

/// Minimal specific angular momentum (m²/s) below which the state is
/// rectilinear and defines no orbital plane.
const MIN_ANGULAR_MOMENTUM_M2_S: f64 = 1.0;

/// Classical (Keplerian) orbital elements of an elliptical orbit,
/// with the mean anomaly referenced to [Self::epoch].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerianElements {
    /// Reference [Epoch] of [Self::mean_anomaly_rad]
    pub epoch: Epoch,
    /// Semi-major axis (in meters)
    pub semi_major_axis_m: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination (in radians)
    pub inclination_rad: f64,
    /// Right ascension of the ascending node (in radians)
    pub raan_rad: f64,
    /// Argument of perigee (in radians)
    pub arg_perigee_rad: f64,
    /// Mean anomaly at [Self::epoch] (in radians)
    pub mean_anomaly_rad: f64,
}

impl KeplerianElements {
    /// Mean motion (in radians/s)
    pub fn mean_motion_rad_s(&self) -> f64 {
        (EARTH_GRAVITATION_MU_M3_S2 / self.semi_major_axis_m.powi(3)).sqrt()
    }

    /// Orbital period
    pub fn orbital_period(&self) -> Duration {
        Duration::from_seconds(2.0 * std::f64::consts::PI / self.mean_motion_rad_s())
    }

    /// Mean anomaly propagated to `t` (in radians, [0, 2π))
    pub fn mean_anomaly_at(&self, t: Epoch) -> f64 {
        let dt_s = (t - self.epoch).to_seconds();
        normalize_two_pi(self.mean_anomaly_rad + self.mean_motion_rad_s() * dt_s)
    }

    /// Eccentric anomaly at `t` (in radians), solving Kepler's equation
    /// by Newton iteration. Fails with [Error::NonConvergentAnomaly] if
    /// the iteration budget is exceeded.
    pub fn eccentric_anomaly_at(&self, t: Epoch) -> Result<f64, Error> {
        let m = self.mean_anomaly_at(t);
        let e = self.eccentricity;

        let mut anomaly = if e > 0.8 { std::f64::consts::PI } else { m };

        for iteration in 0..KEPLER_MAX_ITERATIONS {
            let delta = (anomaly - e * anomaly.sin() - m) / (1.0 - e * anomaly.cos());
            anomaly -= delta;

            if delta.abs() < KEPLER_TOLERANCE_RAD {
                trace!("kepler equation solved in {} iterations", iteration + 1);
                return Ok(anomaly);
            }
        }

        Err(Error::NonConvergentAnomaly(KEPLER_MAX_ITERATIONS))
    }

    /// True anomaly at `t` (in radians, [0, 2π))
    pub fn true_anomaly_at(&self, t: Epoch) -> Result<f64, Error> {
        let e = self.eccentricity;
        let anomaly = self.eccentric_anomaly_at(t)?;

        Ok(normalize_two_pi(
            ((1.0 - e.powi(2)).sqrt() * anomaly.sin()).atan2(anomaly.cos() - e),
        ))
    }

    fn validate(&self) -> Result<(), Error> {
        let finite = self.semi_major_axis_m.is_finite()
            && self.eccentricity.is_finite()
            && self.inclination_rad.is_finite()
            && self.raan_rad.is_finite()
            && self.arg_perigee_rad.is_finite()
            && self.mean_anomaly_rad.is_finite();

        if !finite {
            return Err(Error::NonFiniteInput);
        }

        // elliptical orbits only
        if self.semi_major_axis_m <= 0.0 || !(0.0..1.0).contains(&self.eccentricity) {
            return Err(Error::DegenerateOrbit);
        }

        Ok(())
    }
}

/// Converts [KeplerianElements] to the cartesian (position, velocity)
/// orbital state at [Epoch] `t`, in the geocentric frame (meters, m/s).
/// Solves Kepler's equation, maps through the perifocal frame, then
/// rotates by argument of perigee, inclination and RAAN.
pub fn kepler_to_trs(
    elements: &KeplerianElements,
    t: Epoch,
) -> Result<(Vector3<f64>, Vector3<f64>), Error> {
    elements.validate()?;

    let a = elements.semi_major_axis_m;
    let e = elements.eccentricity;

    let anomaly = elements.eccentric_anomaly_at(t)?;
    let (sin_e, cos_e) = anomaly.sin_cos();

    let radius_m = a * (1.0 - e * cos_e);

    let position_pf_m = Vector3::new(a * (cos_e - e), a * (1.0 - e.powi(2)).sqrt() * sin_e, 0.0);

    let velocity_scale = (EARTH_GRAVITATION_MU_M3_S2 * a).sqrt() / radius_m;

    let velocity_pf_m_s = Vector3::new(
        -velocity_scale * sin_e,
        velocity_scale * (1.0 - e.powi(2)).sqrt() * cos_e,
        0.0,
    );

    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.raan_rad)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination_rad)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), elements.arg_perigee_rad);

    Ok((rotation * position_pf_m, rotation * velocity_pf_m_s))
}

/// Derives [KeplerianElements] from a cartesian orbital state (meters,
/// m/s) at [Epoch] `t`, through the angular momentum and eccentricity
/// vectors.
///
/// Degenerate geometries follow fixed conventions instead of erroring:
/// circular orbits report an argument of perigee of 0 (anomalies counted
/// from the node), equatorial orbits report a RAAN of 0 (node taken
/// along +X). Rectilinear or non-elliptical states fail with
/// [Error::DegenerateOrbit].
pub fn trs_to_kepler(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
    t: Epoch,
) -> Result<KeplerianElements, Error> {
    if !position_m.iter().chain(velocity_m_s.iter()).all(|c| c.is_finite()) {
        return Err(Error::NonFiniteInput);
    }

    let mu = EARTH_GRAVITATION_MU_M3_S2;

    let radius_m = position_m.norm();
    let speed_m_s = velocity_m_s.norm();

    let momentum = position_m.cross(velocity_m_s);

    if radius_m == 0.0 || momentum.norm() < MIN_ANGULAR_MOMENTUM_M2_S {
        return Err(Error::DegenerateOrbit);
    }

    // specific orbital energy: elliptical states only
    let energy = speed_m_s.powi(2) / 2.0 - mu / radius_m;

    if energy >= 0.0 {
        return Err(Error::DegenerateOrbit);
    }

    let semi_major_axis_m = -mu / (2.0 * energy);

    let eccentricity_vec = ((speed_m_s.powi(2) - mu / radius_m) * position_m
        - position_m.dot(velocity_m_s) * velocity_m_s)
        / mu;

    let eccentricity = eccentricity_vec.norm();

    let momentum_hat = momentum.normalize();

    let inclination_rad = (momentum_hat[2]).clamp(-1.0, 1.0).acos();

    // node line: +X by convention on equatorial orbits
    let node = Vector3::new(-momentum[1], momentum[0], 0.0);
    let equatorial = node.norm() < EQUATORIAL_THRESHOLD * momentum.norm();
    let circular = eccentricity < CIRCULAR_THRESHOLD;

    let (raan_rad, node_hat) = if equatorial {
        (0.0, Vector3::x())
    } else {
        (normalize_two_pi(node[1].atan2(node[0])), node.normalize())
    };

    let (arg_perigee_rad, true_anomaly_rad) = if circular {
        // anomaly from the node line
        let anomaly = node_hat
            .cross(position_m)
            .dot(&momentum_hat)
            .atan2(node_hat.dot(position_m));

        (0.0, normalize_two_pi(anomaly))
    } else {
        let perigee = node_hat
            .cross(&eccentricity_vec)
            .dot(&momentum_hat)
            .atan2(node_hat.dot(&eccentricity_vec));

        let anomaly = eccentricity_vec
            .cross(position_m)
            .dot(&momentum_hat)
            .atan2(eccentricity_vec.dot(position_m));

        (normalize_two_pi(perigee), normalize_two_pi(anomaly))
    };

    // eccentric then mean anomaly
    let (sin_nu, cos_nu) = true_anomaly_rad.sin_cos();

    let eccentric_anomaly_rad = ((1.0 - eccentricity.powi(2)).sqrt() * sin_nu)
        .atan2(eccentricity + cos_nu);

    let mean_anomaly_rad = normalize_two_pi(
        eccentric_anomaly_rad - eccentricity * eccentric_anomaly_rad.sin(),
    );

    Ok(KeplerianElements {
        epoch: t,
        semi_major_axis_m,
        eccentricity,
        inclination_rad,
        raan_rad,
        arg_perigee_rad,
        mean_anomaly_rad,
    })
}

/// Wraps an angle into [0, 2π)
fn normalize_two_pi(angle_rad: f64) -> f64 {
    let wrapped = angle_rad % (2.0 * std::f64::consts::PI);

    if wrapped < 0.0 {
        wrapped + 2.0 * std::f64::consts::PI
    } else {
        wrapped
    }
}
