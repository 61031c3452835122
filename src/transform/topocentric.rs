use nalgebra::{Matrix3, Vector3};

use crate::{error::Error, transform::GeodeticPosition};

/// Two orbital states closer than this (in |r x v|, m²/s) do not define
/// an orbital plane: the ACR frame is degenerate.
const MIN_ANGULAR_MOMENTUM_M2_S: f64 = 1.0;

/// Rotation matrix from geocentric (TRS) to topocentric East-North-Up
/// deltas, at the reference point of given latitude and longitude
/// (radians). Its transpose performs the reverse rotation.
pub fn trs_to_enu_rotation(latitude_rad: f64, longitude_rad: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = latitude_rad.sin_cos();
    let (sin_lon, cos_lon) = longitude_rad.sin_cos();

    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Rotates a small TRS coordinate delta (meters) into the East-North-Up
/// frame attached to `reference`.
pub fn trs_to_enu(reference: &GeodeticPosition, delta_trs_m: &Vector3<f64>) -> Vector3<f64> {
    trs_to_enu_rotation(reference.latitude_rad, reference.longitude_rad) * delta_trs_m
}

/// Rotates an East-North-Up delta (meters) at `reference` back into the
/// geocentric TRS frame.
pub fn enu_to_trs(reference: &GeodeticPosition, delta_enu_m: &Vector3<f64>) -> Vector3<f64> {
    trs_to_enu_rotation(reference.latitude_rad, reference.longitude_rad).transpose() * delta_enu_m
}

/// Conjugates a TRS covariance matrix into the East-North-Up frame at
/// `reference`: Σ' = R Σ Rᵀ.
pub fn sigma_trs_to_enu(reference: &GeodeticPosition, sigma_trs: &Matrix3<f64>) -> Matrix3<f64> {
    let rotation = trs_to_enu_rotation(reference.latitude_rad, reference.longitude_rad);
    rotation * sigma_trs * rotation.transpose()
}

/// Rotation matrix from TRS to the Along-track / Cross-track / Radial
/// frame of the orbital state (position in meters, velocity in m/s).
/// Radial follows the position vector, cross-track the orbital momentum,
/// along-track completes the right-handed triad.
pub fn trs_to_acr_rotation(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
) -> Result<Matrix3<f64>, Error> {
    if !position_m.iter().chain(velocity_m_s.iter()).all(|c| c.is_finite()) {
        return Err(Error::NonFiniteInput);
    }

    let momentum = position_m.cross(velocity_m_s);

    if position_m.norm() == 0.0 || momentum.norm() < MIN_ANGULAR_MOMENTUM_M2_S {
        return Err(Error::DegenerateOrbit);
    }

    let radial = position_m.normalize();
    let cross = momentum.normalize();
    let along = cross.cross(&radial);

    Ok(Matrix3::from_rows(&[
        along.transpose(),
        cross.transpose(),
        radial.transpose(),
    ]))
}

/// Rotates a TRS position delta (meters) into the ACR frame of the
/// reference orbital state.
pub fn trs_to_acr(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
    delta_trs_m: &Vector3<f64>,
) -> Result<Vector3<f64>, Error> {
    Ok(trs_to_acr_rotation(position_m, velocity_m_s)? * delta_trs_m)
}

/// Rotates an ACR position delta (meters) back into TRS.
pub fn acr_to_trs(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
    delta_acr_m: &Vector3<f64>,
) -> Result<Vector3<f64>, Error> {
    Ok(trs_to_acr_rotation(position_m, velocity_m_s)?.transpose() * delta_acr_m)
}

/// Rotates a TRS (position, velocity) delta pair into the ACR frame of the
/// reference orbital state. The velocity transform carries the rotation
/// rate of the frame itself: δv' = R (δv - ω × δr), with
/// ω = (r × v) / |r|².
pub fn trs_to_acr_pos_vel(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
    delta_pos_trs_m: &Vector3<f64>,
    delta_vel_trs_m_s: &Vector3<f64>,
) -> Result<(Vector3<f64>, Vector3<f64>), Error> {
    let rotation = trs_to_acr_rotation(position_m, velocity_m_s)?;
    let omega = position_m.cross(velocity_m_s) / position_m.norm_squared();

    Ok((
        rotation * delta_pos_trs_m,
        rotation * (delta_vel_trs_m_s - omega.cross(delta_pos_trs_m)),
    ))
}

/// Rotates an ACR (position, velocity) delta pair back into TRS,
/// reinstating the frame rotation term removed by [trs_to_acr_pos_vel].
pub fn acr_to_trs_pos_vel(
    position_m: &Vector3<f64>,
    velocity_m_s: &Vector3<f64>,
    delta_pos_acr_m: &Vector3<f64>,
    delta_vel_acr_m_s: &Vector3<f64>,
) -> Result<(Vector3<f64>, Vector3<f64>), Error> {
    let rotation = trs_to_acr_rotation(position_m, velocity_m_s)?;
    let omega = position_m.cross(velocity_m_s) / position_m.norm_squared();

    let delta_pos_trs_m = rotation.transpose() * delta_pos_acr_m;

    Ok((
        delta_pos_trs_m,
        rotation.transpose() * delta_vel_acr_m_s + omega.cross(&delta_pos_trs_m),
    ))
}
