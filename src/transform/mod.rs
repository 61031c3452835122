//! Coordinate transformations: geodetic ⇄ geocentric, local topocentric
//! (ENU) and orbital (ACR) frames, Keplerian ⇄ Cartesian orbital states.
mod geodetic;
mod kepler;
mod topocentric;

pub use geodetic::{geocentric_to_geodetic, geodetic_to_geocentric, GeodeticPosition};

pub use kepler::{kepler_to_trs, trs_to_kepler, KeplerianElements};

pub use topocentric::{
    acr_to_trs, acr_to_trs_pos_vel, enu_to_trs, sigma_trs_to_enu, trs_to_acr,
    trs_to_acr_pos_vel, trs_to_acr_rotation, trs_to_enu, trs_to_enu_rotation,
};
