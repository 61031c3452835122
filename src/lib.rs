#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// private modules
mod constants;
mod ellipsoid;
mod error;
mod interp;
mod plates;
mod position;
mod site;
mod transform;
mod units;


// prelude
pub mod prelude {
    pub use crate::constants::{EARTH_ANGULAR_VEL_RAD_S, EARTH_GRAVITATION_MU_M3_S2};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::error::Error;
    pub use crate::interp::{
        interp1d, GridInterpolation, Interpolation, RegularGrid, VelocityGrid,
    };
    pub use crate::plates::{PlateCatalog, PlateMotionModel, RotationPole};
    pub use crate::position::Position;
    pub use crate::site::{
        AntennaRecord, CoordinateRecord, EccentricityRecord, HistoryRecord, ReceiverRecord,
        SiteDatabase, SiteHistory, SiteRecords, SourceKind, StationLog, TimeSpan,
    };
    pub use crate::transform::{
        acr_to_trs, acr_to_trs_pos_vel, enu_to_trs, geocentric_to_geodetic,
        geodetic_to_geocentric, kepler_to_trs, sigma_trs_to_enu, trs_to_acr,
        trs_to_acr_pos_vel, trs_to_acr_rotation, trs_to_enu, trs_to_enu_rotation,
        trs_to_kepler, GeodeticPosition, KeplerianElements,
    };
    pub use crate::units::{Dimension, Unit, UnitRegistry};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{Matrix3, Vector3};
}

// pub export
pub use error::Error;
