//! Tectonic plate motion models: rotation pole catalogs and
//! velocity-at-position computation.
use std::collections::HashMap;

use log::debug;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Error, units::UnitRegistry};

/// ITRF2008 plate motion model, Altamimi et al. (2012).
/// Cartesian rotation rates in mas/yr.
const ITRF2008_POLES_MAS_YR: [(&str, &str, f64, f64, f64); 14] = [
    ("AMUR", "Amur", -0.190, -0.442, 0.915),
    ("ANTA", "Antarctica", -0.252, -0.302, 0.643),
    ("ARAB", "Arabia", 1.202, -0.054, 1.485),
    ("AUST", "Australia", 1.504, 1.172, 1.228),
    ("CARB", "Caribbean", 0.049, -1.088, 0.664),
    ("EURA", "Eurasia", -0.083, -0.534, 0.750),
    ("INDI", "India", 1.232, 0.303, 1.540),
    ("NAZC", "Nazca", -0.330, -1.551, 1.625),
    ("NOAM", "North America", 0.035, -0.662, -0.100),
    ("NUBI", "Nubia", 0.095, -0.598, 0.723),
    ("PCFC", "Pacific", -0.411, 1.036, -2.166),
    ("SOAM", "South America", -0.243, -0.311, -0.211),
    ("SOMA", "Somalia", -0.080, -0.745, 0.897),
    ("SUND", "Sunda", 0.047, -1.000, 0.975),
];

/// ITRF2014 plate motion model, Altamimi et al. (2017).
/// Cartesian rotation rates in mas/yr.
const ITRF2014_POLES_MAS_YR: [(&str, &str, f64, f64, f64); 11] = [
    ("ANTA", "Antarctica", -0.248, -0.324, 0.675),
    ("ARAB", "Arabia", 1.154, -0.136, 1.444),
    ("AUST", "Australia", 1.510, 1.182, 1.215),
    ("EURA", "Eurasia", -0.085, -0.531, 0.770),
    ("INDI", "India", 1.154, -0.005, 1.454),
    ("NAZC", "Nazca", -0.333, -1.544, 1.623),
    ("NOAM", "North America", 0.024, -0.694, -0.063),
    ("NUBI", "Nubia", 0.099, -0.614, 0.733),
    ("PCFC", "Pacific", -0.409, 1.047, -2.169),
    ("SOAM", "South America", -0.270, -0.301, -0.140),
    ("SOMA", "Somalia", -0.121, -0.794, 0.884),
];

/// NNR-MORVEL56 no-net-rotation model, Argus et al. (2011),
/// major plate set. Euler poles: latitude (°), longitude (°),
/// rotation rate (°/Myr).
const NNR_MORVEL56_POLES_DEG_MYR: [(&str, &str, f64, f64, f64); 25] = [
    ("AM", "Amur", 63.17, -122.82, 0.297),
    ("AN", "Antarctica", 65.42, -118.11, 0.250),
    ("AR", "Arabia", 48.88, -8.49, 0.559),
    ("AU", "Australia", 33.86, 37.94, 0.632),
    ("CA", "Caribbean", 35.20, -92.62, 0.286),
    ("CO", "Cocos", 26.93, -124.31, 1.198),
    ("CP", "Capricorn", 44.44, 23.09, 0.608),
    ("EU", "Eurasia", 48.85, -106.50, 0.223),
    ("IN", "India", 50.37, -3.29, 0.544),
    ("JF", "Juan de Fuca", -38.31, 60.04, 0.951),
    ("LW", "Lwandle", 51.89, -69.52, 0.286),
    ("MQ", "Macquarie", 49.19, 11.05, 1.144),
    ("NA", "North America", -4.85, -80.64, 0.209),
    ("NB", "Nubia", 47.68, -68.44, 0.292),
    ("NZ", "Nazca", 46.23, -101.06, 0.696),
    ("PA", "Pacific", -63.58, 114.70, 0.651),
    ("PS", "Philippine Sea", -46.02, -31.36, 0.910),
    ("RI", "Rivera", 20.25, -107.29, 4.536),
    ("SA", "South America", -22.62, -112.83, 0.109),
    ("SC", "Scotia", 22.52, -106.15, 0.146),
    ("SM", "Somalia", 49.95, -84.52, 0.339),
    ("SR", "Sur", -32.50, -111.32, 0.107),
    ("SU", "Sunda", 50.06, -95.02, 0.337),
    ("SW", "Sandwich", -29.94, -36.02, 1.362),
    ("YZ", "Yangtze", 63.03, -116.62, 0.334),
];

/// Rigid rotation pole of one tectonic plate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RotationPole {
    /// Plate identifier within its model
    pub plate: String,
    /// Human readable plate name
    pub name: String,
    /// Angular velocity vector, in rad/yr, geocentric frame
    pub omega_rad_yr: Vector3<f64>,
}

impl RotationPole {
    /// Builds [RotationPole] from cartesian rotation rates in mas/yr
    /// (the ITRF publication form), converted through the [UnitRegistry].
    pub fn from_mas_yr(
        plate: &str,
        name: &str,
        rates_mas_yr: (f64, f64, f64),
        units: &UnitRegistry,
    ) -> Result<Self, Error> {
        let factor = units.factor("milliarcsecond per year", "radian per year")?;

        Ok(Self {
            plate: plate.to_string(),
            name: name.to_string(),
            omega_rad_yr: Vector3::new(
                rates_mas_yr.0 * factor,
                rates_mas_yr.1 * factor,
                rates_mas_yr.2 * factor,
            ),
        })
    }

    /// Builds [RotationPole] from an Euler pole: latitude and longitude
    /// in degrees, rotation rate in °/Myr (the NNR-MORVEL publication
    /// form), converted through the [UnitRegistry].
    pub fn from_euler_pole(
        plate: &str,
        name: &str,
        latitude_deg: f64,
        longitude_deg: f64,
        rate_deg_myr: f64,
        units: &UnitRegistry,
    ) -> Result<Self, Error> {
        let rate_rad_yr =
            units.convert(rate_deg_myr, "degree per megayear", "radian per year")?;

        let (sin_lat, cos_lat) = latitude_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude_deg.to_radians().sin_cos();

        Ok(Self {
            plate: plate.to_string(),
            name: name.to_string(),
            omega_rad_yr: rate_rad_yr
                * Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        })
    }

    /// Rigid plate velocity at a geocentric position (meters):
    /// v = ω × r, in m/yr.
    pub fn velocity_at(&self, position_ecef_m: &Vector3<f64>) -> Vector3<f64> {
        self.omega_rad_yr.cross(position_ecef_m)
    }
}

/// One named plate motion model: a set of [RotationPole]s, one per plate.
/// Static data, never mutated after construction.
#[derive(Debug, Clone)]
pub struct PlateMotionModel {
    /// Model name ("ITRF2014", ..)
    pub name: String,
    /// Model description
    pub description: String,
    poles: HashMap<String, RotationPole>,
}

impl PlateMotionModel {
    /// Builds [PlateMotionModel] from its [RotationPole]s. Plate lookup
    /// is case insensitive (identifiers are stored uppercase).
    pub fn new(name: &str, description: &str, poles: Vec<RotationPole>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            poles: poles
                .into_iter()
                .map(|pole| (pole.plate.to_uppercase(), pole))
                .collect(),
        }
    }

    /// Returns the [RotationPole] of this plate, or
    /// [Error::UnknownPlate] if the model does not describe it.
    pub fn pole(&self, plate: &str) -> Result<&RotationPole, Error> {
        self.poles
            .get(&plate.to_uppercase())
            .ok_or_else(|| Error::UnknownPlate(plate.to_string()))
    }

    /// Rigid velocity (m/yr) of given plate at a geocentric position
    /// (meters).
    pub fn velocity_at(
        &self,
        position_ecef_m: &Vector3<f64>,
        plate: &str,
    ) -> Result<Vector3<f64>, Error> {
        Ok(self.pole(plate)?.velocity_at(position_ecef_m))
    }

    /// Iterates the [RotationPole]s of this model
    pub fn poles(&self) -> impl Iterator<Item = &RotationPole> {
        self.poles.values()
    }

    /// Number of plates this model describes
    pub fn len(&self) -> usize {
        self.poles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }
}

/// Read-only catalog of [PlateMotionModel]s, populated once at startup.
#[derive(Debug, Clone, Default)]
pub struct PlateCatalog {
    models: HashMap<String, PlateMotionModel>,
}

impl PlateCatalog {
    /// Builds the catalog of published models: ITRF2008, ITRF2014 and
    /// NNR-MORVEL56. Rate conversions go through the [UnitRegistry].
    pub fn builtin(units: &UnitRegistry) -> Result<Self, Error> {
        let mut catalog = Self::default();

        let poles = ITRF2008_POLES_MAS_YR
            .iter()
            .map(|(plate, name, wx, wy, wz)| {
                RotationPole::from_mas_yr(plate, name, (*wx, *wy, *wz), units)
            })
            .collect::<Result<Vec<_>, _>>()?;

        catalog.insert(PlateMotionModel::new(
            "ITRF2008",
            "ITRF2008 plate motion model (Altamimi et al. 2012)",
            poles,
        ));

        let poles = ITRF2014_POLES_MAS_YR
            .iter()
            .map(|(plate, name, wx, wy, wz)| {
                RotationPole::from_mas_yr(plate, name, (*wx, *wy, *wz), units)
            })
            .collect::<Result<Vec<_>, _>>()?;

        catalog.insert(PlateMotionModel::new(
            "ITRF2014",
            "ITRF2014 plate motion model (Altamimi et al. 2017)",
            poles,
        ));

        let poles = NNR_MORVEL56_POLES_DEG_MYR
            .iter()
            .map(|(plate, name, lat, lon, rate)| {
                RotationPole::from_euler_pole(plate, name, *lat, *lon, *rate, units)
            })
            .collect::<Result<Vec<_>, _>>()?;

        catalog.insert(PlateMotionModel::new(
            "NNR-MORVEL56",
            "NNR-MORVEL56 no-net-rotation model (Argus et al. 2011)",
            poles,
        ));

        debug!("plate catalog: {} models", catalog.models.len());
        Ok(catalog)
    }

    /// Registers a [PlateMotionModel] (case insensitive name).
    pub fn insert(&mut self, model: PlateMotionModel) {
        self.models.insert(model.name.to_uppercase(), model);
    }

    /// Resolves a [PlateMotionModel] by name, or [Error::UnknownModel].
    pub fn model(&self, name: &str) -> Result<&PlateMotionModel, Error> {
        self.models
            .get(&name.to_uppercase())
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Iterates the catalog models
    pub fn models(&self) -> impl Iterator<Item = &PlateMotionModel> {
        self.models.values()
    }
}
