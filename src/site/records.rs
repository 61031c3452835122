use hifitime::Epoch;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Half-open validity interval [start, end): applies from start
/// (included) until end (excluded), indefinitely when the end is left
/// open, as SINEX open end epochs arrive from the parser.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSpan {
    /// First [Epoch] of validity (included)
    pub start: Epoch,
    /// End of validity (excluded), or still applicable today
    pub end: Option<Epoch>,
}

impl TimeSpan {
    /// Builds a bounded [TimeSpan]. The interval must not be empty.
    pub fn new(start: Epoch, end: Epoch) -> Result<Self, Error> {
        if end <= start {
            return Err(Error::EmptyInterval);
        }

        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Builds a [TimeSpan] with no end of validity.
    pub fn open_ended(start: Epoch) -> Self {
        Self { start, end: None }
    }

    /// True if `t` falls within [start, end)
    pub fn contains(&self, t: Epoch) -> bool {
        t >= self.start && self.end.map_or(true, |end| t < end)
    }

    /// True if both intervals claim at least one common instant
    pub fn overlaps(&self, rhs: &Self) -> bool {
        self.end.map_or(true, |end| rhs.start < end)
            && rhs.end.map_or(true, |end| self.start < end)
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(fmt, "[{} {})", self.start, end),
            None => write!(fmt, "[{} ..)", self.start),
        }
    }
}

/// Common access to any site metadata record: owning station and
/// validity interval. Histories are generic over this seam, so adapters
/// for new record kinds only need to implement it.
pub trait HistoryRecord: Clone {
    /// Station (site) code this record describes
    fn station(&self) -> &str;

    /// Validity interval of this record
    fn validity(&self) -> &TimeSpan;
}

/// Antenna installed on a site over one validity interval
/// (SINEX SITE/ANTENNA row shape).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaRecord {
    /// Station (site) code
    pub station: String,
    /// Validity interval
    pub validity: TimeSpan,
    /// IGS antenna type name
    pub antenna_type: String,
    /// Antenna serial number
    pub serial: String,
    /// Radome code, when one is fitted
    pub radome: Option<String>,
}

impl HistoryRecord for AntennaRecord {
    fn station(&self) -> &str {
        &self.station
    }

    fn validity(&self) -> &TimeSpan {
        &self.validity
    }
}

/// Receiver operated on a site over one validity interval
/// (SINEX SITE/RECEIVER row shape).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverRecord {
    /// Station (site) code
    pub station: String,
    /// Validity interval
    pub validity: TimeSpan,
    /// IGS receiver type name
    pub receiver_type: String,
    /// Receiver serial number
    pub serial: String,
    /// Firmware version, when reported
    pub firmware: Option<String>,
}

impl HistoryRecord for ReceiverRecord {
    fn station(&self) -> &str {
        &self.station
    }

    fn validity(&self) -> &TimeSpan {
        &self.validity
    }
}

/// Antenna reference point offset from the site marker, over one
/// validity interval (SINEX SITE/ECCENTRICITY row shape).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EccentricityRecord {
    /// Station (site) code
    pub station: String,
    /// Validity interval
    pub validity: TimeSpan,
    /// Reference system of the offset ("UNE")
    pub reference: String,
    /// (Up, North, East) offset in meters
    pub eccentricity_une_m: Vector3<f64>,
}

impl HistoryRecord for EccentricityRecord {
    fn station(&self) -> &str {
        &self.station
    }

    fn validity(&self) -> &TimeSpan {
        &self.validity
    }
}

/// Estimated site coordinates over one validity interval
/// (SINEX SOLUTION/ESTIMATE STAX/STAY/STAZ + VELX/VELY/VELZ shape).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateRecord {
    /// Station (site) code
    pub station: String,
    /// Validity interval
    pub validity: TimeSpan,
    /// ECEF position at [Self::ref_epoch], in meters
    pub position_ecef_m: Vector3<f64>,
    /// ECEF velocity in m/yr, when the solution estimates one
    pub velocity_ecef_m_yr: Option<Vector3<f64>>,
    /// Reference [Epoch] of the position estimate
    pub ref_epoch: Epoch,
    /// Reference frame of the solution ("IGS20", ..)
    pub frame: String,
}

impl CoordinateRecord {
    /// Position propagated to `t` along the estimated velocity, in
    /// meters. Solutions without velocity hold their position.
    pub fn position_at(&self, t: Epoch) -> Vector3<f64> {
        match self.velocity_ecef_m_yr {
            Some(velocity_m_yr) => {
                let dt_yr =
                    (t - self.ref_epoch).to_seconds() / crate::constants::SECONDS_PER_JULIAN_YEAR;
                self.position_ecef_m + velocity_m_yr * dt_yr
            },
            None => self.position_ecef_m,
        }
    }
}

impl HistoryRecord for CoordinateRecord {
    fn station(&self) -> &str {
        &self.station
    }

    fn validity(&self) -> &TimeSpan {
        &self.validity
    }
}

/// Bundle of parsed site records, as produced by one source adapter
/// (SINEX, SSC or M3G): the common shape consumed by
/// [crate::site::SiteDatabase::from_records].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SiteRecords {
    pub antennas: Vec<AntennaRecord>,
    pub receivers: Vec<ReceiverRecord>,
    pub eccentricities: Vec<EccentricityRecord>,
    pub coordinates: Vec<CoordinateRecord>,
}

#[cfg(test)]
mod test {
    use super::TimeSpan;
    use crate::error::Error;
    use hifitime::Epoch;

    fn epoch(year: i32) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
    }

    #[test]
    fn half_open_intervals() {
        let span = TimeSpan::new(epoch(2010), epoch(2015)).unwrap();

        assert!(span.contains(epoch(2010)));
        assert!(span.contains(epoch(2014)));
        assert!(!span.contains(epoch(2015)));
        assert!(!span.contains(epoch(2009)));

        let open = TimeSpan::open_ended(epoch(2015));
        assert!(open.contains(epoch(2015)));
        assert!(open.contains(epoch(2050)));
        assert!(!open.contains(epoch(2014)));
    }

    #[test]
    fn overlap_rules() {
        let span = TimeSpan::new(epoch(2010), epoch(2015)).unwrap();

        // contiguous intervals share no instant
        let next = TimeSpan::new(epoch(2015), epoch(2020)).unwrap();
        assert!(!span.overlaps(&next));
        assert!(!next.overlaps(&span));

        let inside = TimeSpan::new(epoch(2012), epoch(2013)).unwrap();
        assert!(span.overlaps(&inside));
        assert!(inside.overlaps(&span));

        let open = TimeSpan::open_ended(epoch(2014));
        assert!(span.overlaps(&open));
        assert!(!next.overlaps(&TimeSpan::new(epoch(2010), epoch(2015)).unwrap()));
    }

    #[test]
    fn empty_intervals_rejected() {
        assert_eq!(
            TimeSpan::new(epoch(2015), epoch(2015)),
            Err(Error::EmptyInterval),
        );
        assert_eq!(
            TimeSpan::new(epoch(2015), epoch(2010)),
            Err(Error::EmptyInterval),
        );
    }
}
