use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};

use crate::{
    error::Error,
    site::{
        history::SiteHistory,
        records::{
            AntennaRecord, CoordinateRecord, EccentricityRecord, HistoryRecord, ReceiverRecord,
            SiteRecords,
        },
    },
};

/// Origin of a batch of site records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum SourceKind {
    /// SINEX solution file
    Sinex,
    /// SSC coordinate file
    Ssc,
    /// M3G metadata service
    M3g,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Sinex => write!(fmt, "SINEX"),
            Self::Ssc => write!(fmt, "SSC"),
            Self::M3g => write!(fmt, "M3G"),
        }
    }
}

/// The four kind-tagged histories of one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationLog {
    /// Station (site) code
    pub station: String,
    /// Antenna generations
    pub antennas: SiteHistory<AntennaRecord>,
    /// Receiver generations
    pub receivers: SiteHistory<ReceiverRecord>,
    /// Marker eccentricities
    pub eccentricities: SiteHistory<EccentricityRecord>,
    /// Coordinate solutions
    pub coordinates: SiteHistory<CoordinateRecord>,
}

/// Site metadata database: one [StationLog] per station code, built
/// from the records of one source and merged across sources.
#[derive(Debug, Clone, Default)]
pub struct SiteDatabase {
    stations: HashMap<String, StationLog>,
}

impl SiteDatabase {
    /// Builds the [SiteDatabase] from one batch of parsed records,
    /// grouped by station. Fails if any station carries overlapping
    /// same-kind records.
    pub fn from_records(records: SiteRecords) -> Result<Self, Error> {
        let mut antennas = group_by_station(records.antennas);
        let mut receivers = group_by_station(records.receivers);
        let mut eccentricities = group_by_station(records.eccentricities);
        let mut coordinates = group_by_station(records.coordinates);

        let codes: Vec<String> = antennas
            .keys()
            .chain(receivers.keys())
            .chain(eccentricities.keys())
            .chain(coordinates.keys())
            .unique()
            .cloned()
            .collect();

        let mut stations = HashMap::with_capacity(codes.len());

        for code in codes {
            let log = StationLog {
                antennas: build_history(&code, antennas.remove(&code))?,
                receivers: build_history(&code, receivers.remove(&code))?,
                eccentricities: build_history(&code, eccentricities.remove(&code))?,
                coordinates: build_history(&code, coordinates.remove(&code))?,
                station: code.clone(),
            };

            stations.insert(code, log);
        }

        debug!("site database: {} stations", stations.len());
        Ok(Self { stations })
    }

    /// Merges another database in, last write wins at the station
    /// granularity: a station described by `other` fully replaces the
    /// one already held, records are never mixed across sources.
    pub fn merge(&mut self, source: SourceKind, other: SiteDatabase) {
        for (code, log) in other.stations {
            if self.stations.insert(code.clone(), log).is_some() {
                warn!("{}: station {} replaced", source, code);
            }
        }
    }

    /// Returns the [StationLog] of given station code.
    pub fn station(&self, code: &str) -> Option<&StationLog> {
        self.stations.get(code)
    }

    /// Iterates the [StationLog]s
    pub fn stations(&self) -> impl Iterator<Item = &StationLog> {
        self.stations.values()
    }

    /// Number of described stations
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

fn group_by_station<R: HistoryRecord>(records: Vec<R>) -> HashMap<String, Vec<R>> {
    records
        .into_iter()
        .map(|record| (record.station().to_string(), record))
        .into_group_map()
}

fn build_history<R: HistoryRecord>(
    station: &str,
    records: Option<Vec<R>>,
) -> Result<SiteHistory<R>, Error> {
    match records {
        Some(records) => SiteHistory::build(station, records),
        None => Ok(SiteHistory::empty(station)),
    }
}

#[cfg(test)]
mod test {
    use super::{SiteDatabase, SourceKind};
    use crate::site::records::{AntennaRecord, ReceiverRecord, SiteRecords, TimeSpan};
    use hifitime::Epoch;

    fn epoch(year: i32) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
    }

    fn antenna(station: &str, start: i32, antenna_type: &str) -> AntennaRecord {
        AntennaRecord {
            station: station.to_string(),
            validity: TimeSpan::open_ended(epoch(start)),
            antenna_type: antenna_type.to_string(),
            serial: "00001".to_string(),
            radome: None,
        }
    }

    fn receiver(station: &str, start: i32, end: i32, receiver_type: &str) -> ReceiverRecord {
        ReceiverRecord {
            station: station.to_string(),
            validity: TimeSpan::new(epoch(start), epoch(end)).unwrap(),
            receiver_type: receiver_type.to_string(),
            serial: "123456".to_string(),
            firmware: None,
        }
    }

    #[test]
    fn grouped_by_station() {
        let records = SiteRecords {
            antennas: vec![
                antenna("ZIMM", 2016, "TRM59800.00"),
                antenna("WTZR", 2010, "LEIAR25.R3"),
            ],
            receivers: vec![receiver("ZIMM", 2016, 2020, "TRIMBLE NETR9")],
            ..Default::default()
        };

        let database = SiteDatabase::from_records(records).unwrap();
        assert_eq!(database.len(), 2);

        let zimm = database.station("ZIMM").unwrap();
        assert_eq!(zimm.antennas.len(), 1);
        assert_eq!(zimm.receivers.len(), 1);
        assert!(zimm.eccentricities.is_empty());

        // receiver windows behave as any history
        assert!(zimm.receivers.at(epoch(2018)).is_some());
        assert!(zimm.receivers.at(epoch(2021)).is_none());

        assert!(database.station("ONSA").is_none());
    }

    #[test]
    fn overlaps_surface_at_build() {
        let records = SiteRecords {
            antennas: vec![
                antenna("ZIMM", 2010, "TRM29659.00"),
                antenna("ZIMM", 2016, "TRM59800.00"),
            ],
            ..Default::default()
        };

        // both records are open ended: they overlap
        assert!(SiteDatabase::from_records(records).is_err());
    }

    #[test]
    fn last_write_wins_per_station() {
        let sinex = SiteRecords {
            antennas: vec![
                antenna("ZIMM", 2016, "TRM59800.00"),
                antenna("WTZR", 2010, "LEIAR25.R3"),
            ],
            ..Default::default()
        };

        let m3g = SiteRecords {
            antennas: vec![antenna("ZIMM", 2019, "TRM115000.00")],
            ..Default::default()
        };

        let mut database = SiteDatabase::from_records(sinex).unwrap();
        database.merge(SourceKind::M3g, SiteDatabase::from_records(m3g).unwrap());

        // ZIMM fully replaced by the later source
        let zimm = database.station("ZIMM").unwrap();
        assert_eq!(zimm.antennas.len(), 1);
        assert_eq!(
            zimm.antennas.at(epoch(2020)).unwrap().antenna_type,
            "TRM115000.00",
        );
        assert!(zimm.antennas.at(epoch(2017)).is_none());

        // untouched stations survive the merge
        assert!(database.station("WTZR").is_some());
        assert_eq!(database.len(), 2);
    }
}
