use hifitime::Epoch;
use itertools::Itertools;
use log::debug;

use crate::{
    error::Error,
    site::records::{HistoryRecord, TimeSpan},
};

/// Time-ordered sequence of same-kind metadata records of one station,
/// with non-overlapping validity intervals. Point-in-time lookup is
/// O(log n).
#[derive(Debug, Clone, PartialEq)]
pub struct SiteHistory<R: HistoryRecord> {
    station: String,
    records: Vec<R>,
}

impl<R: HistoryRecord> SiteHistory<R> {
    /// Builds the [SiteHistory] of `station` from its records, in any
    /// order. Fails with [Error::StationMismatch] on a record of
    /// another station and [Error::OverlappingData] when two records
    /// claim the same instant.
    pub fn build(station: &str, records: Vec<R>) -> Result<Self, Error> {
        for record in &records {
            if record.station() != station {
                return Err(Error::StationMismatch {
                    expected: station.to_string(),
                    found: record.station().to_string(),
                });
            }
        }

        let records: Vec<R> = records
            .into_iter()
            .sorted_by_key(|record| record.validity().start)
            .collect();

        // once ordered by start, testing neighbors covers all pairs
        for (prev, next) in records.iter().tuple_windows() {
            if prev.validity().overlaps(next.validity()) {
                return Err(Error::OverlappingData(station.to_string()));
            }
        }

        debug!("{}: history of {} records", station, records.len());

        Ok(Self {
            station: station.to_string(),
            records,
        })
    }

    /// Builds an empty [SiteHistory] for `station`.
    pub fn empty(station: &str) -> Self {
        Self {
            station: station.to_string(),
            records: Vec::new(),
        }
    }

    /// Station (site) code this history describes
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Returns the record applicable at [Epoch] `t`, or None when no
    /// validity interval contains it. Binary search over the ordered
    /// records.
    pub fn at(&self, t: Epoch) -> Option<&R> {
        let index = self
            .records
            .partition_point(|record| record.validity().start <= t);

        if index == 0 {
            return None;
        }

        let record = &self.records[index - 1];

        if record.validity().contains(t) {
            Some(record)
        } else {
            None
        }
    }

    /// Iterates records oldest first. Restartable: each call starts
    /// over from the earliest record.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Interval from the earliest validity start to the latest end
    /// (open when the last record is open ended). None when the
    /// history holds no record.
    pub fn span(&self) -> Option<TimeSpan> {
        let first = self.records.first()?;
        let last = self.records.last()?;

        Some(TimeSpan {
            start: first.validity().start,
            end: last.validity().end,
        })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
