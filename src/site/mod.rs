//! Station (site) metadata: typed records with validity intervals,
//! per-kind ordered histories and a multi-source database.
mod database;
mod history;
mod records;

pub use database::{SiteDatabase, SourceKind, StationLog};
pub use history::SiteHistory;
pub use records::{
    AntennaRecord, CoordinateRecord, EccentricityRecord, HistoryRecord, ReceiverRecord,
    SiteRecords, TimeSpan,
};
