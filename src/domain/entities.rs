//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the backup domain.
//! They have no I/O dependencies and contain only business logic.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Timestamp layout embedded in archive filenames.
///
/// Fixed and sortable; lexicographic order on filenames matches
/// chronological order. Archives whose stem does not match this layout are
/// invisible to retention.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Suffix shared by every archive this daemon produces.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// A cluster member eligible to serve the dump, as reported by the router's
/// read-only route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node {
    /// Hostname or IP address of the database instance
    pub address: String,
    /// Classic protocol port
    pub port: u16,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// A local backup archive whose creation time was recovered from its
/// filename.
#[derive(Debug, Clone)]
pub struct BackupArchive {
    /// Absolute path under the backups directory
    pub path: PathBuf,
    /// Base filename, also used as the remote object key
    pub name: String,
    /// Creation time parsed out of the filename (UTC, 1 s resolution)
    pub created_at: DateTime<Utc>,
}

/// The remote-storage analog of [`BackupArchive`].
///
/// Retention on the remote side orders by the store-reported modification
/// time instead of a parsed filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Format a timestamp into an archive filename.
pub fn archive_file_name(ts: DateTime<Utc>) -> String {
    format!("{}{}", ts.format(ARCHIVE_TIMESTAMP_FORMAT), ARCHIVE_SUFFIX)
}

/// Recover the creation time embedded in an archive filename.
///
/// Returns `None` for names without the archive suffix or with a stem that
/// does not match the fixed layout. Such files are never counted toward
/// retention and never deleted.
pub fn parse_archive_name(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(ARCHIVE_SUFFIX)?;
    NaiveDateTime::parse_from_str(stem, ARCHIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_node_display() {
        let node = Node {
            address: "db-1.internal".to_string(),
            port: 3306,
        };
        assert_eq!(node.to_string(), "db-1.internal:3306");
    }

    #[test]
    fn test_archive_name_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 18, 45, 9).unwrap();
        let name = archive_file_name(ts);
        assert_eq!(name, "2024-03-07_18:45:09.tar.gz");
        assert_eq!(parse_archive_name(&name), Some(ts));
    }

    #[test]
    fn test_round_trip_truncates_to_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 18, 45, 9).unwrap()
            + chrono::Duration::milliseconds(712);
        let name = archive_file_name(ts);
        let parsed = parse_archive_name(&name).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 7, 18, 45, 9).unwrap());
    }

    #[test]
    fn test_parse_rejects_wrong_suffix() {
        assert!(parse_archive_name("2024-03-07_18:45:09.tar").is_none());
        assert!(parse_archive_name("2024-03-07_18:45:09.zip").is_none());
        assert!(parse_archive_name("2024-03-07_18:45:09").is_none());
    }

    #[test]
    fn test_parse_rejects_bad_timestamp() {
        assert!(parse_archive_name("notadate.tar.gz").is_none());
        assert!(parse_archive_name("2024-13-40_99:99:99.tar.gz").is_none());
        assert!(parse_archive_name(".tar.gz").is_none());
    }

    #[test]
    fn test_filename_order_matches_chronological_order() {
        let older = archive_file_name(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        let newer = archive_file_name(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert!(older < newer);
    }
}
