//! Group roster reader
//!
//! Rosters are small (one row per group member), so they are read in one go
//! rather than streamed. Row order defines the roster order, which drives the
//! order of balances, remainder distribution and settlement planning.

use crate::core::Rosters;
use crate::io::csv_format::CsvRosterRecord;
use crate::types::SettleError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read every group roster from a CSV file with `group,member` columns
pub fn read_rosters(path: &Path) -> Result<Rosters, SettleError> {
    let file = File::open(path).map_err(|e| SettleError::file_error(path, e))?;
    read_rosters_from(file)
}

/// Read rosters from any reader
///
/// Malformed rows abort the read: a roster with a missing member would
/// silently change every balance in its group.
pub fn read_rosters_from<R: Read>(reader: R) -> Result<Rosters, SettleError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rosters = Rosters::new();

    for (index, result) in reader.deserialize::<CsvRosterRecord>().enumerate() {
        let record = result?;
        if record.group.is_empty() || record.member.is_empty() {
            return Err(SettleError::ParseError {
                // Line 1 is the header
                line: Some(index as u64 + 2),
                message: "roster rows need a group and a member".to_string(),
            });
        }
        rosters.add(record.group, record.member);
    }

    tracing::debug!(groups = rosters.len(), "Loaded rosters");
    Ok(rosters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_rosters_keeps_row_order() {
        let csv = "group,member\ntrip,C\ntrip,A\nflat,X\ntrip,B\n";

        let rosters = read_rosters_from(csv.as_bytes()).unwrap();

        assert_eq!(rosters.len(), 2);
        assert_eq!(rosters.roster("trip"), ["C", "A", "B"]);
        assert_eq!(rosters.roster("flat"), ["X"]);
        assert!(rosters.roster("other").is_empty());
    }

    #[test]
    fn test_read_rosters_trims_fields() {
        let rosters = read_rosters_from("group,member\n trip , A \n".as_bytes()).unwrap();
        assert_eq!(rosters.roster("trip"), ["A"]);
    }

    #[test]
    fn test_read_rosters_rejects_blank_member() {
        let err = read_rosters_from("group,member\ntrip,A\ntrip,\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SettleError::ParseError { line: Some(3), .. }), "unexpected error: {}", err);
    }

    #[test]
    fn test_read_rosters_rejects_short_row() {
        let err = read_rosters_from("group,member\ntrip\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SettleError::ParseError { .. }), "unexpected error: {}", err);
    }

    #[test]
    fn test_read_rosters_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"group,member\ntrip,A\ntrip,B\n")
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let rosters = read_rosters(file.path()).unwrap();
        assert_eq!(rosters.roster("trip"), ["A", "B"]);
    }

    #[test]
    fn test_read_rosters_missing_file() {
        let err = read_rosters(Path::new("nonexistent_roster.csv")).unwrap_err();
        assert_eq!(
            err,
            SettleError::FileNotFound {
                path: "nonexistent_roster.csv".to_string()
            }
        );
    }
}
