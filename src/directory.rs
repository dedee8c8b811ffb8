//! The record directory: fixed-width descriptors locating each field.
//!
//! The directory occupies the bytes between the leader and the base
//! address of data, terminated by a field terminator at `base_address - 1`.
//! Each entry is a fixed-width triple of tag, field length, and starting
//! character position (plus an optional implementation-defined portion),
//! with all widths taken from the leader.

use crate::error::{DecodeError, Result};
use crate::leader::{Leader, LEADER_LENGTH};
use crate::separators::FIELD_TERMINATOR;
use serde::{Deserialize, Serialize};

/// One directory entry: where a field's payload lives in the data region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Field tag, three characters.
    pub tag: String,
    /// Length of the field's payload in bytes, including its terminator.
    pub field_length: usize,
    /// Starting position of the payload, relative to the base address.
    pub start_position: usize,
    /// Raw implementation-defined portion, empty when the leader declares
    /// a zero width for it.
    pub impl_defined: String,
}

impl DirectoryEntry {
    /// End of the payload span, relative to the base address.
    #[must_use]
    pub fn end_position(&self) -> usize {
        self.start_position + self.field_length
    }

    /// True if this entry's byte range overlaps another's.
    #[must_use]
    pub fn overlaps(&self, other: &DirectoryEntry) -> bool {
        self.start_position < other.end_position() && other.start_position < self.end_position()
    }
}

/// Parse the directory out of a full record buffer.
///
/// `record` must hold the complete record bytes (leader included) and
/// `record_offset` is the record's absolute position in the input, used
/// for error reporting. Entries are read from immediately after the leader
/// until the directory terminator at `base_address - 1`.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidFormat`] when the terminator is missing,
/// the directory length is not an exact multiple of the entry width, a
/// numeric portion is not parseable at its declared width, an entry's span
/// leaves the data region, or a repeated tag declares overlapping spans.
pub fn parse_directory(
    leader: &Leader,
    record: &[u8],
    record_offset: u64,
) -> Result<Vec<DirectoryEntry>> {
    let base = leader.base_address;
    debug_assert!(record.len() >= base && base > LEADER_LENGTH);

    if record[base - 1] != FIELD_TERMINATOR {
        return Err(DecodeError::InvalidFormat {
            offset: record_offset + (base - 1) as u64,
            reason: "directory is not terminated by a field terminator".to_string(),
        });
    }

    let entry_width = leader.entry_width();
    let directory = &record[LEADER_LENGTH..base - 1];
    if directory.len() % entry_width != 0 {
        return Err(DecodeError::InvalidFormat {
            offset: record_offset + LEADER_LENGTH as u64,
            reason: format!(
                "directory length {} is not a multiple of the entry width {entry_width}",
                directory.len()
            ),
        });
    }

    // Field data region, excluding the trailing record terminator.
    let data_length = leader.record_length - base - 1;

    let mut entries = Vec::with_capacity(directory.len() / entry_width);
    for (index, chunk) in directory.chunks_exact(entry_width).enumerate() {
        let entry_offset = record_offset + (LEADER_LENGTH + index * entry_width) as u64;
        let entry = parse_entry(leader, chunk, entry_offset)?;

        if entry.end_position() > data_length {
            return Err(DecodeError::InvalidFormat {
                offset: entry_offset,
                reason: format!(
                    "field '{}' spans {}..{} past the data region of {data_length} bytes",
                    entry.tag,
                    entry.start_position,
                    entry.end_position()
                ),
            });
        }
        for earlier in entries.iter().filter(|e: &&DirectoryEntry| e.tag == entry.tag) {
            if earlier.overlaps(&entry) {
                return Err(DecodeError::InvalidFormat {
                    offset: entry_offset,
                    reason: format!(
                        "repeated tag '{}' declares overlapping byte ranges",
                        entry.tag
                    ),
                });
            }
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Parse one fixed-width entry.
fn parse_entry(leader: &Leader, chunk: &[u8], entry_offset: u64) -> Result<DirectoryEntry> {
    let tag = String::from_utf8_lossy(&chunk[..3]).into_owned();
    let length_end = 3 + leader.field_length_width;
    let position_end = length_end + leader.start_position_width;

    let field_length = parse_number(&chunk[3..length_end], entry_offset + 3, "field length")?;
    let start_position = parse_number(
        &chunk[length_end..position_end],
        entry_offset + length_end as u64,
        "starting character position",
    )?;
    let impl_defined = String::from_utf8_lossy(&chunk[position_end..]).into_owned();

    Ok(DirectoryEntry {
        tag,
        field_length,
        start_position,
        impl_defined,
    })
}

fn parse_number(bytes: &[u8], offset: u64, what: &str) -> Result<usize> {
    let mut value = 0usize;
    for (i, &byte) in bytes.iter().enumerate() {
        if byte.is_ascii_digit() {
            value = value * 10 + (byte - b'0') as usize;
        } else {
            return Err(DecodeError::InvalidFormat {
                offset: offset + i as u64,
                reason: format!("{what}: expected digit, got {:?}", byte as char),
            });
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a record buffer from a leader shape and raw directory text;
    /// the data region is filled with placeholder bytes.
    fn record_with_directory(directory: &str, data_length: usize) -> (Leader, Vec<u8>) {
        let base = LEADER_LENGTH + directory.len() + 1;
        let leader = Leader {
            record_length: base + data_length + 1,
            base_address: base,
            ..Leader::default()
        };
        let mut record = leader.as_bytes();
        record.extend_from_slice(directory.as_bytes());
        record.push(FIELD_TERMINATOR);
        record.extend(std::iter::repeat(b'x').take(data_length));
        record.push(crate::separators::RECORD_TERMINATOR);
        (leader, record)
    }

    #[test]
    fn parses_entries_in_order() {
        let (leader, record) = record_with_directory("001000500000245001000005", 15);
        let entries = parse_directory(&leader, &record, 0).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, "001");
        assert_eq!(entries[0].field_length, 5);
        assert_eq!(entries[0].start_position, 0);
        assert_eq!(entries[1].tag, "245");
        assert_eq!(entries[1].field_length, 10);
        assert_eq!(entries[1].start_position, 5);
        assert_eq!(entries[1].end_position(), 15);
    }

    #[test]
    fn empty_directory_is_valid() {
        let (leader, record) = record_with_directory("", 3);
        let entries = parse_directory(&leader, &record, 0).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn ragged_directory_length_is_rejected() {
        let (leader, record) = record_with_directory("00100050000", 10);
        let err = parse_directory(&leader, &record, 0).unwrap_err();
        match err {
            DecodeError::InvalidFormat { reason, .. } => {
                assert!(reason.contains("multiple of the entry width"), "got: {reason}");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let (leader, mut record) = record_with_directory("001000500000", 5);
        let base = leader.base_address;
        record[base - 1] = b'!';
        assert!(parse_directory(&leader, &record, 0).is_err());
    }

    #[test]
    fn nondigit_field_length_reports_entry_offset() {
        let (leader, record) = record_with_directory("001 00500000", 5);
        let err = parse_directory(&leader, &record, 10).unwrap_err();
        match err {
            DecodeError::InvalidFormat { offset, reason } => {
                // Entry starts at 10 + 24; the length portion at +3.
                assert_eq!(offset, 10 + 24 + 3);
                assert!(reason.contains("field length"), "got: {reason}");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn span_past_data_region_is_rejected() {
        // Declares 10 bytes starting at 0 but only 5 bytes of data exist.
        let (leader, record) = record_with_directory("001001000000", 5);
        let err = parse_directory(&leader, &record, 0).unwrap_err();
        assert!(err.to_string().contains("past the data region"));
    }

    #[test]
    fn overlapping_ranges_for_repeated_tag_are_rejected() {
        // Two 650 entries, 0..8 and 4..12: overlapping.
        let (leader, record) = record_with_directory("650000800000650000800004", 12);
        let err = parse_directory(&leader, &record, 0).unwrap_err();
        assert!(err.to_string().contains("overlapping"));
    }

    #[test]
    fn disjoint_ranges_for_repeated_tag_are_accepted() {
        let (leader, record) = record_with_directory("650000600000650000600006", 12);
        let entries = parse_directory(&leader, &record, 0).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn overlapping_ranges_for_distinct_tags_are_accepted() {
        // Overlap across different tags is pathological but not our error;
        // only repeated tags are rejected.
        let (leader, record) = record_with_directory("650000800000651000800004", 12);
        let entries = parse_directory(&leader, &record, 0).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn zero_length_entry_is_accepted() {
        let (leader, record) = record_with_directory("008000000000", 4);
        let entries = parse_directory(&leader, &record, 0).unwrap();
        assert_eq!(entries[0].field_length, 0);
    }
}
