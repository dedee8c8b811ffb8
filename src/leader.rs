//! The fixed 24-byte record leader.
//!
//! Every ISO 2709 record begins with a 24-character leader describing the
//! record's total length, the offset where field data begins, and the
//! widths used to interpret its directory.
//!
//! # Structure
//!
//! - Positions 0-4: record length (5 digits)
//! - Position 5: record status
//! - Position 6: record type
//! - Positions 7-9: implementation-defined codes
//! - Position 10: indicator count (1 digit)
//! - Position 11: subfield code length (1 digit)
//! - Positions 12-16: base address of data (5 digits)
//! - Positions 17-19: user systems characters
//! - Position 20: length of the field-length portion of a directory entry
//! - Position 21: length of the starting-character-position portion
//! - Position 22: length of the implementation-defined portion
//! - Position 23: reserved

use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};

/// Leader length in bytes.
pub const LEADER_LENGTH: usize = 24;

/// The fixed-width header of an ISO 2709 record.
///
/// Unlike MARC 21 readers that assume 12-byte directory entries, the three
/// entry-map widths are taken from the leader, so dialects with other
/// directory layouts decode with the same code path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Total record length in bytes, including the leader - positions 0-4.
    pub record_length: usize,
    /// Record status - position 5.
    pub record_status: char,
    /// Record type - position 6.
    pub record_type: char,
    /// Implementation-defined codes - positions 7-9.
    pub impl_codes: String,
    /// Number of indicator characters preceding each data field - position 10.
    pub indicator_count: usize,
    /// Length of a subfield code including the delimiter - position 11.
    /// Zero means the dialect carries no subfields.
    pub subfield_code_length: usize,
    /// Offset of the data region from the start of the record - positions 12-16.
    pub base_address: usize,
    /// User systems characters - positions 17-19.
    pub user_systems: String,
    /// Width of the field-length portion of a directory entry - position 20.
    pub field_length_width: usize,
    /// Width of the starting-position portion of a directory entry - position 21.
    pub start_position_width: usize,
    /// Width of the implementation-defined portion of a directory entry - position 22.
    pub impl_defined_width: usize,
    /// Reserved - position 23.
    pub reserved: char,
}

impl Leader {
    /// Parse a leader from its 24 bytes.
    ///
    /// `record_offset` is the absolute offset of the record within the
    /// input and is used only for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidFormat`] if fewer than 24 bytes are
    /// given or any positional integer is not parseable as an unsigned
    /// number of its declared width; the error carries the byte offset of
    /// the offending position.
    pub fn from_bytes(bytes: &[u8], record_offset: u64) -> Result<Self> {
        if bytes.len() < LEADER_LENGTH {
            return Err(DecodeError::InvalidFormat {
                offset: record_offset,
                reason: format!(
                    "leader must be {LEADER_LENGTH} bytes, got {}",
                    bytes.len()
                ),
            });
        }

        let record_length = parse_number(bytes, 0..5, record_offset, "record length")?;
        let indicator_count = parse_number(bytes, 10..11, record_offset, "indicator count")?;
        let subfield_code_length =
            parse_number(bytes, 11..12, record_offset, "subfield code length")?;
        let base_address = parse_number(bytes, 12..17, record_offset, "base address of data")?;
        let field_length_width =
            parse_number(bytes, 20..21, record_offset, "length of field length")?;
        let start_position_width =
            parse_number(bytes, 21..22, record_offset, "length of starting position")?;
        let impl_defined_width = parse_number(
            bytes,
            22..23,
            record_offset,
            "length of implementation-defined portion",
        )?;

        Ok(Leader {
            record_length,
            record_status: bytes[5] as char,
            record_type: bytes[6] as char,
            impl_codes: String::from_utf8_lossy(&bytes[7..10]).into_owned(),
            indicator_count,
            subfield_code_length,
            base_address,
            user_systems: String::from_utf8_lossy(&bytes[17..20]).into_owned(),
            field_length_width,
            start_position_width,
            impl_defined_width,
            reserved: bytes[23] as char,
        })
    }

    /// Width of one directory entry: 3-character tag plus the three
    /// leader-declared widths.
    #[must_use]
    pub fn entry_width(&self) -> usize {
        3 + self.field_length_width + self.start_position_width + self.impl_defined_width
    }

    /// Structural validation before any directory or data arithmetic.
    ///
    /// The base address of data must lie past the leader and the directory
    /// terminator and within the declared record length, and the directory
    /// entry widths must be usable.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidFormat`] when an invariant is violated.
    pub fn validate(&self, record_offset: u64) -> Result<()> {
        let invalid = |reason: String| DecodeError::InvalidFormat {
            offset: record_offset,
            reason,
        };
        if self.record_length <= LEADER_LENGTH {
            return Err(invalid(format!(
                "record length {} does not exceed the leader length",
                self.record_length
            )));
        }
        if self.base_address <= LEADER_LENGTH {
            return Err(invalid(format!(
                "base address of data {} lies inside the leader",
                self.base_address
            )));
        }
        if self.base_address >= self.record_length {
            return Err(invalid(format!(
                "base address of data {} leaves no data region within record length {}",
                self.base_address, self.record_length
            )));
        }
        if self.field_length_width == 0 || self.start_position_width == 0 {
            return Err(invalid(
                "directory entry widths must be nonzero".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize the leader back to its 24-byte form.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(LEADER_LENGTH);
        bytes.extend_from_slice(format!("{:05}", self.record_length).as_bytes());
        bytes.push(self.record_status as u8);
        bytes.push(self.record_type as u8);
        bytes.extend_from_slice(pad3(&self.impl_codes).as_bytes());
        bytes.extend_from_slice(format!("{:01}", self.indicator_count).as_bytes());
        bytes.extend_from_slice(format!("{:01}", self.subfield_code_length).as_bytes());
        bytes.extend_from_slice(format!("{:05}", self.base_address).as_bytes());
        bytes.extend_from_slice(pad3(&self.user_systems).as_bytes());
        bytes.extend_from_slice(format!("{:01}", self.field_length_width).as_bytes());
        bytes.extend_from_slice(format!("{:01}", self.start_position_width).as_bytes());
        bytes.extend_from_slice(format!("{:01}", self.impl_defined_width).as_bytes());
        bytes.push(self.reserved as u8);
        bytes
    }
}

impl Default for Leader {
    /// A MARC-shaped leader: two indicators, two-character subfield codes,
    /// 4-digit field lengths, and 5-digit start positions. Lengths and the
    /// base address are zero and must be filled by whoever assembles the
    /// record bytes.
    fn default() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'a',
            impl_codes: "m a".to_string(),
            indicator_count: 2,
            subfield_code_length: 2,
            base_address: 0,
            user_systems: "   ".to_string(),
            field_length_width: 4,
            start_position_width: 5,
            impl_defined_width: 0,
            reserved: '0',
        }
    }
}

/// Parse an unsigned fixed-width ASCII decimal from leader bytes.
fn parse_number(
    bytes: &[u8],
    range: std::ops::Range<usize>,
    record_offset: u64,
    what: &str,
) -> Result<usize> {
    let start = range.start;
    let slice = &bytes[range];
    let mut value = 0usize;
    for (i, &byte) in slice.iter().enumerate() {
        if byte.is_ascii_digit() {
            value = value * 10 + (byte - b'0') as usize;
        } else {
            return Err(DecodeError::InvalidFormat {
                offset: record_offset + (start + i) as u64,
                reason: format!("{what}: expected digit, got {:?}", byte as char),
            });
        }
    }
    Ok(value)
}

/// Pad or truncate a string to exactly three characters.
fn pad3(s: &str) -> String {
    let mut out: String = s.chars().take(3).collect();
    while out.len() < 3 {
        out.push(' ');
    }
    out
}
