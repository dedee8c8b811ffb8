//! Information separator characters and the configurable boundary class.
//!
//! ISO 2709 streams use the four ASCII information separators: 0x1D
//! terminates a record (group), 0x1E terminates a field, 0x1F introduces a
//! subfield, and 0x1C marks end of file in some dialects. Which of these
//! act as boundary marks for the [`SeparatorTokenizer`](crate::SeparatorTokenizer)
//! is configuration, not hardcoded: a [`SeparatorSet`] is passed at
//! construction.

use smallvec::SmallVec;

/// File separator (end of file/group of records in some dialects).
pub const FILE_SEPARATOR: u8 = 0x1C;

/// Record terminator (ISO 2709 "group separator").
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Field terminator, also terminates the directory.
pub const FIELD_TERMINATOR: u8 = 0x1E;

/// Subfield delimiter, introduces a subfield identifier.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

/// A runtime-configurable class of separator characters.
///
/// Any byte in the set is reported as a boundary mark by the tokenizer;
/// all other bytes accumulate into data runs.
///
/// # Examples
///
/// ```
/// use iso2709::separators::{SeparatorSet, RECORD_TERMINATOR};
///
/// let set = SeparatorSet::default();
/// assert!(set.contains(RECORD_TERMINATOR));
/// assert!(!set.contains(b'a'));
///
/// let records_only = SeparatorSet::new(&[RECORD_TERMINATOR]);
/// assert!(!records_only.contains(0x1E));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorSet {
    bytes: SmallVec<[u8; 4]>,
}

impl SeparatorSet {
    /// Create a set from an explicit list of separator bytes.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        SeparatorSet {
            bytes: SmallVec::from_slice(bytes),
        }
    }

    /// The record-boundary class only: just the record terminator, for
    /// sources where fields are not individually delimited.
    #[must_use]
    pub fn record_boundaries() -> Self {
        SeparatorSet::new(&[RECORD_TERMINATOR])
    }

    /// Test whether a byte belongs to the separator class.
    #[must_use]
    pub fn contains(&self, byte: u8) -> bool {
        self.bytes.contains(&byte)
    }

    /// The separator bytes in this set.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for SeparatorSet {
    /// All four information separators, matching the classic field stream
    /// reader behavior.
    fn default() -> Self {
        SeparatorSet::new(&[
            FILE_SEPARATOR,
            RECORD_TERMINATOR,
            FIELD_TERMINATOR,
            SUBFIELD_DELIMITER,
        ])
    }
}
