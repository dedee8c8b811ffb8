//! Directory-based decoding of one record at a time.
//!
//! [`RecordDecoder`] consumes the raw bytes of one ISO 2709 record per
//! [`read_record`](RecordDecoder::read_record) call: it reads the fixed
//! 24-byte leader, parses the directory using the leader-declared entry
//! widths, and slices the data region into [`Field`] values by index
//! arithmetic over the immutable per-record buffer. No byte of a record is
//! interpreted before the whole record is in memory, so malformed offsets
//! surface as typed errors instead of reads past a span.
//!
//! Decoding is strictly sequential: each record's directory must be read
//! before its fields can be located, and each field's position is relative
//! to the base address established by that record's own leader.

use crate::directory::parse_directory;
use crate::error::{DecodeError, Result};
use crate::field::Field;
use crate::leader::{Leader, LEADER_LENGTH};
use crate::record::Record;
use crate::separators::{
    FIELD_TERMINATOR, FILE_SEPARATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER,
};
use std::io::Read;

/// Decoder for ISO 2709 records over a positioned byte cursor.
///
/// The decoder owns its source and tracks the absolute byte offset, which
/// every format error carries. It holds no record cache; each decoded
/// [`Record`] is handed to the caller and forgotten.
///
/// # Examples
///
/// ```no_run
/// use iso2709::RecordDecoder;
/// use std::fs::File;
///
/// let file = File::open("records.mrc")?;
/// let mut decoder = RecordDecoder::new(file);
/// while let Some(record) = decoder.read_record()? {
///     println!("{} fields", record.field_count());
/// }
/// # Ok::<(), iso2709::DecodeError>(())
/// ```
#[derive(Debug)]
pub struct RecordDecoder<R: Read> {
    source: R,
    offset: u64,
    records_read: usize,
    at_boundary: bool,
}

impl<R: Read> RecordDecoder<R> {
    /// Create a decoder over a byte source positioned at a record start.
    pub fn new(source: R) -> Self {
        RecordDecoder {
            source,
            offset: 0,
            records_read: 0,
            at_boundary: true,
        }
    }

    /// Absolute offset of the next unread byte.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records decoded so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// True when the cursor sits at a record boundary. False after a
    /// failure that left the cursor inside a record, in which case
    /// [`resync`](Self::resync) can look for the next boundary.
    #[must_use]
    pub fn at_record_boundary(&self) -> bool {
        self.at_boundary
    }

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` at a clean end of input (including after a
    /// trailing file separator). Once a record decode begins it runs to
    /// completion or failure before control returns.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidFormat`] when leader or directory bytes
    ///   cannot be parsed as declared, with the offending byte offset.
    /// - [`DecodeError::ShortFile`] when input ends before the declared
    ///   record length, or the declared length holds no record terminator
    ///   in its final byte.
    /// - [`DecodeError::Io`] for failures of the underlying source.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut leader_bytes = [0u8; LEADER_LENGTH];
        // File separators may pad the tail of a stream; skip them. A clean
        // EOF here means there is no further record.
        loop {
            if self.read_fully(&mut leader_bytes[..1])? == 0 {
                return Ok(None);
            }
            if leader_bytes[0] != FILE_SEPARATOR {
                break;
            }
            self.offset += 1;
        }
        let record_offset = self.offset;
        self.at_boundary = false;
        let got = self.read_fully(&mut leader_bytes[1..])?;
        self.offset += 1 + got as u64;
        if got < LEADER_LENGTH - 1 {
            return Err(DecodeError::ShortFile(format!(
                "input ended inside the leader of the record at byte {record_offset}"
            )));
        }

        let leader = Leader::from_bytes(&leader_bytes, record_offset)?;
        leader.validate(record_offset)?;

        let mut record_bytes = vec![0u8; leader.record_length];
        record_bytes[..LEADER_LENGTH].copy_from_slice(&leader_bytes);
        let body = &mut record_bytes[LEADER_LENGTH..];
        let got = self.read_fully(body)?;
        self.offset += got as u64;
        if got < leader.record_length - LEADER_LENGTH {
            return Err(DecodeError::ShortFile(format!(
                "input ended at byte {} before the declared record length {} of the record at byte {record_offset}",
                self.offset, leader.record_length
            )));
        }
        if record_bytes[leader.record_length - 1] != RECORD_TERMINATOR {
            return Err(DecodeError::ShortFile(format!(
                "record at byte {record_offset} is not closed by a record terminator"
            )));
        }
        // The declared length was fully consumed and closed; even if the
        // directory turns out malformed below, the cursor is aligned on
        // the next record.
        self.at_boundary = true;

        let entries = parse_directory(&leader, &record_bytes, record_offset)?;

        // Field data region, between the base address and the record
        // terminator. Every span was bounds-checked against it already.
        let data = &record_bytes[leader.base_address..leader.record_length - 1];

        let mut record = Record::new(leader.clone());
        for entry in &entries {
            let mut span = &data[entry.start_position..entry.end_position()];
            if span.last() == Some(&FIELD_TERMINATOR) {
                span = &span[..span.len() - 1];
            }
            for field in decode_field(&leader, &entry.tag, span) {
                record.add_field(field)?;
            }
        }

        self.records_read += 1;
        Ok(Some(record))
    }

    /// Skip forward to just past the next record terminator.
    ///
    /// Used to resume after a format error when the caller's policy is to
    /// skip broken records. Returns `false` if end of input was reached
    /// without finding a boundary.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from the underlying source.
    pub fn resync(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            if self.read_fully(&mut byte)? == 0 {
                return Ok(false);
            }
            self.offset += 1;
            if byte[0] == RECORD_TERMINATOR {
                self.at_boundary = true;
                return Ok(true);
            }
        }
    }

    /// Release the decoder and return the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read until the buffer is full or EOF; returns the bytes read.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {},
                Err(e) => return Err(DecodeError::Io(e)),
            }
        }
        Ok(filled)
    }
}

/// Split one field's raw payload into its [`Field`] values.
///
/// Control fields (tags `000`–`009`) take the whole payload as data. Other
/// fields are led by `indicator_count` indicator characters; when the
/// leader declares a nonzero subfield code length, the remainder splits on
/// the subfield delimiter into one field per subfield, all sharing the
/// prototype's tag and indicator. A zero-length payload produces one field
/// with empty, not absent, data.
fn decode_field(leader: &Leader, tag: &str, payload: &[u8]) -> Vec<Field> {
    let prototype = Field::new(tag);
    if payload.is_empty() {
        return vec![prototype.with_data("")];
    }
    if prototype.is_control() {
        return vec![prototype.with_data(lossy(payload))];
    }

    let indicator_len = leader.indicator_count.min(payload.len());
    let prototype = prototype.with_indicator(lossy(&payload[..indicator_len]));
    let rest = &payload[indicator_len..];

    if leader.subfield_code_length == 0 || !rest.contains(&SUBFIELD_DELIMITER) {
        return vec![prototype.with_data(lossy(rest))];
    }

    let id_len = leader.subfield_code_length.saturating_sub(1);
    let mut fields = Vec::new();
    let mut chunks = rest.split(|&b| b == SUBFIELD_DELIMITER);
    // Anything before the first delimiter is field-level data without a
    // subfield identifier.
    if let Some(head) = chunks.next() {
        if !head.is_empty() {
            fields.push(prototype.clone().with_data(lossy(head)));
        }
    }
    for chunk in chunks {
        let field = if id_len > 0 && chunk.len() >= id_len {
            prototype
                .clone()
                .with_subfield_id(lossy(&chunk[..id_len]))
                .with_data(lossy(&chunk[id_len..]))
        } else {
            // No identifier width, or the chunk is too short to carry one.
            prototype.clone().with_data(lossy(chunk))
        };
        fields.push(field);
    }
    fields
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
