//! Lazy, forward-only streaming over decoded records and fields.
//!
//! [`RecordStream`] wraps a [`RecordDecoder`] and exposes decoding as a
//! lazy sequence: [`records`](RecordStream::records) yields one decoded
//! [`Record`] per pull, [`fields`](RecordStream::fields) flattens that
//! into fields in per-record, per-directory-entry order. Either sequence
//! may be taken exactly once; a second request fails with a state error
//! instead of silently restarting.
//!
//! The stream exclusively owns the underlying source for its lifetime.
//! Dropping the stream (or letting it fall out of scope after partial
//! consumption) releases the source; an explicit [`close`](RecordStream::close)
//! is offered for manual lifetime management. Concurrent use of one source
//! by two streams is a caller error this type cannot detect.
//!
//! # Examples
//!
//! ```no_run
//! use iso2709::{ErrorPolicy, RecordStream};
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut stream = RecordStream::with_policy(file, ErrorPolicy::SkipRecords);
//! let total = stream.fields()?.count();
//! println!("{total} fields, {} records skipped", stream.skipped_records());
//! # Ok::<(), iso2709::DecodeError>(())
//! ```

use crate::decoder::RecordDecoder;
use crate::error::{DecodeError, Result};
use crate::field::Field;
use crate::record::Record;
use std::io::Read;

/// How the stream treats format-broken records.
///
/// This is the caller-visible recovery policy: a record is either
/// surfaced as an error or explicitly skipped, never logged-and-ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Surface every error to the caller (default).
    #[default]
    Abort,
    /// Skip records that fail with a format error, resynchronizing to the
    /// next record terminator; skipped records are counted and available
    /// via [`RecordStream::skipped_records`]. Truncation and I/O errors
    /// still abort.
    SkipRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Ready,
    Consumed,
    Closed,
}

/// A one-shot decode session over a byte source.
#[derive(Debug)]
pub struct RecordStream<R: Read> {
    decoder: Option<RecordDecoder<R>>,
    state: StreamState,
    policy: ErrorPolicy,
    records_read: usize,
    skipped: usize,
}

impl<R: Read> RecordStream<R> {
    /// Open a stream with the default [`ErrorPolicy::Abort`].
    pub fn new(source: R) -> Self {
        Self::with_policy(source, ErrorPolicy::default())
    }

    /// Open a stream with an explicit error policy.
    pub fn with_policy(source: R, policy: ErrorPolicy) -> Self {
        RecordStream {
            decoder: Some(RecordDecoder::new(source)),
            state: StreamState::Ready,
            policy,
            records_read: 0,
            skipped: 0,
        }
    }

    /// Take the lazy sequence of records. One decode per pull; the
    /// sequence is finite and non-restartable.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::StreamState`] if the stream was already
    /// consumed or closed.
    pub fn records(&mut self) -> Result<Records<'_, R>> {
        self.take_session()?;
        Ok(Records { stream: self })
    }

    /// Take the lazy sequence of fields: the record sequence flattened in
    /// per-record, per-directory-entry order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::StreamState`] if the stream was already
    /// consumed or closed.
    pub fn fields(&mut self) -> Result<Fields<'_, R>> {
        self.take_session()?;
        Ok(Fields {
            records: Records { stream: self },
            pending: Vec::new().into_iter(),
        })
    }

    /// Release the underlying source now. Idempotent; any later attempt
    /// to read fails with a state error.
    pub fn close(&mut self) {
        self.release();
        self.state = StreamState::Closed;
    }

    /// Number of records decoded so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.decoder
            .as_ref()
            .map_or(self.records_read, RecordDecoder::records_read)
    }

    /// Number of records skipped under [`ErrorPolicy::SkipRecords`].
    #[must_use]
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }

    fn take_session(&mut self) -> Result<()> {
        match self.state {
            StreamState::Ready => {
                self.state = StreamState::Consumed;
                Ok(())
            },
            StreamState::Consumed => Err(DecodeError::StreamState(
                "stream already consumed".to_string(),
            )),
            StreamState::Closed => {
                Err(DecodeError::StreamState("stream closed".to_string()))
            },
        }
    }

    /// Drop the decoder (and with it the source), keeping the counters.
    fn release(&mut self) {
        if let Some(decoder) = self.decoder.take() {
            self.records_read = decoder.records_read();
        }
    }
}

/// Lazy iterator over decoded records. Created by
/// [`RecordStream::records`]; releases the source when exhausted.
#[derive(Debug)]
pub struct Records<'a, R: Read> {
    stream: &'a mut RecordStream<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let decoder = self.stream.decoder.as_mut()?;
            match decoder.read_record() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {
                    self.stream.release();
                    return None;
                },
                Err(err)
                    if err.is_recoverable()
                        && self.stream.policy == ErrorPolicy::SkipRecords =>
                {
                    self.stream.skipped += 1;
                    if decoder.at_record_boundary() {
                        continue;
                    }
                    let tail_start = decoder.offset();
                    match decoder.resync() {
                        Ok(true) => {},
                        // Input ended inside the broken record with no
                        // further boundary: that is truncation, not a
                        // skippable record.
                        Ok(false) => {
                            self.stream.release();
                            return Some(Err(DecodeError::ShortFile(format!(
                                "input ended without a record terminator after byte {tail_start}"
                            ))));
                        },
                        Err(io_err) => {
                            self.stream.release();
                            return Some(Err(io_err));
                        },
                    }
                },
                Err(err) => {
                    self.stream.release();
                    return Some(Err(err));
                },
            }
        }
    }
}

/// Lazy iterator over decoded fields. Created by [`RecordStream::fields`].
#[derive(Debug)]
pub struct Fields<'a, R: Read> {
    records: Records<'a, R>,
    pending: std::vec::IntoIter<Field>,
}

impl<R: Read> Iterator for Fields<'_, R> {
    type Item = Result<Field>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(field) = self.pending.next() {
                return Some(Ok(field));
            }
            match self.records.next()? {
                Ok(record) => self.pending = record.into_fields().into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
