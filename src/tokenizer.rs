//! Single-pass scanning of separator-delimited character streams.
//!
//! [`SeparatorTokenizer`] turns a byte stream into a sequence of data runs
//! and boundary marks without interpreting their meaning. It has no
//! knowledge of leaders, directories, or tags; it is the low-level scanner
//! used for plain separator-delimited dialects that carry no directory.
//!
//! The tokenizer is pull-based: each pull yields either a [`Token::Data`]
//! run or a [`Token::Mark`] boundary, interleaved in document order.
//!
//! # Example
//!
//! ```
//! use iso2709::{SeparatorTokenizer, Token};
//! use std::io::Cursor;
//!
//! let input = Cursor::new(b"abc\x1Ddef\x1D".to_vec());
//! let tokens: Vec<Token> = SeparatorTokenizer::new(input)
//!     .collect::<iso2709::Result<_>>()?;
//!
//! assert_eq!(tokens.len(), 4); // data, mark, data, mark
//! # Ok::<(), iso2709::DecodeError>(())
//! ```

use crate::error::Result;
use crate::separators::SeparatorSet;
use std::io::Read;

/// Default read buffer size (8 KiB).
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// One event produced by the tokenizer.
///
/// Data runs and boundary marks interleave in document order: a mark is
/// always yielded after the (possibly empty, then omitted) run it
/// terminates and before the next run begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of ordinary characters between separators. Never empty.
    Data(String),
    /// A single separator character from the configured boundary class.
    Mark(char),
}

impl Token {
    /// True if this token is a boundary mark.
    #[must_use]
    pub fn is_mark(&self) -> bool {
        matches!(self, Token::Mark(_))
    }
}

/// Buffered scanner over a separator-delimited byte stream.
///
/// Which bytes count as boundary marks is configuration, not hardcoded:
/// pass a [`SeparatorSet`] via [`with_separators`](Self::with_separators).
/// The default class is the four ASCII information separators.
///
/// Buffering is a tunable (default 8 KiB) and never truncates a data run
/// that spans multiple physical reads; runs are accumulated across refills.
/// An I/O failure on the underlying source propagates as a fatal read
/// error without yielding a partial event for the incomplete run.
#[derive(Debug)]
pub struct SeparatorTokenizer<R: Read> {
    source: R,
    separators: SeparatorSet,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    eof: bool,
    pending_mark: Option<char>,
}

impl<R: Read> SeparatorTokenizer<R> {
    /// Create a tokenizer with the default buffer size and separator class.
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_SIZE)
    }

    /// Create a tokenizer with an explicit buffer capacity in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be nonzero");
        SeparatorTokenizer {
            source,
            separators: SeparatorSet::default(),
            buf: vec![0; capacity],
            pos: 0,
            filled: 0,
            eof: false,
            pending_mark: None,
        }
    }

    /// Replace the separator class recognized as boundary marks.
    #[must_use]
    pub fn with_separators(mut self, separators: SeparatorSet) -> Self {
        self.separators = separators;
        self
    }

    /// True while more data may be produced.
    ///
    /// A `true` result does not guarantee the next pull yields a token;
    /// the source may turn out to be at end of stream.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.pending_mark.is_some() || self.pos < self.filled || !self.eof
    }

    /// Return the next run of characters up to (but not including) the next
    /// recognized separator, consuming the separator.
    ///
    /// Returns `Ok(None)` at end of stream. A run that is immediately
    /// terminated by a separator is returned as an empty string. Boundary
    /// marks themselves are reported through [`next_token`](Self::next_token);
    /// this method discards them.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from the underlying source.
    pub fn read_data(&mut self) -> Result<Option<String>> {
        self.pending_mark = None;
        Ok(self.scan_run()?.map(|(data, _)| data))
    }

    /// Pull the next event: a data run or a boundary mark.
    ///
    /// Returns `Ok(None)` at end of stream. Empty runs between adjacent
    /// separators produce only the marks, never empty [`Token::Data`].
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from the underlying source.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(mark) = self.pending_mark.take() {
            return Ok(Some(Token::Mark(mark)));
        }
        match self.scan_run()? {
            None => Ok(None),
            Some((data, mark)) => {
                if data.is_empty() {
                    Ok(mark.map(|m| Token::Mark(m as char)))
                } else {
                    self.pending_mark = mark.map(|m| m as char);
                    Ok(Some(Token::Data(data)))
                }
            },
        }
    }

    /// Release the tokenizer and return the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Accumulate bytes until a separator or end of stream. Returns the run
    /// and the separator that ended it (`None` at end of stream), or `None`
    /// when the stream was already exhausted.
    fn scan_run(&mut self) -> Result<Option<(String, Option<u8>)>> {
        if !self.fill()? {
            return Ok(None);
        }
        let mut run: Vec<u8> = Vec::new();
        loop {
            let window = &self.buf[self.pos..self.filled];
            let hit = self
                .separators
                .as_bytes()
                .iter()
                .filter_map(|&sep| memchr::memchr(sep, window))
                .min();
            if let Some(i) = hit {
                run.extend_from_slice(&window[..i]);
                let mark = window[i];
                self.pos += i + 1;
                return Ok(Some((String::from_utf8_lossy(&run).into_owned(), Some(mark))));
            }
            run.extend_from_slice(window);
            self.pos = self.filled;
            if !self.fill()? {
                return Ok(Some((String::from_utf8_lossy(&run).into_owned(), None)));
            }
        }
    }

    /// Refill the buffer if drained. Returns whether any data is available.
    fn fill(&mut self) -> Result<bool> {
        if self.pos < self.filled {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        let n = loop {
            match self.source.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {},
                Err(e) => return Err(e.into()),
            }
        };
        self.pos = 0;
        self.filled = n;
        if n == 0 {
            self.eof = true;
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

impl<R: Read> Iterator for SeparatorTokenizer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
