#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`leader`] — the fixed 24-byte record leader
//! - [`directory`] — fixed-width field descriptors and their invariants
//! - [`field`] — the [`Field`] value type
//! - [`field_collection`] — per-tag aggregation with `to_spec` serialization
//! - [`decoder`] — one-record-at-a-time directory-based decoding
//! - [`stream`] — the lazy record/field stream façade
//! - [`tokenizer`] — separator-delimited scanning for non-directory dialects
//! - [`separators`] — control characters and the configurable boundary class
//! - [`error`] — error types and the [`Result`] alias
//!
//! ## Decoding model
//!
//! Raw bytes flow either through the [`SeparatorTokenizer`] (when the
//! source is a plain separator-delimited stream) or directly into the
//! [`RecordDecoder`] (when the full leader/directory structure is
//! present), producing [`Field`] and [`FieldCollection`] values that the
//! [`RecordStream`] façade exposes as lazy sequences. Decoding is
//! single-threaded and pull-based; each stream owns its source
//! exclusively and releases it on drop.

pub mod decoder;
pub mod directory;
pub mod error;
pub mod field;
pub mod field_collection;
pub mod leader;
pub mod record;
pub mod separators;
pub mod stream;
pub mod tokenizer;

pub use decoder::RecordDecoder;
pub use directory::DirectoryEntry;
pub use error::{DecodeError, Result};
pub use field::Field;
pub use field_collection::FieldCollection;
pub use leader::Leader;
pub use record::Record;
pub use separators::SeparatorSet;
pub use stream::{ErrorPolicy, Fields, RecordStream, Records};
pub use tokenizer::{SeparatorTokenizer, Token};
