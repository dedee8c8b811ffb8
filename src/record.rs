//! The decoded record: leader plus addressable fields.
//!
//! A [`Record`] is built once per decode cycle from a contiguous byte
//! slice delimited by the record terminator and is immutable to consumers
//! afterwards. Fields are kept both in decode order (per directory entry)
//! and aggregated into one [`FieldCollection`] per tag in first-seen
//! order, so repeated, non-adjacent directory entries for a tag land in a
//! single collection.

use crate::error::Result;
use crate::field::Field;
use crate::field_collection::FieldCollection;
use crate::leader::Leader;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One decoded ISO 2709 record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The record's 24-byte leader.
    pub leader: Leader,
    fields: Vec<Field>,
    collections: IndexMap<String, FieldCollection>,
}

impl Record {
    /// Create an empty record with the given leader.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
            collections: IndexMap::new(),
        }
    }

    /// Append a decoded field, keeping decode order and the per-tag
    /// aggregation in step.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TagMismatch`](crate::DecodeError::TagMismatch)
    /// if the tag-keyed collection rejects the field; with collections
    /// keyed by the field's own tag this does not happen in practice, but
    /// the invariant is enforced rather than assumed.
    pub fn add_field(&mut self, field: Field) -> Result<()> {
        self.collections
            .entry(field.tag().to_string())
            .or_default()
            .add(field.clone())?;
        self.fields.push(field);
        Ok(())
    }

    /// Fields in decode order (per record, per directory entry).
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of decoded fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The collection aggregating all fields of a tag, if the tag occurred.
    #[must_use]
    pub fn collection(&self, tag: &str) -> Option<&FieldCollection> {
        self.collections.get(tag)
    }

    /// Iterate over per-tag collections in first-seen tag order.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &FieldCollection)> {
        self.collections.iter().map(|(tag, c)| (tag.as_str(), c))
    }

    /// Tags present in this record, in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Consume the record and return its fields in decode order.
    #[must_use]
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}
