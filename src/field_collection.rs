//! Ordered collections of fields sharing one tag.
//!
//! A [`FieldCollection`] aggregates the repeated subfields of a tag within
//! one record. Insertion order is preserved and duplicate subfield
//! identifiers are allowed and meaningful. Once non-empty, the collection
//! is tag-locked: adding a field with a different tag is an error.

use crate::error::{DecodeError, Result};
use crate::field::Field;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An insertion-ordered sequence of [`Field`] values sharing the same tag.
///
/// # Examples
///
/// ```
/// use iso2709::{Field, FieldCollection};
///
/// let prototype = Field::new("016");
/// let mut collection = FieldCollection::new();
/// for id in ["1", "2", "3"] {
///     collection.add(prototype.clone().with_subfield_id(id))?;
/// }
/// assert_eq!(collection.to_spec(), "016$123");
/// # Ok::<(), iso2709::DecodeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCollection {
    fields: SmallVec<[Field; 4]>,
}

impl FieldCollection {
    /// Create an empty collection. The tag is locked by the first `add`.
    #[must_use]
    pub fn new() -> Self {
        FieldCollection {
            fields: SmallVec::new(),
        }
    }

    /// The tag all members share, or `None` while the collection is empty.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.fields.first().map(Field::tag)
    }

    /// Append a field.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TagMismatch`] if the collection is non-empty
    /// and the field's tag differs from the collection's tag.
    pub fn add(&mut self, field: Field) -> Result<()> {
        if let Some(tag) = self.tag() {
            if tag != field.tag() {
                return Err(DecodeError::TagMismatch {
                    expected: tag.to_string(),
                    found: field.tag().to_string(),
                });
            }
        }
        self.fields.push(field);
        Ok(())
    }

    /// The first member, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Field> {
        self.fields.first()
    }

    /// The last member, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Field> {
        self.fields.last()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Members as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Field] {
        &self.fields
    }

    /// Compact structural serialization of the collection.
    ///
    /// The tag, followed by `$` only if at least one member has a subfield
    /// identifier, followed by all subfield identifiers in insertion order.
    /// A pure function of the current contents: calling it twice without
    /// mutation yields identical output. Empty collections serialize to the
    /// empty string.
    #[must_use]
    pub fn to_spec(&self) -> String {
        let Some(tag) = self.tag() else {
            return String::new();
        };
        let mut spec = String::from(tag);
        let ids: String = self.fields.iter().filter_map(Field::subfield_id).collect();
        if self.fields.iter().any(Field::is_subfield) {
            spec.push('$');
            spec.push_str(&ids);
        }
        spec
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
