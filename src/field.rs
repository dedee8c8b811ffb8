//! The field value type.
//!
//! A [`Field`] is one tagged unit of data within a record: tag, indicator
//! sequence, optional subfield identifier, and optional payload. Fields are
//! plain values; the decoder produces sibling subfields from a prototype
//! field by cloning it and overriding one attribute, which never mutates
//! the prototype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field in an ISO 2709 record.
///
/// # Examples
///
/// Copy-with-override construction preserves the untouched attributes:
///
/// ```
/// use iso2709::Field;
///
/// let prototype = Field::new("016").with_indicator("  ");
/// let subfield = prototype.clone().with_subfield_id("a").with_data("value");
///
/// assert_eq!(subfield.tag(), "016");
/// assert_eq!(subfield.indicator(), "  ");
/// assert_eq!(subfield.subfield_id(), Some("a"));
/// assert_eq!(prototype.subfield_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    tag: String,
    indicator: String,
    subfield_id: Option<String>,
    data: Option<String>,
}

impl Field {
    /// Create a field with the given tag, no indicator, no subfield
    /// identifier, and no data.
    pub fn new(tag: impl Into<String>) -> Self {
        Field {
            tag: tag.into(),
            indicator: String::new(),
            subfield_id: None,
            data: None,
        }
    }

    /// Return a copy with the indicator sequence replaced.
    #[must_use]
    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = indicator.into();
        self
    }

    /// Return a copy with the subfield identifier replaced.
    #[must_use]
    pub fn with_subfield_id(mut self, subfield_id: impl Into<String>) -> Self {
        self.subfield_id = Some(subfield_id.into());
        self
    }

    /// Return a copy with the payload replaced.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The indicator sequence; empty when the field carries none.
    #[must_use]
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// The subfield identifier, if this field is a subfield.
    #[must_use]
    pub fn subfield_id(&self) -> Option<&str> {
        self.subfield_id.as_deref()
    }

    /// The payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// True for control fields (tags `000`–`009`), which carry neither
    /// indicators nor subfields.
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.tag.as_bytes().starts_with(b"00")
    }

    /// True if this field carries a subfield identifier.
    #[must_use]
    pub fn is_subfield(&self) -> bool {
        self.subfield_id.is_some()
    }

    /// The designator: tag plus indicator plus subfield identifier.
    #[must_use]
    pub fn designator(&self) -> String {
        let mut s = String::with_capacity(self.tag.len() + self.indicator.len() + 2);
        s.push_str(&self.tag);
        s.push_str(&self.indicator);
        if let Some(id) = &self.subfield_id {
            s.push_str(id);
        }
        s
    }
}

impl fmt::Display for Field {
    /// Formats as `designator` or `designator=data`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.designator())?;
        if let Some(data) = &self.data {
            write!(f, "={data}")?;
        }
        Ok(())
    }
}
