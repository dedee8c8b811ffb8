//! Shared helpers for assembling ISO 2709 record bytes in tests.
#![allow(dead_code)]

use iso2709::leader::{Leader, LEADER_LENGTH};
use iso2709::separators::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};

/// Assembles one record's bytes, computing the directory and the leader's
/// length and base-address fields from the listed payloads.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    fields: Vec<(String, Vec<u8>)>,
    leader: Leader,
}

impl RecordAssembler {
    pub fn new() -> Self {
        RecordAssembler::default()
    }

    /// Override the leader template; lengths and the base address are
    /// still computed by `build`.
    pub fn leader(mut self, leader: Leader) -> Self {
        self.leader = leader;
        self
    }

    /// Add a control field holding a plain value.
    pub fn control(self, tag: &str, value: &str) -> Self {
        self.raw(tag, value.as_bytes().to_vec())
    }

    /// Add a data field with indicator characters and subfields.
    pub fn data(self, tag: &str, indicator: &str, subfields: &[(&str, &str)]) -> Self {
        let mut payload = indicator.as_bytes().to_vec();
        for (id, value) in subfields {
            payload.push(SUBFIELD_DELIMITER);
            payload.extend_from_slice(id.as_bytes());
            payload.extend_from_slice(value.as_bytes());
        }
        self.raw(tag, payload)
    }

    /// Add a field with an arbitrary raw payload. The field terminator is
    /// appended by `build`.
    pub fn raw(mut self, tag: &str, payload: Vec<u8>) -> Self {
        self.fields.push((tag.to_string(), payload));
        self
    }

    /// Number of `Field` values a decode of this record must produce:
    /// one per control field, one per subfield of a data field, and one
    /// for a data field with no subfields at all.
    pub fn expected_field_count(&self) -> usize {
        self.fields
            .iter()
            .map(|(tag, payload)| {
                if tag.starts_with("00") {
                    1
                } else {
                    let subfields = payload
                        .iter()
                        .filter(|&&b| b == SUBFIELD_DELIMITER)
                        .count();
                    subfields.max(1)
                }
            })
            .sum()
    }

    pub fn build(self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, payload) in &self.fields {
            let start = data.len();
            data.extend_from_slice(payload);
            data.push(FIELD_TERMINATOR);
            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{:04}", payload.len() + 1).as_bytes());
            directory.extend_from_slice(format!("{start:05}").as_bytes());
        }
        let base = LEADER_LENGTH + directory.len() + 1;
        let leader = Leader {
            record_length: base + data.len() + 1,
            base_address: base,
            ..self.leader
        };
        let mut record = leader.as_bytes();
        record.extend_from_slice(&directory);
        record.push(FIELD_TERMINATOR);
        record.extend_from_slice(&data);
        record.push(RECORD_TERMINATOR);
        record
    }
}

/// A deterministic multi-record corpus with a field total known by
/// construction. Returns the concatenated bytes and the expected total.
pub fn synthetic_corpus(records: usize) -> (Vec<u8>, usize) {
    let mut bytes = Vec::new();
    let mut expected = 0;
    for i in 0..records {
        let mut assembler = RecordAssembler::new()
            .control("001", &format!("rec{i:05}"))
            .data("245", "10", &[("a", "Title"), ("c", "Author")]);
        for j in 0..i % 4 {
            assembler = assembler.data("650", " 0", &[("a", &format!("Subject {j}"))]);
        }
        expected += assembler.expected_field_count();
        bytes.extend_from_slice(&assembler.build());
    }
    (bytes, expected)
}
