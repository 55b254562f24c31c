//! Record deduplication by identity key
//!
//! One pass over the records: the first record carrying a given key is
//! retained, every later one is reported as a duplicate, and records with
//! no key at all are set aside as skipped.

use crate::profile::FieldProfile;
use ahash::RandomState;
use hashbrown::HashMap;
use serde_json::{Map, Value};

/// One JSON object from the input array
pub type Record = Map<String, Value>;

/// Placeholder shown when a record lacks its display field
pub const MISSING_DISPLAY: &str = "N/A";

/// Canonical form of a key value
///
/// Keys compare by their compact JSON text, so `"1"` and `1` differ.
/// Numbers keep their source literal, so integers beyond 64 bits stay
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Key of `record` under `field`; `None` when absent or null
    pub fn of(record: &Record, field: &str) -> Option<Self> {
        match record.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Self(value.to_string())),
        }
    }
}

/// A dropped record, described for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateEntry {
    /// Shared key value
    pub key: Value,
    /// Display value of the record that was kept
    pub retained: String,
    /// Display value of the record that was dropped
    pub dropped: String,
}

/// Result of one deduplication pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Retained records, in input order
    pub unique: Vec<Record>,
    /// Later records whose key was already retained
    pub duplicates: Vec<DuplicateEntry>,
    /// Records with a missing or null key
    pub skipped: Vec<Record>,
}

impl DedupOutcome {
    /// Number of input records
    pub fn total(&self) -> usize {
        self.unique.len() + self.duplicates.len() + self.skipped.len()
    }

    /// Records removed from the output
    pub fn reduction(&self) -> usize {
        self.total() - self.unique.len()
    }

    /// Removed records as a percentage of the input, 0 for empty input
    pub fn reduction_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.reduction() as f64 / total as f64 * 100.0
    }
}

/// Seen keys, each mapped to the position of its retained record
#[derive(Debug, Default)]
pub struct KeyIndex {
    positions: HashMap<IdentityKey, usize, RandomState>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Record `key` at `position` unless already seen
    ///
    /// Returns the position of the earlier record for a known key.
    pub fn insert(&mut self, key: IdentityKey, position: usize) -> Option<usize> {
        match self.positions.entry(key) {
            hashbrown::hash_map::Entry::Occupied(e) => Some(*e.get()),
            hashbrown::hash_map::Entry::Vacant(e) => {
                e.insert(position);
                None
            }
        }
    }
}

/// Deduplicator bound to one field profile
#[derive(Debug, Clone, Copy)]
pub struct Deduplicator<'a> {
    key_field: &'a str,
    display_field: &'a str,
}

impl<'a> Deduplicator<'a> {
    pub fn new(profile: &'a FieldProfile) -> Self {
        Self::with_fields(&profile.key_field, &profile.display_field)
    }

    pub fn with_fields(key_field: &'a str, display_field: &'a str) -> Self {
        Self {
            key_field,
            display_field,
        }
    }

    /// Partition `records` into unique, duplicate and skipped sets
    pub fn run(&self, records: Vec<Record>) -> DedupOutcome {
        let mut index = KeyIndex::with_capacity(records.len());
        let mut outcome = DedupOutcome::default();

        for record in records {
            let Some(key) = IdentityKey::of(&record, self.key_field) else {
                outcome.skipped.push(record);
                continue;
            };

            match index.insert(key, outcome.unique.len()) {
                None => outcome.unique.push(record),
                Some(position) => {
                    let retained = &outcome.unique[position];
                    outcome.duplicates.push(DuplicateEntry {
                        key: record.get(self.key_field).cloned().unwrap_or(Value::Null),
                        retained: display_value(retained, self.display_field),
                        dropped: display_value(&record, self.display_field),
                    });
                }
            }
        }

        outcome
    }
}

/// Deduplicate `records` on `key_field`, describing duplicates by `display_field`
pub fn deduplicate(records: Vec<Record>, key_field: &str, display_field: &str) -> DedupOutcome {
    Deduplicator::with_fields(key_field, display_field).run(records)
}

/// Render a record's display field for reports
pub fn display_value(record: &Record, field: &str) -> String {
    match record.get(field) {
        None => MISSING_DISPLAY.to_string(),
        Some(value) => render_value(value),
    }
}

/// Strings render raw, everything else as compact JSON
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
