//! Build domain types

use serde::{Deserialize, Serialize};

/// A single build as reported by the CI server
///
/// Only the fields forwarded downstream are kept; everything else the CI
/// server sends is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: i64,
    pub number: i64,
    pub status: String,
}

impl BuildRecord {
    pub fn new(id: i64, number: i64, status: impl Into<String>) -> Self {
        Self {
            id,
            number,
            status: status.into(),
        }
    }
}

/// All builds known as of one successful fetch
///
/// A snapshot is replaced whole on every fetch and never mutated in place.
/// The diff assumes the CI server only ever appends to the tail of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSnapshot {
    records: Vec<BuildRecord>,
}

impl BuildSnapshot {
    pub fn new(records: Vec<BuildRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BuildRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[BuildRecord] {
        &self.records
    }
}

impl From<Vec<BuildRecord>> for BuildSnapshot {
    fn from(records: Vec<BuildRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = r#"[
            {"id": 7, "number": 3, "status": "running", "event": "push", "commit": "abc"},
            {"id": 8, "number": 4, "status": "pending"}
        ]"#;

        let records: Vec<BuildRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], BuildRecord::new(7, 3, "running"));
        assert_eq!(records[1].status, "pending");
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = BuildSnapshot::from(vec![BuildRecord::new(1, 1, "success")]);
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.get(0).map(|b| b.id), Some(1));
        assert!(snapshot.get(1).is_none());
        assert!(BuildSnapshot::default().is_empty());
    }
}
