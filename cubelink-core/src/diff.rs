//! Snapshot diffing
//!
//! Finds the builds that appeared between two consecutive snapshots.
//!
//! The default strategy compares lengths only: the CI server is assumed to
//! append new builds at the tail, so anything past the previous length is
//! new. A list that shrinks or reorders goes undetected. `NewIds` is an
//! opt-in alternative that reports every build whose id was not present
//! before, in the order of the new snapshot.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::build::{BuildRecord, BuildSnapshot};

/// How new builds are detected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffStrategy {
    /// Records at indices `[prev.len(), next.len())`
    #[default]
    Length,
    /// Records of `next` whose id is absent from `prev`
    NewIds,
}

impl FromStr for DiffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(DiffStrategy::Length),
            "ids" => Ok(DiffStrategy::NewIds),
            other => Err(format!("unknown diff strategy '{}'", other)),
        }
    }
}

impl fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffStrategy::Length => f.write_str("length"),
            DiffStrategy::NewIds => f.write_str("ids"),
        }
    }
}

/// Returns the builds of `next` considered new relative to `prev`
pub fn new_builds<'a>(
    prev: &BuildSnapshot,
    next: &'a BuildSnapshot,
    strategy: DiffStrategy,
) -> Vec<&'a BuildRecord> {
    match strategy {
        DiffStrategy::Length => {
            if next.len() <= prev.len() {
                return Vec::new();
            }
            next.records()[prev.len()..].iter().collect()
        }
        DiffStrategy::NewIds => {
            let known: HashSet<i64> = prev.records().iter().map(|b| b.id).collect();
            next.records()
                .iter()
                .filter(|b| !known.contains(&b.id))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ids: &[i64]) -> BuildSnapshot {
        BuildSnapshot::new(
            ids.iter()
                .map(|&id| BuildRecord::new(id, id * 10, format!("status-{}", id)))
                .collect(),
        )
    }

    #[test]
    fn test_length_reports_appended_tail() {
        let prev = snapshot(&[1, 2]);
        let next = snapshot(&[1, 2, 3, 4, 5]);

        let new = new_builds(&prev, &next, DiffStrategy::Length);
        let ids: Vec<i64> = new.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(new[0].number, 30);
        assert_eq!(new[0].status, "status-3");
    }

    #[test]
    fn test_length_equal_or_shrunk_reports_nothing() {
        let prev = snapshot(&[1, 2, 3]);
        assert!(new_builds(&prev, &snapshot(&[4, 5, 6]), DiffStrategy::Length).is_empty());
        assert!(new_builds(&prev, &snapshot(&[1]), DiffStrategy::Length).is_empty());
        assert!(new_builds(&prev, &snapshot(&[]), DiffStrategy::Length).is_empty());
    }

    #[test]
    fn test_length_ignores_content_of_known_prefix() {
        // Reordered head plus one extra: only the tail index counts
        let prev = snapshot(&[1, 2]);
        let next = snapshot(&[2, 1, 9]);
        let ids: Vec<i64> = new_builds(&prev, &next, DiffStrategy::Length)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_new_ids_detects_head_insertions() {
        let prev = snapshot(&[1, 2]);
        let next = snapshot(&[3, 1, 2]);
        let ids: Vec<i64> = new_builds(&prev, &next, DiffStrategy::NewIds)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![3]);

        assert!(new_builds(&prev, &snapshot(&[2]), DiffStrategy::NewIds).is_empty());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("length".parse::<DiffStrategy>(), Ok(DiffStrategy::Length));
        assert_eq!(" IDS ".parse::<DiffStrategy>(), Ok(DiffStrategy::NewIds));
        assert!("set".parse::<DiffStrategy>().is_err());
        assert_eq!(DiffStrategy::default(), DiffStrategy::Length);
    }
}
