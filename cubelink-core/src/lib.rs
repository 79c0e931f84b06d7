//! Cubelink Core
//!
//! Core types and abstractions for the Cubelink bridge daemon.
//!
//! This crate contains:
//! - Domain types: Build records, snapshots, notifications, command requests
//! - Diff: Detection of newly appeared builds between two snapshots

pub mod diff;
pub mod domain;
