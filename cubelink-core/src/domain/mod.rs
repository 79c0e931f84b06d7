//! Core domain types
//!
//! This module contains the domain structures shared between the HTTP
//! clients (which fetch and deliver them) and the daemon (which diffs,
//! formats and executes them).

pub mod build;
pub mod command;
pub mod notification;
