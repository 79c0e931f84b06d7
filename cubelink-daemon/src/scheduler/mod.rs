//! Scheduler layer for the daemon
//!
//! This layer periodically polls the CI server and turns newly appeared
//! builds into notifications.

pub mod poller;

pub use poller::BuildPoller;
