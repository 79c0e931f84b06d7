//! Relay error taxonomy
//!
//! None of these are fatal for the process: each one ends the current
//! poll cycle, delivery or command, is logged, and the daemon carries on.

use cubelink_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The build list could not be retrieved
    #[error("failed to fetch builds: {0}")]
    Fetch(#[source] ClientError),

    /// A notification could not be posted to the receiver
    #[error("failed to deliver notification: {0}")]
    Delivery(#[source] ClientError),

    /// A relayed command failed to start or exited unsuccessfully
    #[error("command '{command}' failed: {reason}")]
    Execution { command: String, reason: String },

    /// The self-invocation request never reached the daemon
    #[error("failed to reach daemon at {url}: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
