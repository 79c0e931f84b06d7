//! Self-invocation trigger
//!
//! Lets callers that cannot speak HTTP poke a running daemon by launching
//! the binary with a single path argument: `cubelink builds`.

use reqwest::StatusCode;
use tracing::{error, info};

use crate::error::RelayError;

/// Builds the daemon URL for a trigger path
pub fn trigger_url(bind_addr: &str, path: &str) -> String {
    format!("http://{}/{}", bind_addr, path.trim_start_matches('/'))
}

/// Issues one GET against the local daemon
pub async fn send_trigger(bind_addr: &str, path: &str) -> Result<StatusCode, RelayError> {
    let url = trigger_url(bind_addr, path);

    let response = reqwest::get(&url)
        .await
        .map_err(|source| RelayError::Connectivity {
            url: url.clone(),
            source,
        })?;

    Ok(response.status())
}

/// Sends the trigger and logs the outcome; never fails
pub async fn run_trigger(bind_addr: &str, path: &str) {
    match send_trigger(bind_addr, path).await {
        Ok(status) => info!(
            "Request sent {} StatusCode: {}",
            trigger_url(bind_addr, path),
            status.as_u16()
        ),
        Err(e) => error!("Error on request: {:#}", e),
    }
}
