//! Command executor
//!
//! Runs command lines received on `/exec` as child processes. The command
//! is not validated; the only rewrite is `docker` to its versioned binary.

use cubelink_core::domain::command::{ExecutionRequest, decode_command};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::RelayError;

/// Bytes of stderr kept for the error message; the rest is discarded
const STDERR_LIMIT: u64 = 4096;

/// Executes relayed command lines
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    docker_version: Option<String>,
}

impl CommandExecutor {
    pub fn new(docker_version: Option<String>) -> Self {
        Self { docker_version }
    }

    /// Builds the request that `run` would execute for a raw `cmd` value
    pub fn prepare(&self, raw: &str) -> Option<ExecutionRequest> {
        ExecutionRequest::parse(&decode_command(raw))
            .map(|req| req.rewrite_docker(self.docker_version.as_deref()))
    }

    /// Runs a command line to completion
    ///
    /// Stdout is discarded. Returns `Ok(false)` for a blank command line,
    /// which runs nothing.
    pub async fn run(&self, raw: &str) -> Result<bool, RelayError> {
        let Some(request) = self.prepare(raw) else {
            warn!("Ignoring empty command line");
            return Ok(false);
        };

        info!("Executing command: {}", request);

        let mut child = Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RelayError::Execution {
                command: request.to_string(),
                reason: format!("failed to start: {}", e),
            })?;

        let stderr = match child.stderr.take() {
            Some(pipe) => read_bounded(pipe, STDERR_LIMIT).await,
            None => Vec::new(),
        };

        let status = child.wait().await.map_err(|e| RelayError::Execution {
            command: request.to_string(),
            reason: format!("failed to wait: {}", e),
        })?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(RelayError::Execution {
                command: request.to_string(),
                reason: format!("{} {}", status, stderr.trim()).trim().to_string(),
            });
        }

        debug!("Command '{}' finished", request);
        Ok(true)
    }
}

/// Keeps the first `limit` bytes of `reader` and drains the rest
///
/// The child keeps writing until its pipe is read to the end, so the
/// remainder is consumed rather than left blocking it.
async fn read_bounded<R>(mut reader: R, limit: u64) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut head = Vec::new();
    if let Err(e) = (&mut reader).take(limit).read_to_end(&mut head).await {
        debug!("Failed to read child stderr: {}", e);
        return head;
    }
    if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
        debug!("Failed to drain child stderr: {}", e);
    }
    head
}
