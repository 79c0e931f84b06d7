//! Build source
//!
//! Where the poller and the resync task get their build lists from.

use async_trait::async_trait;
use cubelink_client::CiClient;
use cubelink_core::domain::build::BuildSnapshot;
use tracing::debug;

use crate::error::RelayError;

/// Service trait for retrieving the current build list
#[async_trait]
pub trait BuildSource: Send + Sync {
    /// Fetches a fresh snapshot of all builds
    async fn fetch(&self) -> Result<BuildSnapshot, RelayError>;
}

/// Build source backed by the CI server's repository API
pub struct CiBuildSource {
    client: CiClient,
    owner: String,
    repo: String,
}

impl CiBuildSource {
    pub fn new(client: CiClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl BuildSource for CiBuildSource {
    async fn fetch(&self) -> Result<BuildSnapshot, RelayError> {
        let builds = self
            .client
            .list_builds(&self.owner, &self.repo)
            .await
            .map_err(RelayError::Fetch)?;

        debug!(
            "Fetched {} builds for {}/{}",
            builds.len(),
            self.owner,
            self.repo
        );
        Ok(BuildSnapshot::new(builds))
    }
}
