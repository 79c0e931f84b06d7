//! CI server build listing

use cubelink_core::domain::build::BuildRecord;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;
use crate::handle_response;

/// HTTP client for the CI server's repository API
#[derive(Debug, Clone)]
pub struct CiClient {
    /// Base URL of the CI server (e.g., "http://ci.example.com")
    base_url: String,
    /// Optional API token sent as a bearer credential
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl CiClient {
    /// Create a new CI client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the CI server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new CI client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Attach an API token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the CI server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every build of a repository, in the order the server returns them
    ///
    /// # Arguments
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    pub async fn list_builds(&self, owner: &str, repo: &str) -> Result<Vec<BuildRecord>> {
        let url = format!("{}/api/repos/{}/{}/builds", self.base_url, owner, repo);
        debug!("Fetching builds from {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        handle_response(response).await
    }
}
