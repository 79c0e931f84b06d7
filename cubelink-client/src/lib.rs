//! Cubelink HTTP clients
//!
//! Type-safe HTTP clients for the two remote parties the daemon talks to:
//!
//! - [`CiClient`]: reads the build list of a repository from the CI server
//! - [`ReceiverClient`]: posts flat form-encoded notifications to the
//!   game-server plugin
//!
//! # Example
//!
//! ```no_run
//! use cubelink_client::CiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cubelink_client::ClientError> {
//!     let client = CiClient::new("http://ci.example.com");
//!     let builds = client.list_builds("octocat", "hello-ci").await?;
//!     println!("{} builds", builds.len());
//!     Ok(())
//! }
//! ```

mod builds;
pub mod error;
mod receiver;

pub use builds::CiClient;
pub use error::{ClientError, Result};
pub use receiver::ReceiverClient;

use serde::de::DeserializeOwned;

// =============================================================================
// Response Handlers
// =============================================================================

/// Handle an API response and deserialize JSON
///
/// Checks the status code and returns an appropriate error if the request
/// failed, or deserializes the response body if successful.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Handle an API response whose body is not interesting
async fn handle_empty_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serves `app` on an ephemeral local port and returns its base URL
    pub async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
