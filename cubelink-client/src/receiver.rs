//! Downstream receiver (game-server plugin) delivery

use cubelink_core::domain::notification::NotificationPayload;
use reqwest::Client;
use tracing::debug;

use crate::error::Result;
use crate::handle_empty_response;

/// HTTP client posting notifications to the receiver endpoint
///
/// Every payload is sent as one `application/x-www-form-urlencoded` POST
/// with static basic-auth credentials.
#[derive(Debug, Clone)]
pub struct ReceiverClient {
    /// Full endpoint URL (e.g., "http://127.0.0.1:8080/webadmin/Drone/Drone")
    url: String,
    username: String,
    password: String,
    client: Client,
}

impl ReceiverClient {
    /// Create a new receiver client
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            client: Client::new(),
        }
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts one payload; the response body is ignored
    pub async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        debug!("Posting {:?} to {}", payload.pairs(), self.url);

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .form(payload.pairs())
            .send()
            .await?;

        handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::{Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
    use cubelink_core::domain::build::BuildRecord;
    use cubelink_core::domain::notification::Action;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_send_posts_form_with_basic_auth() {
        let (tx, mut rx) = mpsc::unbounded_channel::<(HeaderMap, String)>();
        let app = Router::new()
            .route(
                "/webadmin/Drone/Drone",
                post(
                    |State(tx): State<mpsc::UnboundedSender<(HeaderMap, String)>>,
                     headers: HeaderMap,
                     body: String| async move {
                        tx.send((headers, body)).unwrap();
                        "ok"
                    },
                ),
            )
            .with_state(tx);
        let base = serve(app).await;

        let client = ReceiverClient::new(format!("{}/webadmin/Drone/Drone", base), "admin", "admin");
        let payload =
            NotificationPayload::build(Action::StartBuild, &BuildRecord::new(42, 7, "running"));
        client.send(&payload).await.unwrap();

        let (headers, body) = rx.recv().await.unwrap();
        assert_eq!(body, "action=startBuild&id=42&name=7&running=running");
        assert_eq!(
            headers.get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/x-www-form-urlencoded")
        );
        // admin:admin
        assert_eq!(
            headers.get("authorization").and_then(|v| v.to_str().ok()),
            Some("Basic YWRtaW46YWRtaW4=")
        );
    }

    #[tokio::test]
    async fn test_send_reports_rejection() {
        let app = Router::new().route(
            "/webadmin/Drone/Drone",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base = serve(app).await;

        let client = ReceiverClient::new(format!("{}/webadmin/Drone/Drone", base), "admin", "wrong");
        let payload =
            NotificationPayload::build(Action::BuildsInfo, &BuildRecord::new(1, 1, "success"));
        let err = client.send(&payload).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_send_unreachable() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReceiverClient::new(format!("http://{}/", addr), "admin", "admin");
        let payload =
            NotificationPayload::build(Action::StartBuild, &BuildRecord::new(1, 1, "pending"));
        let err = client.send(&payload).await.unwrap_err();
        assert!(matches!(err, crate::ClientError::RequestFailed(_)));
    }
}
