//! Notifier
//!
//! Best-effort, at-most-once delivery of notifications to the receiver.
//! A failed delivery is logged and the notification is gone: there is no
//! queue and no retry. The receiver resynchronizes through `/builds`.

use async_trait::async_trait;
use cubelink_client::ReceiverClient;
use cubelink_core::domain::notification::NotificationPayload;
use tracing::{debug, error};

use crate::error::RelayError;

/// Service trait for delivering notifications downstream
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one payload, reporting failure to the caller
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError>;

    /// Delivers one payload, logging and dropping it on failure
    async fn notify(&self, payload: NotificationPayload) {
        match self.deliver(&payload).await {
            Ok(()) => debug!("Delivered {:?}", payload.pairs()),
            Err(e) => error!(
                "Dropping {} notification: {:#}",
                payload.action().unwrap_or("unknown"),
                e
            ),
        }
    }
}

/// Notifier posting to the receiver over HTTP
pub struct HttpNotifier {
    client: ReceiverClient,
}

impl HttpNotifier {
    pub fn new(client: ReceiverClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError> {
        self.client
            .send(payload)
            .await
            .map_err(RelayError::Delivery)
    }
}
