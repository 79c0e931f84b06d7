//! Build listing API Handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use super::ACK;
use crate::service::{Task, TaskSender};

/// GET /builds
/// Queue a full resync of the build list to the receiver
pub async fn list_builds(State(tasks): State<TaskSender>) -> impl IntoResponse {
    debug!("Resync requested");
    tasks.submit(Task::Resync);
    (StatusCode::OK, ACK)
}
