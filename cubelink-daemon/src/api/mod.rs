//! API Module
//!
//! HTTP surface of the daemon. Every endpoint acknowledges immediately;
//! the actual work is queued on the task dispatcher and its outcome only
//! shows up in the log.

pub mod builds;
pub mod exec;
pub mod health;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::service::TaskSender;

/// Acknowledgement body returned by every endpoint
pub const ACK: &str = "OK";

/// Create the request server router
pub fn create_router(tasks: TaskSender) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/builds", get(builds::list_builds))
        .route("/exec", get(exec::exec_command))
        .with_state(tasks)
        .layer(TraceLayer::new_for_http())
}
