//! Command relay API Handler

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, warn};

use super::ACK;
use crate::service::{Task, TaskSender};

/// First `cmd` value of a query; later repetitions are ignored
pub fn first_cmd(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == "cmd")
        .map(|(_, value)| value)
}

/// GET /exec?cmd=<command line>
/// Queue a command line for execution
pub async fn exec_command(
    State(tasks): State<TaskSender>,
    Query(params): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    match first_cmd(params) {
        Some(cmd) => {
            debug!("Command requested: {}", cmd);
            tasks.submit(Task::Exec(cmd));
        }
        None => warn!("Exec request without cmd parameter"),
    }
    (StatusCode::OK, ACK)
}
