//! Service layer
//!
//! Services contain the daemon's side effects: fetching builds, posting
//! notifications, running relayed commands and scheduling all of that in
//! the background.
//!
//! Fetching and delivery are trait-based so the poller and the task runner
//! can be exercised against in-memory fakes.

mod dispatcher;
mod executor;
mod notifier;
mod source;

pub use dispatcher::{Task, TaskDispatcher, TaskRunner, TaskSender};
pub use executor::CommandExecutor;
pub use notifier::{HttpNotifier, Notifier};
pub use source::{BuildSource, CiBuildSource};

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory doubles shared by the service, scheduler and api tests

    use async_trait::async_trait;
    use cubelink_client::ClientError;
    use cubelink_core::domain::build::{BuildRecord, BuildSnapshot};
    use cubelink_core::domain::notification::NotificationPayload;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    use super::{BuildSource, Notifier};
    use crate::error::RelayError;

    /// Hands out queued fetch results, then repeats the last one
    pub struct ScriptedSource {
        script: Mutex<VecDeque<Option<Vec<BuildRecord>>>>,
    }

    impl ScriptedSource {
        /// `None` entries produce a fetch error
        pub fn new(script: Vec<Option<Vec<BuildRecord>>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait]
    impl BuildSource for ScriptedSource {
        async fn fetch(&self) -> Result<BuildSnapshot, RelayError> {
            let mut script = self.script.lock().unwrap();
            let next = if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().cloned().flatten()
            };
            next.map(BuildSnapshot::new)
                .ok_or_else(|| RelayError::Fetch(ClientError::api_error(503, "ci down")))
        }
    }

    /// Records every delivered payload
    ///
    /// With `failing` set every delivery errors after being recorded. With
    /// a gate, deliveries block until the gate is opened.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub delivered: Mutex<Vec<NotificationPayload>>,
        pub failing: bool,
        pub gate: Option<Semaphore>,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn gated() -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Self::default()
            }
        }

        pub fn open_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1024);
            }
        }

        pub fn delivered(&self) -> Vec<NotificationPayload> {
            self.delivered.lock().unwrap().clone()
        }

        /// Waits until at least `count` payloads were recorded
        pub async fn wait_for(&self, count: usize) -> Vec<NotificationPayload> {
            for _ in 0..500 {
                let delivered = self.delivered();
                if delivered.len() >= count {
                    return delivered;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            panic!("expected {} deliveries, got {:?}", count, self.delivered());
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, payload: &NotificationPayload) -> Result<(), RelayError> {
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.delivered.lock().unwrap().push(payload.clone());
            if self.failing {
                return Err(RelayError::Delivery(ClientError::api_error(
                    502,
                    "receiver unreachable",
                )));
            }
            Ok(())
        }
    }

    pub fn builds(ids: &[i64]) -> Vec<BuildRecord> {
        ids.iter()
            .map(|&id| BuildRecord::new(id, id + 100, "running"))
            .collect()
    }
}
