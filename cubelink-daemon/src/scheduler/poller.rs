//! Build poller
//!
//! Fetches the build list on a fixed interval, diffs it against the
//! previous fetch and sends one `startBuild` notification per new build.
//! The first successful fetch only establishes the baseline.

use cubelink_core::diff::{DiffStrategy, new_builds};
use cubelink_core::domain::build::BuildSnapshot;
use cubelink_core::domain::notification::{Action, NotificationPayload};
use std::sync::Arc;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::context::Context;
use crate::error::RelayError;
use crate::service::{BuildSource, Notifier};

/// Poller owning the last known build snapshot
pub struct BuildPoller {
    source: Arc<dyn BuildSource>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    strategy: DiffStrategy,
    /// `None` until the first successful fetch
    snapshot: Option<BuildSnapshot>,
}

impl BuildPoller {
    /// Creates a new build poller
    pub fn new(context: &Context) -> Self {
        Self {
            source: Arc::clone(&context.source),
            notifier: Arc::clone(&context.notifier),
            interval: context.config.poll_interval,
            strategy: context.config.diff_strategy,
            snapshot: None,
        }
    }

    /// Starts the polling loop; never returns
    pub async fn run(mut self) {
        info!(
            "Starting build poller (interval: {:?}, diff: {})",
            self.interval, self.strategy
        );

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.poll_once().await {
                Ok(sent) => {
                    if sent > 0 {
                        info!("Forwarded {} new build(s) this cycle", sent);
                    }
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                }
            }

            debug!(
                "Tick over ({} build(s) known)",
                self.snapshot().map_or(0, BuildSnapshot::len)
            );
        }
    }

    /// Performs a single poll cycle
    ///
    /// Returns the number of notifications sent. On a fetch error the
    /// previous snapshot is kept untouched.
    pub async fn poll_once(&mut self) -> Result<usize, RelayError> {
        let next = self.source.fetch().await?;

        let Some(prev) = self.snapshot.as_ref() else {
            info!("Baseline established with {} build(s)", next.len());
            self.snapshot = Some(next);
            return Ok(0);
        };

        let fresh = new_builds(prev, &next, self.strategy);
        let sent = fresh.len();

        for build in fresh {
            debug!("New build {} (#{}): {}", build.id, build.number, build.status);
            self.notifier
                .notify(NotificationPayload::build(Action::StartBuild, build))
                .await;
        }

        self.snapshot = Some(next);
        Ok(sent)
    }

    /// The last successfully fetched snapshot
    pub fn snapshot(&self) -> Option<&BuildSnapshot> {
        self.snapshot.as_ref()
    }
}
