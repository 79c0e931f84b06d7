//! Background task dispatcher
//!
//! Request handlers acknowledge immediately and hand their work to this
//! dispatcher through a one-way, bounded queue. The dispatcher runs at most
//! `max_parallel` tasks at once; when the queue is full new submissions are
//! dropped with a warning instead of piling up.

use cubelink_core::domain::notification::{Action, NotificationPayload};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::context::Context;
use crate::error::RelayError;
use crate::service::{BuildSource, CommandExecutor, Notifier};

/// Work submitted by the request server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Fetch the full build list and forward every build
    Resync,
    /// Run a raw `cmd` value as a child process
    Exec(String),
}

/// Submission side of the task queue
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: mpsc::Sender<Task>,
}

impl TaskSender {
    /// Queues a task without waiting
    ///
    /// Returns `false` when the task was dropped because the queue is full
    /// or the dispatcher is gone.
    pub fn submit(&self, task: Task) -> bool {
        match self.tx.try_send(task) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(task)) => {
                warn!("Task queue full, dropping {:?}", task);
                false
            }
            Err(mpsc::error::TrySendError::Closed(task)) => {
                warn!("Task dispatcher stopped, dropping {:?}", task);
                false
            }
        }
    }
}

/// Executes tasks; shared by all dispatcher workers
pub struct TaskRunner {
    source: Arc<dyn BuildSource>,
    notifier: Arc<dyn Notifier>,
    executor: CommandExecutor,
}

impl TaskRunner {
    pub fn new(context: &Context) -> Self {
        Self {
            source: Arc::clone(&context.source),
            notifier: Arc::clone(&context.notifier),
            executor: CommandExecutor::new(context.config.docker_version.clone()),
        }
    }

    /// Runs one task, logging any failure
    pub async fn run(&self, task: Task) {
        match task {
            Task::Resync => match resync(self.source.as_ref(), self.notifier.as_ref()).await {
                Ok(count) => info!("Resync forwarded {} build(s)", count),
                Err(e) => error!("Resync failed: {:#}", e),
            },
            Task::Exec(cmd) => {
                if let Err(e) = self.executor.run(&cmd).await {
                    error!("{:#}", e);
                }
            }
        }
    }
}

/// Forwards every build of a freshly fetched list as `buildsInfo`
///
/// Independent of the poller: it neither reads nor replaces the poller's
/// snapshot.
pub async fn resync(source: &dyn BuildSource, notifier: &dyn Notifier) -> Result<usize, RelayError> {
    let snapshot = source.fetch().await?;
    debug!("Resyncing {} build(s)", snapshot.len());

    for build in snapshot.records() {
        notifier
            .notify(NotificationPayload::build(Action::BuildsInfo, build))
            .await;
    }

    Ok(snapshot.len())
}

/// Receiving side of the task queue
pub struct TaskDispatcher {
    rx: mpsc::Receiver<Task>,
    runner: Arc<TaskRunner>,
    semaphore: Arc<Semaphore>,
}

impl TaskDispatcher {
    /// Creates a dispatcher and the sender feeding it
    pub fn new(runner: TaskRunner, max_parallel: usize, capacity: usize) -> (Self, TaskSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let dispatcher = Self {
            rx,
            runner: Arc::new(runner),
            semaphore: Arc::new(Semaphore::new(max_parallel)),
        };
        (dispatcher, TaskSender { tx })
    }

    /// Starts the dispatch loop on the runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drains the queue until every sender is dropped
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            // Wait for a free slot; pending tasks stay in the bounded queue
            let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                break;
            };
            let runner = Arc::clone(&self.runner);

            tokio::spawn(async move {
                runner.run(task).await;
                // Permit is released when dropped
                drop(permit);
            });
        }

        debug!("Task dispatcher stopped");
    }
}
