//! Daemon configuration
//!
//! Every setting is read from an environment variable and falls back to a
//! built-in default. Each lookup is logged so the effective configuration
//! can be reconstructed from the startup log.

use std::net::SocketAddr;
use std::time::Duration;

use cubelink_core::diff::DiffStrategy;
use tokio::sync::Semaphore;
use tracing::info;

/// Upper bound for task parallelism and queue capacity
const MAX_TASKS: usize = Semaphore::MAX_PERMITS;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// CI server base URL (e.g., "http://ci.example.com")
    pub ci_url: String,

    /// Owner of the watched repository
    pub repo_owner: String,

    /// Name of the watched repository
    pub repo_name: String,

    /// Optional CI API token
    pub ci_token: Option<String>,

    /// How often the poller fetches the build list
    pub poll_interval: Duration,

    /// How new builds are detected between polls
    pub diff_strategy: DiffStrategy,

    /// Receiver endpoint notifications are posted to
    pub receiver_url: String,

    pub receiver_username: String,

    pub receiver_password: String,

    /// Address the request server listens on; also the trigger target
    pub bind_addr: String,

    /// Suffix for rewriting `docker` into `docker-<version>` on /exec
    pub docker_version: Option<String>,

    /// Max background tasks (resyncs, commands) running at once
    pub max_parallel_tasks: usize,

    /// Max background tasks waiting for a free slot
    pub task_queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ci_url: "http://118.193.185.191".to_string(),
            repo_owner: "gaocegege".to_string(),
            repo_name: "hello-ci".to_string(),
            ci_token: None,
            poll_interval: Duration::from_secs(5),
            diff_strategy: DiffStrategy::Length,
            receiver_url: "http://127.0.0.1:8080/webadmin/Drone/Drone".to_string(),
            receiver_username: "admin".to_string(),
            receiver_password: "admin".to_string(),
            bind_addr: "127.0.0.1:8000".to_string(),
            docker_version: None,
            max_parallel_tasks: 4,
            task_queue_capacity: 64,
        }
    }
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Recognized variables (all optional):
    /// - CI_SERVER_URL, CI_REPO_OWNER, CI_REPO_NAME, CI_TOKEN
    /// - POLL_INTERVAL (seconds), DIFF_STRATEGY (length | ids)
    /// - RECEIVER_URL, RECEIVER_USERNAME, RECEIVER_PASSWORD
    /// - BIND_ADDR, DOCKER_VERSION
    /// - MAX_PARALLEL_TASKS, TASK_QUEUE_CAPACITY
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let string = |name: &str, default: String| match var(name) {
            Some(value) => {
                info!("Env variable {} found, using env value: {}", name, value);
                value
            }
            None => {
                info!("Env variable {} not found, using default value: {}", name, default);
                default
            }
        };

        let secret = |name: &str, default: String| match var(name) {
            Some(value) => {
                info!("Env variable {} found, using env value", name);
                value
            }
            None => {
                info!("Env variable {} not found, using default value", name);
                default
            }
        };

        let optional = |name: &str| {
            let value = var(name);
            match &value {
                Some(_) => info!("Env variable {} found", name),
                None => info!("Env variable {} not found, leaving unset", name),
            }
            value
        };

        let number = |name: &str, default: u64| -> anyhow::Result<u64> {
            match var(name) {
                Some(value) => {
                    info!("Env variable {} found, using env value: {}", name, value);
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| anyhow::anyhow!("{} must be a number: {}", name, e))
                }
                None => {
                    info!("Env variable {} not found, using default value: {}", name, default);
                    Ok(default)
                }
            }
        };

        let count = |name: &str, default: usize| -> anyhow::Result<usize> {
            let value = number(name, default as u64)?;
            usize::try_from(value)
                .map_err(|_| anyhow::anyhow!("{} is too large: {}", name, value))
        };

        let diff_strategy = string("DIFF_STRATEGY", defaults.diff_strategy.to_string())
            .parse::<DiffStrategy>()
            .map_err(|e| anyhow::anyhow!("DIFF_STRATEGY: {}", e))?;

        Ok(Self {
            ci_url: string("CI_SERVER_URL", defaults.ci_url),
            repo_owner: string("CI_REPO_OWNER", defaults.repo_owner),
            repo_name: string("CI_REPO_NAME", defaults.repo_name),
            ci_token: optional("CI_TOKEN"),
            poll_interval: Duration::from_secs(number(
                "POLL_INTERVAL",
                defaults.poll_interval.as_secs(),
            )?),
            diff_strategy,
            receiver_url: string("RECEIVER_URL", defaults.receiver_url),
            receiver_username: string("RECEIVER_USERNAME", defaults.receiver_username),
            receiver_password: secret("RECEIVER_PASSWORD", defaults.receiver_password),
            bind_addr: string("BIND_ADDR", defaults.bind_addr),
            docker_version: optional("DOCKER_VERSION"),
            max_parallel_tasks: count("MAX_PARALLEL_TASKS", defaults.max_parallel_tasks)?,
            task_queue_capacity: count("TASK_QUEUE_CAPACITY", defaults.task_queue_capacity)?,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [("ci_url", &self.ci_url), ("receiver_url", &self.receiver_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.repo_owner.trim().is_empty() {
            anyhow::bail!("repo_owner cannot be empty");
        }

        if self.repo_name.trim().is_empty() {
            anyhow::bail!("repo_name cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_parallel_tasks == 0 || self.max_parallel_tasks > MAX_TASKS {
            anyhow::bail!("max_parallel_tasks must be between 1 and {}", MAX_TASKS);
        }

        if self.task_queue_capacity == 0 || self.task_queue_capacity > MAX_TASKS {
            anyhow::bail!("task_queue_capacity must be between 1 and {}", MAX_TASKS);
        }

        self.bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("bind_addr '{}' is invalid: {}", self.bind_addr, e))?;

        Ok(())
    }
}
