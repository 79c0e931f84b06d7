//! Daemon context
//!
//! Everything the background tasks share, built once at startup and handed
//! to the poller, the task runner and the request server. Nothing here is
//! mutable; the poller keeps its snapshot to itself.

use cubelink_client::{CiClient, ReceiverClient};
use std::sync::Arc;

use crate::config::Config;
use crate::service::{BuildSource, CiBuildSource, HttpNotifier, Notifier};

#[derive(Clone)]
pub struct Context {
    pub config: Arc<Config>,

    /// Where build lists come from
    pub source: Arc<dyn BuildSource>,

    /// Where notifications go
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    /// Builds the HTTP-backed context described by `config`
    pub fn from_config(config: Config) -> Self {
        let mut ci_client = CiClient::new(config.ci_url.clone());
        if let Some(token) = &config.ci_token {
            ci_client = ci_client.with_token(token.clone());
        }
        let source = CiBuildSource::new(
            ci_client,
            config.repo_owner.clone(),
            config.repo_name.clone(),
        );

        let notifier = HttpNotifier::new(ReceiverClient::new(
            config.receiver_url.clone(),
            config.receiver_username.clone(),
            config.receiver_password.clone(),
        ));

        Self::new(config, Arc::new(source), Arc::new(notifier))
    }

    pub fn new(
        config: Config,
        source: Arc<dyn BuildSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            source,
            notifier,
        }
    }
}
