//! Notification payloads delivered to the downstream receiver

use std::fmt;

use super::build::BuildRecord;

/// Kind of build notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A build appeared since the previous poll
    StartBuild,
    /// Part of an on-demand full listing
    BuildsInfo,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::StartBuild => "startBuild",
            Action::BuildsInfo => "buildsInfo",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat key/value payload for one POST to the receiver
///
/// Pairs keep insertion order so the encoded body is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pairs: Vec<(&'static str, String)>,
}

impl NotificationPayload {
    /// Payload describing a build: `action`, `id`, `name`, `running`
    pub fn build(action: Action, build: &BuildRecord) -> Self {
        Self {
            pairs: vec![
                ("action", action.as_str().to_string()),
                ("id", build.id.to_string()),
                ("name", build.number.to_string()),
                ("running", build.status.clone()),
            ],
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn action(&self) -> Option<&str> {
        self.get("action")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_payload_keys() {
        let build = BuildRecord::new(42, 17, "running");
        let payload = NotificationPayload::build(Action::StartBuild, &build);

        let keys: Vec<&str> = payload.pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["action", "id", "name", "running"]);
        assert_eq!(payload.action(), Some("startBuild"));
        assert_eq!(payload.get("id"), Some("42"));
        assert_eq!(payload.get("name"), Some("17"));
        assert_eq!(payload.get("running"), Some("running"));
    }

    #[test]
    fn test_builds_info_action() {
        let build = BuildRecord::new(1, 1, "success");
        let payload = NotificationPayload::build(Action::BuildsInfo, &build);
        assert_eq!(payload.action(), Some("buildsInfo"));
    }
}
