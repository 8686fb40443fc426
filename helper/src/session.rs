//! The configuration the helper remembers between notifications.

use std::sync::{Arc, PoisonError, RwLock};

use todoist_core::ClientConfig;

/// Holds the most recent `ClientConfig` received from the front-end.
///
/// Clones share the same slot. Readers get an `Arc` snapshot, so replacing
/// the config never changes a request that already took its snapshot.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Arc<RwLock<Option<Arc<ClientConfig>>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held config and return the new snapshot.
    pub fn replace(&self, config: ClientConfig) -> Arc<ClientConfig> {
        let config = Arc::new(config);
        let mut slot = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&config));
        config
    }

    pub fn current(&self) -> Option<Arc<ClientConfig>> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert!(Session::new().current().is_none());
    }

    #[test]
    fn replace_is_visible_through_clones() {
        let session = Session::new();
        let other = session.clone();
        session.replace(ClientConfig::new("a"));
        assert_eq!(other.current().unwrap().access_token, "a");
    }

    #[test]
    fn earlier_snapshot_survives_replacement() {
        let session = Session::new();
        let first = session.replace(ClientConfig::new("first"));
        session.replace(ClientConfig::new("second"));
        assert_eq!(first.access_token, "first");
        assert_eq!(session.current().unwrap().access_token, "second");
    }
}
