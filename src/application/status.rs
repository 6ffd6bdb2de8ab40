use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of recent poll cycles, shared with the HTTP layer
#[derive(Debug, Default)]
pub struct PollStatus {
    inner: RwLock<StatusSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    pub last_success: Option<DateTime<Utc>>,
    pub consecutive_failures: u64,
}

impl StatusSnapshot {
    pub fn is_healthy(&self) -> bool {
        self.last_success.is_some() && self.consecutive_failures == 0
    }
}

impl PollStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, at: DateTime<Utc>) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.last_success = Some(at);
        inner.consecutive_failures = 0;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.consecutive_failures += 1;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
