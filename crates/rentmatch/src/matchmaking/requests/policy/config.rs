use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Dials for the request-limit and inactivity windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Pending requests a landlord may hold inside the counting window.
    pub max_active_pending: usize,
    /// Width of the counting window for "active" pending requests.
    pub active_window_hours: i64,
    /// Days after the oldest accepted request before a tenant deactivates.
    pub inactivity_window_days: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_active_pending: 2,
            active_window_hours: 24,
            inactivity_window_days: 5,
        }
    }
}

impl PolicyConfig {
    pub fn active_window(&self) -> Duration {
        Duration::hours(self.active_window_hours)
    }

    pub fn inactivity_window(&self) -> Duration {
        Duration::days(self.inactivity_window_days)
    }
}
