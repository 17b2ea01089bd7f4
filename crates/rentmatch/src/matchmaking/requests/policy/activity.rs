use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{RentalRequest, RequestStatus};
use super::config::PolicyConfig;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Time left until a tenant's advisory deactivation, decomposed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Remaining time from `now` to `deactivation_at`, clamped at zero and
    /// truncated to whole seconds.
    pub fn until(deactivation_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_remaining_seconds((deactivation_at - now).num_seconds().max(0))
    }

    pub(crate) fn from_remaining_seconds(remaining: i64) -> Self {
        let days = remaining / SECONDS_PER_DAY;
        let rest = remaining % SECONDS_PER_DAY;
        let hours = rest / SECONDS_PER_HOUR;
        let rest = rest % SECONDS_PER_HOUR;

        Self {
            days,
            hours,
            minutes: rest / SECONDS_PER_MINUTE,
            seconds: rest % SECONDS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    pub fn is_elapsed(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// Derived acceptance window for one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TenantAcceptanceWindow {
    pub oldest_accepted_at: DateTime<Utc>,
    pub deactivation_at: DateTime<Utc>,
}

/// Display state for a tenant's dashboard. The `is_active` flag is the
/// tenant's own toggle, passed through untouched; the countdown is advisory
/// and nothing here flips the flag when it elapses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantActivityView {
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_window: Option<TenantAcceptanceWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
}

pub(crate) fn acceptance_window(
    requests: &[RentalRequest],
    config: &PolicyConfig,
) -> Option<TenantAcceptanceWindow> {
    let oldest_accepted_at = requests
        .iter()
        .filter(|request| request.status == RequestStatus::Accepted)
        .map(|request| request.created_at)
        .min()?;

    Some(TenantAcceptanceWindow {
        oldest_accepted_at,
        deactivation_at: oldest_accepted_at + config.inactivity_window(),
    })
}

pub(crate) fn evaluate(
    requests: &[RentalRequest],
    is_active: bool,
    now: DateTime<Utc>,
    config: &PolicyConfig,
) -> TenantActivityView {
    let acceptance_window = acceptance_window(requests, config);

    TenantActivityView {
        is_active,
        acceptance_window,
        countdown: acceptance_window.map(|window| Countdown::until(window.deactivation_at, now)),
    }
}
