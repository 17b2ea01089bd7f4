use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{RentalRequest, RequestStatus, TenantId};
use super::config::PolicyConfig;

/// Why a new request cannot be sent right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockedReason {
    #[serde(rename = "duplicate")]
    DuplicatePending,
    #[serde(rename = "limit")]
    LimitReached,
}

impl BlockedReason {
    pub const fn label(self) -> &'static str {
        match self {
            BlockedReason::DuplicatePending => "duplicate",
            BlockedReason::LimitReached => "limit",
        }
    }
}

/// Derived pending-request window for one landlord. Recomputed on every
/// fetch; holds no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandlordRequestWindow {
    /// Pending requests created strictly inside the counting window.
    pub active_pending_count: usize,
    /// Oldest pending request overall, not restricted to the window.
    pub oldest_pending_at: Option<DateTime<Utc>>,
    /// When the oldest pending request leaves the window. May already lie
    /// in the past, in which case the cap clears on the next evaluation.
    pub next_available_at: Option<DateTime<Utc>>,
}

/// Outcome of the eligibility check. "Not eligible" is a value, never an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eligibility {
    pub can_send: bool,
    pub active_pending_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<BlockedReason>,
}

impl Eligibility {
    pub fn summary(&self) -> String {
        match self.blocked_reason {
            None => format!(
                "eligible ({} active pending request(s))",
                self.active_pending_count
            ),
            Some(BlockedReason::DuplicatePending) => {
                "blocked: a pending request to this tenant already exists".to_string()
            }
            Some(BlockedReason::LimitReached) => match self.next_available_at {
                Some(at) => format!("blocked: request limit reached, next slot at {at}"),
                None => "blocked: request limit reached".to_string(),
            },
        }
    }
}

pub(crate) fn derive_window(
    requests: &[RentalRequest],
    now: DateTime<Utc>,
    config: &PolicyConfig,
) -> LandlordRequestWindow {
    let threshold = now - config.active_window();
    let mut active_pending_count = 0;
    let mut oldest_pending_at: Option<DateTime<Utc>> = None;

    for request in requests {
        if request.status != RequestStatus::Pending {
            continue;
        }

        // Strict comparison: a request created exactly at the threshold has
        // just expired and no longer counts as active.
        if request.created_at > threshold {
            active_pending_count += 1;
        }

        oldest_pending_at = match oldest_pending_at {
            Some(current) if current <= request.created_at => Some(current),
            _ => Some(request.created_at),
        };
    }

    LandlordRequestWindow {
        active_pending_count,
        oldest_pending_at,
        next_available_at: oldest_pending_at.map(|at| at + config.active_window()),
    }
}

pub(crate) fn evaluate(
    requests: &[RentalRequest],
    target_tenant: &TenantId,
    now: DateTime<Utc>,
    config: &PolicyConfig,
) -> Eligibility {
    let window = derive_window(requests, now, config);

    // A concurrent offer to the same tenant blocks regardless of the cap.
    let duplicate = requests.iter().any(|request| {
        request.status == RequestStatus::Pending && request.tenant_id == *target_tenant
    });
    if duplicate {
        return Eligibility {
            can_send: false,
            active_pending_count: window.active_pending_count,
            next_available_at: None,
            blocked_reason: Some(BlockedReason::DuplicatePending),
        };
    }

    if window.active_pending_count >= config.max_active_pending {
        return Eligibility {
            can_send: false,
            active_pending_count: window.active_pending_count,
            next_available_at: window.next_available_at,
            blocked_reason: Some(BlockedReason::LimitReached),
        };
    }

    Eligibility {
        can_send: true,
        active_pending_count: window.active_pending_count,
        next_available_at: None,
        blocked_reason: None,
    }
}
