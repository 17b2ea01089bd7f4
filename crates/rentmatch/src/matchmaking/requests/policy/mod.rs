mod activity;
mod config;
mod eligibility;

pub use activity::{Countdown, TenantAcceptanceWindow, TenantActivityView};
pub use config::PolicyConfig;
pub use eligibility::{BlockedReason, Eligibility, LandlordRequestWindow};

use chrono::{DateTime, Utc};

use super::domain::{RentalRequest, TenantId};

/// Stateless evaluator applying the request-limit and inactivity dials.
///
/// Every method is a complete, independent computation over an immutable
/// snapshot; `now` is always injected so outcomes are reproducible.
pub struct PolicyEngine {
    config: PolicyConfig,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Whether a new request to `target_tenant` may be sent now.
    pub fn eligibility(
        &self,
        requests: &[RentalRequest],
        target_tenant: &TenantId,
        now: DateTime<Utc>,
    ) -> Eligibility {
        eligibility::evaluate(requests, target_tenant, now, &self.config)
    }

    /// Pending-window figures for a landlord's dashboard.
    pub fn landlord_window(
        &self,
        requests: &[RentalRequest],
        now: DateTime<Utc>,
    ) -> LandlordRequestWindow {
        eligibility::derive_window(requests, now, &self.config)
    }

    /// Countdown and display state for a tenant's dashboard.
    pub fn tenant_activity(
        &self,
        requests: &[RentalRequest],
        is_active: bool,
        now: DateTime<Utc>,
    ) -> TenantActivityView {
        activity::evaluate(requests, is_active, now, &self.config)
    }

    pub fn acceptance_window(&self, requests: &[RentalRequest]) -> Option<TenantAcceptanceWindow> {
        activity::acceptance_window(requests, &self.config)
    }
}
