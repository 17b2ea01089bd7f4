use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::backend::{BackendError, RequestBackend, RequestView};
use super::domain::{
    LandlordId, RentalRequest, RequestId, RequestLedger, RequestStatus, TenantId, TimestampWarning,
};
use super::policy::{
    Eligibility, LandlordRequestWindow, PolicyConfig, PolicyEngine, TenantActivityView,
};

/// Service composing the ledger, policy engine, and backend collaborator.
pub struct MatchmakingService<B> {
    backend: Arc<B>,
    engine: PolicyEngine,
}

/// Outcome of a send attempt. A failed pre-check is a returned value, not an
/// error; only backend failures propagate as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendDecision {
    Sent { request: RequestView },
    Blocked { eligibility: Eligibility },
}

/// Dashboard payload for one landlord.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandlordOverview {
    pub landlord_id: LandlordId,
    pub window: LandlordRequestWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<Eligibility>,
    pub requests: Vec<RequestView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TimestampWarning>,
}

impl<B> MatchmakingService<B>
where
    B: RequestBackend + 'static,
{
    pub fn new(backend: Arc<B>, config: PolicyConfig) -> Self {
        Self {
            backend,
            engine: PolicyEngine::new(config),
        }
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    /// Attempt to send a new request from `landlord_id` to `tenant_id`.
    ///
    /// The eligibility pre-check avoids a pointless round trip; the backend
    /// still enforces the rules and its rejection wins over a stale pass.
    pub fn send_request(
        &self,
        landlord_id: &LandlordId,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<SendDecision, ServiceError> {
        let ledger = self.landlord_ledger(landlord_id)?;
        let eligibility = self.engine.eligibility(ledger.requests(), tenant_id, now);
        if !eligibility.can_send {
            return Ok(SendDecision::Blocked { eligibility });
        }

        let request = self.backend.create_request(landlord_id, tenant_id, now)?;
        Ok(SendDecision::Sent {
            request: request.view(),
        })
    }

    /// Accept or reject a pending request.
    pub fn decide_request(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<RentalRequest, ServiceError> {
        Ok(self.backend.update_status(request_id, status)?)
    }

    /// Window, eligibility, and request listing for a landlord dashboard.
    pub fn landlord_overview(
        &self,
        landlord_id: &LandlordId,
        target_tenant: Option<&TenantId>,
        now: DateTime<Utc>,
    ) -> Result<LandlordOverview, ServiceError> {
        let ledger = self.landlord_ledger(landlord_id)?;
        let window = self.engine.landlord_window(ledger.requests(), now);
        let eligibility =
            target_tenant.map(|tenant| self.engine.eligibility(ledger.requests(), tenant, now));

        Ok(LandlordOverview {
            landlord_id: landlord_id.clone(),
            window,
            eligibility,
            requests: ledger.requests().iter().map(RentalRequest::view).collect(),
            warnings: ledger.warnings().to_vec(),
        })
    }

    /// Countdown and display state for a tenant dashboard. `is_active` is
    /// the tenant's own toggle, owned elsewhere.
    pub fn tenant_activity(
        &self,
        tenant_id: &TenantId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> Result<TenantActivityView, ServiceError> {
        let records = self.backend.tenant_requests(tenant_id)?;
        let ledger = RequestLedger::from_records(records);
        self.log_warnings(&ledger);

        Ok(self.engine.tenant_activity(ledger.requests(), is_active, now))
    }

    fn landlord_ledger(&self, landlord_id: &LandlordId) -> Result<RequestLedger, ServiceError> {
        let records = self.backend.landlord_requests(landlord_id)?;
        let ledger = RequestLedger::from_records(records);
        self.log_warnings(&ledger);
        Ok(ledger)
    }

    fn log_warnings(&self, ledger: &RequestLedger) {
        for warning in ledger.warnings() {
            warn!(
                request_id = %warning.request_id.0,
                detail = %warning.detail,
                "request record excluded from window calculations"
            );
        }
    }
}

/// Error raised by the matchmaking service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}
