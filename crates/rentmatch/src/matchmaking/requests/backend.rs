use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{LandlordId, RentalRequest, RequestId, RequestRecord, RequestStatus, TenantId};

/// Contract with the backend that owns the request records.
///
/// Fetches return raw records (timestamps unvalidated, as they come off the
/// wire); the ledger strips malformed ones into warnings. The backend is the
/// authority on the duplicate and limit rules: it may reject a create even
/// when a client-side pre-check passed, e.g. two browser tabs racing.
pub trait RequestBackend: Send + Sync {
    fn landlord_requests(&self, landlord_id: &LandlordId)
        -> Result<Vec<RequestRecord>, BackendError>;

    fn tenant_requests(&self, tenant_id: &TenantId) -> Result<Vec<RequestRecord>, BackendError>;

    fn create_request(
        &self,
        landlord_id: &LandlordId,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<RentalRequest, BackendError>;

    fn update_status(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<RentalRequest, BackendError>;
}

/// Failures surfaced verbatim from the backend collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("a pending request between this landlord and tenant already exists")]
    DuplicateRequest,
    #[error("active pending request limit reached")]
    LimitExceeded,
    #[error("request is {} and cannot become {}", from.label(), to.label())]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("request not found")]
    NotFound,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a request for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestView {
    pub id: RequestId,
    pub landlord_id: LandlordId,
    pub tenant_id: TenantId,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

impl RentalRequest {
    pub fn view(&self) -> RequestView {
        RequestView {
            id: self.id.clone(),
            landlord_id: self.landlord_id.clone(),
            tenant_id: self.tenant_id.clone(),
            status: self.status.label(),
            created_at: self.created_at,
        }
    }
}
