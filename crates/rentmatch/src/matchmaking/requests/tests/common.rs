use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::matchmaking::requests::backend::{BackendError, RequestBackend};
use crate::matchmaking::requests::domain::{
    LandlordId, RentalRequest, RequestId, RequestLedger, RequestRecord, RequestStatus, TenantId,
};
use crate::matchmaking::requests::policy::{PolicyConfig, PolicyEngine};
use crate::matchmaking::requests::router::request_router;
use crate::matchmaking::requests::service::MatchmakingService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
}

pub(super) fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn landlord() -> LandlordId {
    LandlordId("malik-1".to_string())
}

pub(super) fn tenant(suffix: &str) -> TenantId {
    TenantId(format!("bhadot-{suffix}"))
}

pub(super) fn request(
    id: &str,
    tenant_suffix: &str,
    status: RequestStatus,
    created_at: DateTime<Utc>,
) -> RentalRequest {
    RentalRequest {
        id: RequestId(id.to_string()),
        landlord_id: landlord(),
        tenant_id: tenant(tenant_suffix),
        status,
        created_at,
    }
}

pub(super) fn policy_config() -> PolicyConfig {
    PolicyConfig::default()
}

pub(super) fn engine() -> PolicyEngine {
    PolicyEngine::new(policy_config())
}

pub(super) fn build_service() -> (
    MatchmakingService<MemoryBackend>,
    Arc<MemoryBackend>,
) {
    let backend = Arc::new(MemoryBackend::default());
    let service = MatchmakingService::new(backend.clone(), policy_config());
    (service, backend)
}

pub(super) fn build_router(backend: Arc<MemoryBackend>) -> axum::Router {
    let service = Arc::new(MatchmakingService::new(backend, policy_config()));
    request_router(service)
}

/// In-memory authority over the request records, mirroring the real
/// backend's enforcement of the duplicate and limit rules.
#[derive(Default)]
pub(super) struct MemoryBackend {
    requests: Mutex<Vec<RentalRequest>>,
    raw_extras: Mutex<Vec<RequestRecord>>,
    sequence: AtomicU64,
    pub(super) creates: AtomicU64,
}

impl MemoryBackend {
    pub(super) fn seed(&self, request: RentalRequest) {
        self.requests
            .lock()
            .expect("backend mutex poisoned")
            .push(request);
    }

    /// Inject a raw record verbatim, e.g. one with a broken timestamp.
    pub(super) fn seed_raw(&self, record: RequestRecord) {
        self.raw_extras
            .lock()
            .expect("backend mutex poisoned")
            .push(record);
    }

    pub(super) fn create_calls(&self) -> u64 {
        self.creates.load(Ordering::Relaxed)
    }

    fn records_for<F>(&self, filter: F) -> Vec<RequestRecord>
    where
        F: Fn(&RequestRecord) -> bool,
    {
        let typed = self.requests.lock().expect("backend mutex poisoned");
        let raw = self.raw_extras.lock().expect("backend mutex poisoned");
        typed
            .iter()
            .map(RentalRequest::to_record)
            .chain(raw.iter().cloned())
            .filter(|record| filter(record))
            .collect()
    }
}

impl RequestBackend for MemoryBackend {
    fn landlord_requests(
        &self,
        landlord_id: &LandlordId,
    ) -> Result<Vec<RequestRecord>, BackendError> {
        Ok(self.records_for(|record| record.landlord_id == *landlord_id))
    }

    fn tenant_requests(&self, tenant_id: &TenantId) -> Result<Vec<RequestRecord>, BackendError> {
        Ok(self.records_for(|record| record.tenant_id == *tenant_id))
    }

    fn create_request(
        &self,
        landlord_id: &LandlordId,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<RentalRequest, BackendError> {
        self.creates.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.requests.lock().expect("backend mutex poisoned");

        let duplicate = guard.iter().any(|request| {
            request.landlord_id == *landlord_id
                && request.tenant_id == *tenant_id
                && request.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(BackendError::DuplicateRequest);
        }

        let config = policy_config();
        let mine: Vec<RentalRequest> = guard
            .iter()
            .filter(|request| request.landlord_id == *landlord_id)
            .cloned()
            .collect();
        let window = PolicyEngine::new(config.clone())
            .landlord_window(RequestLedger::from_requests(mine).requests(), now);
        if window.active_pending_count >= config.max_active_pending {
            return Err(BackendError::LimitExceeded);
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let request = RentalRequest {
            id: RequestId(format!("req-{id:06}")),
            landlord_id: landlord_id.clone(),
            tenant_id: tenant_id.clone(),
            status: RequestStatus::Pending,
            created_at: now,
        };
        guard.push(request.clone());
        Ok(request)
    }

    fn update_status(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<RentalRequest, BackendError> {
        let mut guard = self.requests.lock().expect("backend mutex poisoned");
        let request = guard
            .iter_mut()
            .find(|request| request.id == *request_id)
            .ok_or(BackendError::NotFound)?;

        if !request.status.can_transition_to(status) {
            return Err(BackendError::InvalidTransition {
                from: request.status,
                to: status,
            });
        }

        request.status = status;
        Ok(request.clone())
    }
}

/// Backend whose listing is stale: the pre-check sees no conflicts, but the
/// authoritative create still rejects, as with two racing browser tabs.
pub(super) struct RacingBackend {
    pub(super) rejection: fn() -> BackendError,
}

impl RequestBackend for RacingBackend {
    fn landlord_requests(
        &self,
        _landlord_id: &LandlordId,
    ) -> Result<Vec<RequestRecord>, BackendError> {
        Ok(Vec::new())
    }

    fn tenant_requests(&self, _tenant_id: &TenantId) -> Result<Vec<RequestRecord>, BackendError> {
        Ok(Vec::new())
    }

    fn create_request(
        &self,
        _landlord_id: &LandlordId,
        _tenant_id: &TenantId,
        _now: DateTime<Utc>,
    ) -> Result<RentalRequest, BackendError> {
        Err((self.rejection)())
    }

    fn update_status(
        &self,
        _request_id: &RequestId,
        _status: RequestStatus,
    ) -> Result<RentalRequest, BackendError> {
        Err((self.rejection)())
    }
}

pub(super) struct UnavailableBackend;

impl RequestBackend for UnavailableBackend {
    fn landlord_requests(
        &self,
        _landlord_id: &LandlordId,
    ) -> Result<Vec<RequestRecord>, BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }

    fn tenant_requests(&self, _tenant_id: &TenantId) -> Result<Vec<RequestRecord>, BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }

    fn create_request(
        &self,
        _landlord_id: &LandlordId,
        _tenant_id: &TenantId,
        _now: DateTime<Utc>,
    ) -> Result<RentalRequest, BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _request_id: &RequestId,
        _status: RequestStatus,
    ) -> Result<RentalRequest, BackendError> {
        Err(BackendError::Unavailable("database offline".to_string()))
    }
}
