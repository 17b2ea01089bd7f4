use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rentmatch::matchmaking::requests::{
    BackendError, LandlordId, PolicyConfig, PolicyEngine, RentalRequest, RequestBackend,
    RequestId, RequestLedger, RequestRecord, RequestStatus, TenantId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory request store. The backend is the authority on the duplicate
/// and limit rules: both are re-checked under this lock no matter what the
/// caller's pre-check concluded.
pub(crate) struct InMemoryRequestBackend {
    requests: Mutex<Vec<RentalRequest>>,
    engine: PolicyEngine,
    sequence: AtomicU64,
}

impl InMemoryRequestBackend {
    pub(crate) fn new(config: PolicyConfig) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            engine: PolicyEngine::new(config),
            sequence: AtomicU64::new(0),
        }
    }

    /// Insert a record bypassing enforcement, for demo seeding.
    pub(crate) fn insert_unchecked(&self, request: RentalRequest) {
        self.requests
            .lock()
            .expect("backend mutex poisoned")
            .push(request);
    }

    fn next_id(&self) -> RequestId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId(format!("req-{id:06}"))
    }
}

impl Default for InMemoryRequestBackend {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl RequestBackend for InMemoryRequestBackend {
    fn landlord_requests(
        &self,
        landlord_id: &LandlordId,
    ) -> Result<Vec<RequestRecord>, BackendError> {
        let guard = self.requests.lock().expect("backend mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| request.landlord_id == *landlord_id)
            .map(RentalRequest::to_record)
            .collect())
    }

    fn tenant_requests(&self, tenant_id: &TenantId) -> Result<Vec<RequestRecord>, BackendError> {
        let guard = self.requests.lock().expect("backend mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| request.tenant_id == *tenant_id)
            .map(RentalRequest::to_record)
            .collect())
    }

    fn create_request(
        &self,
        landlord_id: &LandlordId,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<RentalRequest, BackendError> {
        let mut guard = self.requests.lock().expect("backend mutex poisoned");

        let duplicate = guard.iter().any(|request| {
            request.landlord_id == *landlord_id
                && request.tenant_id == *tenant_id
                && request.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(BackendError::DuplicateRequest);
        }

        let mine: Vec<RentalRequest> = guard
            .iter()
            .filter(|request| request.landlord_id == *landlord_id)
            .cloned()
            .collect();
        let window = self
            .engine
            .landlord_window(RequestLedger::from_requests(mine).requests(), now);
        if window.active_pending_count >= self.engine.config().max_active_pending {
            return Err(BackendError::LimitExceeded);
        }

        let request = RentalRequest {
            id: self.next_id(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ids(suffix: &str) -> (LandlordId, TenantId) {
        (
            LandlordId("malik-1".to_string()),
            TenantId(format!("bhadot-{suffix}")),
        )
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let backend = InMemoryRequestBackend::default();
        let now = Utc::now();
        let (landlord, tenant_a) = ids("a");
        let (_, tenant_b) = ids("b");

        let first = backend
            .create_request(&landlord, &tenant_a, now)
            .expect("create succeeds");
        let second = backend
            .create_request(&landlord, &tenant_b, now)
            .expect("create succeeds");

        assert_eq!(first.id, RequestId("req-000001".to_string()));
        assert_eq!(second.id, RequestId("req-000002".to_string()));
    }

    #[test]
    fn duplicate_and_cap_are_enforced_server_side() {
        let backend = InMemoryRequestBackend::default();
        let now = Utc::now();
        let (landlord, tenant_a) = ids("a");
        let (_, tenant_b) = ids("b");
        let (_, tenant_c) = ids("c");

        backend
            .create_request(&landlord, &tenant_a, now)
            .expect("first create");
        assert!(matches!(
            backend.create_request(&landlord, &tenant_a, now),
            Err(BackendError::DuplicateRequest)
        ));

        backend
            .create_request(&landlord, &tenant_b, now)
            .expect("second create");
        assert!(matches!(
            backend.create_request(&landlord, &tenant_c, now),
            Err(BackendError::LimitExceeded)
        ));
    }

    #[test]
    fn cap_ignores_requests_that_left_the_window() {
        let backend = InMemoryRequestBackend::default();
        let now = Utc::now();
        let (landlord, tenant_a) = ids("a");
        let (_, tenant_b) = ids("b");
        let (_, tenant_c) = ids("c");

        backend.insert_unchecked(RentalRequest {
            id: RequestId("req-old".to_string()),
            landlord_id: landlord.clone(),
            tenant_id: tenant_a,
            status: RequestStatus::Pending,
            created_at: now - Duration::hours(25),
        });
        backend
            .create_request(&landlord, &tenant_b, now)
            .expect("one active slot used");

        backend
            .create_request(&landlord, &tenant_c, now)
            .expect("expired pending request frees a slot");
    }

    #[test]
    fn update_status_rejects_settled_requests() {
        let backend = InMemoryRequestBackend::default();
        let now = Utc::now();
        let (landlord, tenant_a) = ids("a");

        let request = backend
            .create_request(&landlord, &tenant_a, now)
            .expect("create succeeds");
        backend
            .update_status(&request.id, RequestStatus::Accepted)
            .expect("accept succeeds");

        assert!(matches!(
            backend.update_status(&request.id, RequestStatus::Rejected),
            Err(BackendError::InvalidTransition { .. })
        ));
        assert!(matches!(
            backend.update_status(&RequestId("req-missing".to_string()), RequestStatus::Accepted),
            Err(BackendError::NotFound)
        ));
    }
}
