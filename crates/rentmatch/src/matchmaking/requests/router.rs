use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::backend::{BackendError, RequestBackend};
use super::domain::{parse_created_at, LandlordId, RequestId, RequestStatus, TenantId};
use super::policy::BlockedReason;
use super::service::{MatchmakingService, SendDecision, ServiceError};

/// Router builder exposing the request lifecycle over HTTP.
pub fn request_router<B>(service: Arc<MatchmakingService<B>>) -> Router
where
    B: RequestBackend + 'static,
{
    Router::new()
        .route("/api/v1/requests", post(send_handler::<B>))
        .route(
            "/api/v1/requests/:request_id/status",
            post(decide_handler::<B>),
        )
        .route(
            "/api/v1/landlords/:landlord_id/overview",
            get(overview_handler::<B>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/activity",
            get(activity_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendRequestBody {
    landlord_id: String,
    tenant_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecideRequestBody {
    status: RequestStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewParams {
    tenant: Option<String>,
    /// Evaluation instant (RFC 3339); defaults to the current time.
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityParams {
    active: Option<bool>,
    at: Option<String>,
}

pub(crate) async fn send_handler<B>(
    State(service): State<Arc<MatchmakingService<B>>>,
    axum::Json(body): axum::Json<SendRequestBody>,
) -> Response
where
    B: RequestBackend + 'static,
{
    let landlord_id = LandlordId(body.landlord_id);
    let tenant_id = TenantId(body.tenant_id);

    match service.send_request(&landlord_id, &tenant_id, Utc::now()) {
        Ok(SendDecision::Sent { request }) => {
            (StatusCode::CREATED, axum::Json(request)).into_response()
        }
        Ok(SendDecision::Blocked { eligibility }) => {
            let status = match eligibility.blocked_reason {
                Some(BlockedReason::LimitReached) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::CONFLICT,
            };
            let payload = json!({
                "error": eligibility.summary(),
                "eligibility": eligibility,
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(ServiceError::Backend(BackendError::DuplicateRequest)) => error_response(
            StatusCode::CONFLICT,
            BackendError::DuplicateRequest.to_string(),
        ),
        Err(ServiceError::Backend(BackendError::LimitExceeded)) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            BackendError::LimitExceeded.to_string(),
        ),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn decide_handler<B>(
    State(service): State<Arc<MatchmakingService<B>>>,
    Path(request_id): Path<String>,
    axum::Json(body): axum::Json<DecideRequestBody>,
) -> Response
where
    B: RequestBackend + 'static,
{
    let id = RequestId(request_id);
    match service.decide_request(&id, body.status) {
        Ok(request) => (StatusCode::OK, axum::Json(request.view())).into_response(),
        Err(ServiceError::Backend(err @ BackendError::InvalidTransition { .. })) => {
            error_response(StatusCode::CONFLICT, err.to_string())
        }
        Err(ServiceError::Backend(BackendError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, BackendError::NotFound.to_string())
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn overview_handler<B>(
    State(service): State<Arc<MatchmakingService<B>>>,
    Path(landlord_id): Path<String>,
    Query(params): Query<OverviewParams>,
) -> Response
where
    B: RequestBackend + 'static,
{
    let now = match evaluation_instant(params.at.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };
    let landlord_id = LandlordId(landlord_id);
    let target_tenant = params.tenant.map(TenantId);

    match service.landlord_overview(&landlord_id, target_tenant.as_ref(), now) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

pub(crate) async fn activity_handler<B>(
    State(service): State<Arc<MatchmakingService<B>>>,
    Path(tenant_id): Path<String>,
    Query(params): Query<ActivityParams>,
) -> Response
where
    B: RequestBackend + 'static,
{
    let now = match evaluation_instant(params.at.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };
    let tenant_id = TenantId(tenant_id);
    let is_active = params.active.unwrap_or(true);

    match service.tenant_activity(&tenant_id, is_active, now) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn evaluation_instant(raw: Option<&str>) -> Result<DateTime<Utc>, Response> {
    match raw {
        None => Ok(Utc::now()),
        Some(value) => parse_created_at(value).ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("failed to parse '{value}' as an RFC 3339 timestamp"),
            )
        }),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
