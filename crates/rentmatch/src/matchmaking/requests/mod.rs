//! Rental request lifecycle: domain records, eligibility and activity
//! policies, the backend collaborator contract, and the HTTP surface.
//!
//! The policies are pure functions over timestamped records; the current
//! time is always an explicit parameter. I/O lives behind [`RequestBackend`]
//! and nothing here mutates a request's status directly.

pub mod backend;
pub mod countdown;
pub mod domain;
pub mod policy;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, RequestBackend, RequestView};
pub use countdown::CountdownTicker;
pub use domain::{
    parse_created_at, LandlordId, RentalRequest, RequestId, RequestLedger, RequestRecord,
    RequestStatus, TenantId, TimestampWarning,
};
pub use policy::{
    BlockedReason, Countdown, Eligibility, LandlordRequestWindow, PolicyConfig, PolicyEngine,
    TenantAcceptanceWindow, TenantActivityView,
};
pub use router::request_router;
pub use service::{LandlordOverview, MatchmakingService, SendDecision, ServiceError};
