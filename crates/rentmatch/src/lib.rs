//! Core library for the rental matchmaking request/accept workflow:
//! eligibility and activity policies, the backend collaborator contract,
//! and the HTTP router the API service mounts.

pub mod config;
pub mod error;
pub mod matchmaking;
pub mod telemetry;
