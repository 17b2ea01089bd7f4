use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for rental requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Identifier wrapper for landlords (request senders).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandlordId(pub String);

/// Identifier wrapper for tenants (request recipients).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Lifecycle state of a rental request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// A request only ever moves Pending -> Accepted or Pending -> Rejected.
    pub const fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (
                RequestStatus::Pending,
                RequestStatus::Accepted | RequestStatus::Rejected
            )
        )
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }
}

/// A single rental offer from a landlord to a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub id: RequestId,
    pub landlord_id: LandlordId,
    pub tenant_id: TenantId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl RentalRequest {
    /// Wire representation, as the backend collaborator reports it.
    pub fn to_record(&self) -> RequestRecord {
        RequestRecord {
            id: self.id.clone(),
            landlord_id: self.landlord_id.clone(),
            tenant_id: self.tenant_id.clone(),
            status: self.status,
            created_at: Some(self.created_at.to_rfc3339()),
        }
    }
}

/// Raw request record as fetched from the backend, before timestamp validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub landlord_id: LandlordId,
    pub tenant_id: TenantId,
    pub status: RequestStatus,
    pub created_at: Option<String>,
}

/// Non-fatal note about a record dropped from window calculations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampWarning {
    pub request_id: RequestId,
    pub raw: Option<String>,
    pub detail: String,
}

/// Validated, deterministically ordered snapshot of one party's requests.
///
/// Records with a malformed or missing `created_at` are excluded from the
/// snapshot and reported as warnings; the remaining records still process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLedger {
    requests: Vec<RentalRequest>,
    warnings: Vec<TimestampWarning>,
}

impl RequestLedger {
    pub fn from_records(records: Vec<RequestRecord>) -> Self {
        let mut requests = Vec::with_capacity(records.len());
        let mut warnings = Vec::new();

        for record in records {
            match record.created_at.as_deref() {
                None => warnings.push(TimestampWarning {
                    request_id: record.id,
                    raw: None,
                    detail: "missing created_at".to_string(),
                }),
                Some(raw) => match parse_created_at(raw) {
                    Some(created_at) => requests.push(RentalRequest {
                        id: record.id,
                        landlord_id: record.landlord_id,
                        tenant_id: record.tenant_id,
                        status: record.status,
                        created_at,
                    }),
                    None => warnings.push(TimestampWarning {
                        request_id: record.id,
                        raw: Some(raw.to_string()),
                        detail: format!("unparseable created_at '{}'", raw.trim()),
                    }),
                },
            }
        }

        Self::from_requests_with_warnings(requests, warnings)
    }

    pub fn from_requests(requests: Vec<RentalRequest>) -> Self {
        Self::from_requests_with_warnings(requests, Vec::new())
    }

    fn from_requests_with_warnings(
        mut requests: Vec<RentalRequest>,
        warnings: Vec<TimestampWarning>,
    ) -> Self {
        // Ties on created_at break by id ascending so listings stay stable.
        requests.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Self { requests, warnings }
    }

    pub fn requests(&self) -> &[RentalRequest] {
        &self.requests
    }

    pub fn warnings(&self) -> &[TimestampWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Lenient timestamp parsing: RFC 3339 first, bare dates as midnight UTC.
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, created_at: Option<&str>) -> RequestRecord {
        RequestRecord {
            id: RequestId(id.to_string()),
            landlord_id: LandlordId("malik-1".to_string()),
            tenant_id: TenantId(format!("bhadot-{id}")),
            status: RequestStatus::Pending,
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn status_transitions_only_leave_pending() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Accepted));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
        assert!(!RequestStatus::Accepted.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Accepted.can_transition_to(RequestStatus::Rejected));
        assert!(!RequestStatus::Rejected.can_transition_to(RequestStatus::Accepted));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn parse_created_at_supports_rfc3339_and_date_strings() {
        let rfc = parse_created_at("2026-03-04T10:30:00+06:00").expect("parse rfc3339");
        assert_eq!(rfc, Utc.with_ymd_and_hms(2026, 3, 4, 4, 30, 0).unwrap());

        let date = parse_created_at("2026-03-04").expect("parse date");
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap());

        assert!(parse_created_at("  ").is_none());
        assert!(parse_created_at("yesterday").is_none());
    }

    #[test]
    fn ledger_collects_warnings_instead_of_failing() {
        let ledger = RequestLedger::from_records(vec![
            record("req-1", Some("2026-03-04T10:30:00Z")),
            record("req-2", None),
            record("req-3", Some("not-a-date")),
            record("req-4", Some("2026-03-01")),
        ]);

        assert_eq!(ledger.requests().len(), 2);
        assert_eq!(ledger.warnings().len(), 2);
        assert_eq!(ledger.warnings()[0].request_id, RequestId("req-2".into()));
        assert!(ledger.warnings()[1].detail.contains("not-a-date"));
    }

    #[test]
    fn ledger_orders_by_created_at_then_id() {
        let same_instant = "2026-03-04T10:30:00Z";
        let ledger = RequestLedger::from_records(vec![
            record("req-9", Some(same_instant)),
            record("req-2", Some("2026-03-05T08:00:00Z")),
            record("req-1", Some(same_instant)),
        ]);

        let ids: Vec<&str> = ledger
            .requests()
            .iter()
            .map(|request| request.id.0.as_str())
            .collect();
        assert_eq!(ids, vec!["req-1", "req-9", "req-2"]);
    }
}
