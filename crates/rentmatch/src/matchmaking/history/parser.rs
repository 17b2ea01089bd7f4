use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::matchmaking::requests::domain::{
    LandlordId, RequestId, RequestRecord, RequestStatus, TenantId,
};

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Request ID")]
    id: String,
    #[serde(rename = "Landlord ID")]
    landlord_id: String,
    #[serde(rename = "Tenant ID")]
    tenant_id: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Created At", default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
}

pub(crate) enum RowOutcome {
    Record(RequestRecord),
    UnknownStatus { id: String, value: String },
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RowOutcome>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<HistoryRow>() {
        let row = row?;
        let outcome = match RequestStatus::parse(&row.status) {
            Some(status) => RowOutcome::Record(RequestRecord {
                id: RequestId(row.id),
                landlord_id: LandlordId(row.landlord_id),
                tenant_id: TenantId(row.tenant_id),
                status,
                created_at: row.created_at,
            }),
            None => RowOutcome::UnknownStatus {
                id: row.id,
                value: row.status,
            },
        };
        rows.push(outcome);
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
