//! CSV import of request histories for offline reports and analysis.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::matchmaking::requests::domain::RequestLedger;

use parser::RowOutcome;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownStatus { id: String, value: String },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read request history: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid request history CSV: {}", err),
            HistoryImportError::UnknownStatus { id, value } => {
                write!(f, "request '{}' carries unknown status '{}'", id, value)
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::UnknownStatus { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RequestHistoryImporter;

impl RequestHistoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RequestLedger, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Build a ledger from CSV columns `Request ID, Landlord ID, Tenant ID,
    /// Status, Created At`. Unknown statuses abort the import; malformed
    /// timestamps become per-record ledger warnings instead.
    pub fn from_reader<R: Read>(reader: R) -> Result<RequestLedger, HistoryImportError> {
        let mut records = Vec::new();

        for outcome in parser::parse_records(reader)? {
            match outcome {
                RowOutcome::Record(record) => records.push(record),
                RowOutcome::UnknownStatus { id, value } => {
                    return Err(HistoryImportError::UnknownStatus { id, value });
                }
            }
        }

        Ok(RequestLedger::from_records(records))
    }
}
