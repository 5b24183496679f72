use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored line could not be turned back into a [`Record`].
#[derive(Error, Debug)]
#[error("malformed record line: {0}")]
pub struct RecordParseError(#[from] serde_json::Error);

/// Normalized summary of one captured request. Every field is display text,
/// the raw body bytes never make it in here.
#[derive(Clone, Default, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub timestamp: String,
    pub origin_ip: String,
    pub method: String,
    pub scheme: String,
    pub http_version: String,
    pub path: String,
    pub headers: String,
    pub body: String,
}

impl Record {
    /// Serialize as one JSON object. serde_json escapes control characters,
    /// so the result never spans more than one line.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).expect("a record of plain strings always serializes")
    }

    pub fn from_line(line: &str) -> Result<Record, RecordParseError> {
        Ok(serde_json::from_str(line)?)
    }
}
