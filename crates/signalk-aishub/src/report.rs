//! AisHub stations response.
//!
//! The response is a JSON array used as a tuple:
//!
//! ```json
//! [
//!   {"ERROR": false, "USERNAME": "AH_3017_A0DC769C", "FORMAT": "AIS", "RECORDS": 1},
//!   [{"ID": 3017, "SHIPS": 42, "DISTINCT": 7, "LASTUPDATE": "2022-01-01 00:00:00"}]
//! ]
//! ```
//!
//! When the request is rejected the array may hold only the status object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AisHubError;

/// Status object heading every response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationStatus {
    #[serde(rename = "ERROR", default)]
    pub error: Option<Value>,

    #[serde(rename = "ERROR_MESSAGE", default)]
    pub error_message: Option<String>,

    /// Remaining fields, kept for diagnostics.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl StationStatus {
    /// Whether the `ERROR` marker is set (present and not null, false, 0 or "").
    pub fn is_error(&self) -> bool {
        match &self.error {
            None | Some(Value::Null) => false,
            Some(Value::Bool(set)) => *set,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// One station record, keyed by AisHub field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselRecord(Map<String, Value>);

impl VesselRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `LASTUPDATE` when it is a string.
    pub fn last_update(&self) -> Option<&str> {
        self.get("LASTUPDATE").and_then(Value::as_str)
    }

}

/// A successful stations response.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReport {
    pub status: StationStatus,
    pub records: Vec<VesselRecord>,
}

impl StationReport {
    /// Parse a raw response body.
    ///
    /// A status with the error marker set yields [`AisHubError::Upstream`];
    /// records are not inspected then.
    pub fn parse(text: &str) -> Result<Self, AisHubError> {
        let parts: Vec<Value> = serde_json::from_str(text)?;
        let mut parts = parts.into_iter();

        let raw_status = parts
            .next()
            .ok_or_else(|| AisHubError::MalformedReport("empty response array".to_string()))?;
        if !raw_status.is_object() {
            return Err(AisHubError::MalformedReport(
                "status is not an object".to_string(),
            ));
        }
        let status: StationStatus = serde_json::from_value(raw_status.clone())?;
        if status.is_error() {
            let mut redacted = raw_status;
            if let Some(fields) = redacted.as_object_mut() {
                fields.remove("USERNAME");
            }
            return Err(AisHubError::Upstream {
                message: status.error_message,
                status: redacted,
            });
        }

        let records = match parts.next() {
            Some(Value::Array(records)) => records
                .into_iter()
                .map(|record| match record {
                    Value::Object(fields) => Ok(VesselRecord(fields)),
                    other => Err(AisHubError::MalformedReport(format!(
                        "record is not an object: {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(AisHubError::MalformedReport(
                    "records are not an array".to_string(),
                ))
            }
            None => {
                return Err(AisHubError::MalformedReport(
                    "missing records array".to_string(),
                ))
            }
        };

        Ok(Self { status, records })
    }
}
