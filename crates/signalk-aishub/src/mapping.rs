//! Mapping from AisHub station records to SignalK deltas.

use serde_json::{Map, Value};
use signalk_core::{Delta, PathValue, Source, Update};

use crate::report::VesselRecord;

/// Source label attached to every published update.
pub const SOURCE_LABEL: &str = "aishub";

/// Maps one AisHub record field to a SignalK path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub path: &'static str,
    pub key: &'static str,
    /// Publish as `{path: value}` at the root path `""` instead of at `path`.
    pub root: bool,
}

pub const MAPPINGS: &[FieldMapping] = &[
    FieldMapping {
        path: "sensors.ais.shipCount",
        key: "SHIPS",
        root: true,
    },
    FieldMapping {
        path: "sensors.ais.shipCount.distinct",
        key: "DISTINCT",
        root: true,
    },
];

impl FieldMapping {
    /// The path-value pair this mapping produces for `record`, if any.
    ///
    /// Absent fields and empty strings produce nothing.
    pub fn apply(&self, record: &VesselRecord) -> Option<PathValue> {
        let value = record.get(self.key)?;
        if value.as_str().is_some_and(str::is_empty) {
            return None;
        }

        if self.root {
            let mut wrapped = Map::new();
            wrapped.insert(self.path.to_string(), value.clone());
            Some(PathValue {
                path: String::new(),
                value: Value::Object(wrapped),
            })
        } else {
            Some(PathValue {
                path: self.path.to_string(),
                value: value.clone(),
            })
        }
    }
}

/// Convert AisHub's `"YYYY-MM-DD hh:mm:ss"` (UTC) into `"YYYY-MM-DDThh:mm:ssZ"`.
///
/// Only the first two space-separated tokens are used. Nothing is validated,
/// so malformed input gives a malformed timestamp rather than an error.
pub fn convert_time(last_update: &str) -> String {
    let mut parts = last_update.split(' ');
    let date = parts.next().unwrap_or_default();
    let time = parts.next().unwrap_or_default();
    format!("{}T{}Z", date, time)
}

/// Build the delta for one record.
///
/// The delta is produced even when no mapping matched, leaving the update
/// with an empty `values` array. Records without a string `LASTUPDATE` are
/// stamped with the current time.
pub fn record_delta(record: &VesselRecord) -> Delta {
    let timestamp = match record.last_update() {
        Some(last_update) => convert_time(last_update),
        None => chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    };

    let mut update = Update::new(Source::labelled(SOURCE_LABEL), timestamp);
    update
        .values
        .extend(MAPPINGS.iter().filter_map(|mapping| mapping.apply(record)));
    Delta::single(update)
}
