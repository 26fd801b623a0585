//! SignalK delta message types.
//!
//! Plugins publish data to the host as deltas: a batch of path/value pairs
//! attributed to one source at one timestamp. Only the parts of the delta
//! format that plugins emit are modelled here.

use serde::{Deserialize, Serialize};

/// A SignalK delta message containing one or more updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// The context path (e.g., "vessels.urn:mrn:signalk:uuid:...")
    /// If None, the host defaults it to "vessels.self"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The list of updates in this delta
    pub updates: Vec<Update>,
}

impl Delta {
    /// Create a delta carrying a single update and no explicit context.
    pub fn single(update: Update) -> Self {
        Self {
            context: None,
            updates: vec![update],
        }
    }

    /// All path-value pairs across every update, in order.
    pub fn values(&self) -> impl Iterator<Item = &PathValue> {
        self.updates.iter().flat_map(|u| u.values.iter())
    }
}

/// A single update within a delta, containing values from one source at one timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Reference to source in /sources (e.g., "nmea0183.GP")
    #[serde(rename = "$source", skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,

    /// Embedded source object (alternative to $source)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    /// ISO 8601 timestamp (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// The path-value pairs in this update
    pub values: Vec<PathValue>,
}

impl Update {
    /// Create an empty update from an embedded source at the given timestamp.
    pub fn new(source: Source, timestamp: impl Into<String>) -> Self {
        Self {
            source_ref: None,
            source: Some(source),
            timestamp: Some(timestamp.into()),
            values: Vec::new(),
        }
    }
}

/// A single path-value pair within an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    /// The SignalK path (e.g., "navigation.speedOverGround").
    /// Empty for values addressed to the context root.
    pub path: String,

    /// The value at this path
    pub value: serde_json::Value,
}

/// Source information describing where data originated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Label identifying the source (e.g., "N2K-1", "aishub")
    pub label: String,

    /// Type of source (e.g., "NMEA0183", "NMEA2000", "signalk")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

impl Source {
    /// A source identified only by its label.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source_type: None,
        }
    }
}
