//! Plugin options.
//!
//! Options arrive from the host as JSON using the Admin UI property names
//! (`apikey`, `url`, `updaterate`, `boxSize`, `stationID`). They are read
//! once at start and never change while the plugin runs.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use signalk_plugins::{PluginSchema, SchemaProperty};

/// AisHub stations endpoint.
pub const DEFAULT_URL: &str = "http://data.aishub.net/stations.php";

/// AisHub rejects clients polling more often than once a minute.
pub const MIN_UPDATE_RATE_SECS: u64 = 61;

/// Longest poll interval honoured; larger rates are capped to one year.
pub const MAX_UPDATE_RATE_SECS: u64 = 365 * 24 * 60 * 60;

pub const DEFAULT_BOX_SIZE_KM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisHubConfig {
    /// AisHub username, sent as the `username` query parameter.
    #[serde(rename = "apikey", default)]
    pub api_key: String,

    #[serde(default = "default_url")]
    pub url: String,

    /// Requested poll interval in seconds; see [`AisHubConfig::update_interval`].
    #[serde(rename = "updaterate", default)]
    pub update_rate: Option<f64>,

    /// Bounding box size in km. The stations endpoint does not filter by
    /// area, so this is carried for the UI only.
    #[serde(rename = "boxSize", default = "default_box_size")]
    pub box_size_km: f64,

    /// Accepts integral JSON numbers written as floats (e.g. `3017.0`).
    #[serde(
        rename = "stationID",
        default,
        deserialize_with = "deserialize_station_id"
    )]
    pub station_id: Option<u64>,
}

fn deserialize_station_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(id) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if id.is_finite() && id >= 0.0 && id.fract() == 0.0 && id < u64::MAX as f64 {
        Ok(Some(id as u64))
    } else {
        Err(serde::de::Error::custom(format!(
            "stationID must be a non-negative integer, got {}",
            id
        )))
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_box_size() -> f64 {
    DEFAULT_BOX_SIZE_KM
}

impl AisHubConfig {
    /// Parse host options.
    pub fn from_options(options: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(options)
    }

    /// Effective poll interval: `max(updaterate, 61)` seconds, capped at one year.
    ///
    /// Absent, zero, negative and non-finite rates all fall back to the floor.
    pub fn update_interval(&self) -> Duration {
        let floor = MIN_UPDATE_RATE_SECS as f64;
        match self.update_rate {
            Some(rate) if rate.is_finite() && rate > floor => {
                let ceiling = Duration::from_secs(MAX_UPDATE_RATE_SECS);
                Duration::try_from_secs_f64(rate).map_or(ceiling, |rate| rate.min(ceiling))
            }
            _ => Duration::from_secs(MIN_UPDATE_RATE_SECS),
        }
    }

    /// Query string of the stations request, in wire order.
    pub fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let mut parameters = vec![
            ("username", self.api_key.clone()),
            ("format", "1".to_string()),
            ("output", "json".to_string()),
            ("compress", "0".to_string()),
        ];
        if let Some(id) = self.station_id {
            parameters.push(("id", id.to_string()));
        }
        parameters
    }

    /// Admin UI schema for these options.
    pub fn schema() -> PluginSchema {
        PluginSchema::new()
            .property(SchemaProperty::string("apikey", "API Key").required())
            .property(
                SchemaProperty::string("url", "AisHub URL")
                    .default_value(DEFAULT_URL)
                    .required(),
            )
            .property(
                SchemaProperty::number("updaterate", "Rate to get updates from AisHub (s > 60)")
                    .default_value(MIN_UPDATE_RATE_SECS),
            )
            .property(
                SchemaProperty::number("boxSize", "Size of the bounding box to retrieve data (km)")
                    .default_value(10),
            )
            .property(SchemaProperty::integer("stationID", "AisHub Station ID").required())
    }
}
