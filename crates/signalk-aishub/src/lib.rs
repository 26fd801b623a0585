//! # signalk-aishub
//!
//! AisHub Station plugin for SignalK.
//!
//! Polls the AisHub stations API on a fixed interval and publishes the
//! station's ship counts as deltas:
//! - `sensors.ais.shipCount` from `SHIPS`
//! - `sensors.ais.shipCount.distinct` from `DISTINCT`
//!
//! Each poll is independent: fetch, parse, map, publish. Failures are logged
//! and the next tick retries.

pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod plugin;
pub mod report;

pub use client::AisHubClient;
pub use config::AisHubConfig;
pub use error::AisHubError;
pub use plugin::{AisHubStationPlugin, PLUGIN_ID, PLUGIN_NAME};
pub use report::{StationReport, StationStatus, VesselRecord};
