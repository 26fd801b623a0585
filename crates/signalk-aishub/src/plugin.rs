//! AisHub Station plugin lifecycle.
//!
//! `start` polls once immediately and then on every tick of the update
//! interval; `stop` cancels future polls. A poll that is in flight when the
//! plugin stops may still publish.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use signalk_plugins::{PeriodicTask, Plugin, PluginContext, PluginError, PluginSchema};

use crate::client::AisHubClient;
use crate::config::AisHubConfig;
use crate::error::AisHubError;
use crate::mapping::record_delta;
use crate::report::StationReport;

pub const PLUGIN_ID: &str = "signalk-aishub-station";
pub const PLUGIN_NAME: &str = "AisHub Station";

pub struct AisHubStationPlugin {
    context: Arc<dyn PluginContext>,
    client: AisHubClient,
    task: PeriodicTask,
}

impl AisHubStationPlugin {
    /// Create the plugin with the host services it publishes through.
    pub fn new(context: Arc<dyn PluginContext>) -> Result<Self, PluginError> {
        let client = AisHubClient::new().map_err(|e| PluginError::Runtime(e.to_string()))?;
        Ok(Self {
            context,
            client,
            task: PeriodicTask::new(),
        })
    }

    /// Whether polls are scheduled.
    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }
}

impl Plugin for AisHubStationPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn schema(&self) -> PluginSchema {
        AisHubConfig::schema()
    }

    fn start(&mut self, options: serde_json::Value) -> Result<(), PluginError> {
        let config = AisHubConfig::from_options(options)
            .map_err(|e| PluginError::InvalidOptions(e.to_string()))?;
        let interval = config.update_interval();

        info!(
            self_id = self.context.self_id(),
            station = ?config.station_id,
            interval_secs = interval.as_secs(),
            "Starting AisHub station plugin"
        );

        let context = self.context.clone();
        let client = self.client.clone();
        let config = Arc::new(config);
        self.task.start(interval, move || {
            let context = context.clone();
            let client = client.clone();
            let config = config.clone();
            async move { run_cycle(context.as_ref(), &client, &config).await }
        })
    }

    fn stop(&mut self) {
        if self.task.stop() {
            info!("Stopped AisHub station plugin");
        }
    }
}

/// One poll with its outcome logged. Failures never escape a cycle.
async fn run_cycle(context: &dyn PluginContext, client: &AisHubClient, config: &AisHubConfig) {
    match poll_once(context, client, config).await {
        Ok(count) => debug!(count, "Published AisHub station deltas"),
        Err(AisHubError::Upstream { message, status }) => {
            error!(error_message = message.as_deref(), %status, "error response from AisHub");
        }
        Err(e) => warn!("AisHub poll failed: {}", e),
    }
}

/// Fetch the station report and publish it.
pub async fn poll_once(
    context: &dyn PluginContext,
    client: &AisHubClient,
    config: &AisHubConfig,
) -> Result<usize, AisHubError> {
    context.debug(PLUGIN_ID, &format!("url: {}", config.url));
    let text = client.fetch(config).await?;
    publish_report(context, &text)
}

/// Parse a raw response and hand one delta per record to the host.
///
/// Nothing is published unless the whole response parses. Returns the
/// number of deltas published.
pub fn publish_report(context: &dyn PluginContext, text: &str) -> Result<usize, AisHubError> {
    let report = StationReport::parse(text)?;

    for record in &report.records {
        context.debug(
            PLUGIN_ID,
            &format!("found vessel {}", serde_json::to_string(record)?),
        );
        let delta = record_delta(record);
        context.debug(
            PLUGIN_ID,
            &format!("vessel delta: {}", serde_json::to_string(&delta)?),
        );
        context.handle_message(PLUGIN_ID, delta);
    }

    Ok(report.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use signalk_core::Delta;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingContext {
        messages: Mutex<Vec<(String, Delta)>>,
    }

    impl RecordingContext {
        fn messages(&self) -> Vec<(String, Delta)> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl PluginContext for RecordingContext {
        fn self_id(&self) -> &str {
            "urn:mrn:signalk:uuid:test-vessel"
        }

        fn handle_message(&self, plugin_id: &str, delta: Delta) {
            self.messages
                .lock()
                .unwrap()
                .push((plugin_id.to_string(), delta));
        }
    }

    fn plugin() -> (AisHubStationPlugin, Arc<RecordingContext>) {
        let context = Arc::new(RecordingContext::default());
        let plugin = AisHubStationPlugin::new(context.clone()).unwrap();
        (plugin, context)
    }

    #[test]
    fn test_identity() {
        let (plugin, _) = plugin();

        assert_eq!(plugin.id(), "signalk-aishub-station");
        assert_eq!(plugin.name(), "AisHub Station");
        assert_eq!(plugin.description(), "AisHub Station");
        assert_eq!(plugin.schema(), AisHubConfig::schema());
    }

    #[test]
    fn test_publish_report() {
        let context = RecordingContext::default();
        let text = r#"[{}, [{"SHIPS": 42, "DISTINCT": 7, "LASTUPDATE": "2022-01-01 00:00:00"}]]"#;

        let count = publish_report(&context, text).unwrap();
        assert_eq!(count, 1);

        let messages = context.messages();
        assert_eq!(messages.len(), 1);
        let (plugin_id, delta) = &messages[0];
        assert_eq!(plugin_id, PLUGIN_ID);
        assert_eq!(
            serde_json::to_value(delta).unwrap(),
            json!({
                "updates": [{
                    "source": {"label": "aishub"},
                    "timestamp": "2022-01-01T00:00:00Z",
                    "values": [
                        {"path": "", "value": {"sensors.ais.shipCount": 42}},
                        {"path": "", "value": {"sensors.ais.shipCount.distinct": 7}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_one_delta_per_record_in_order() {
        let context = RecordingContext::default();
        let text = r#"[{}, [
            {"SHIPS": 1, "LASTUPDATE": "2022-01-01 00:00:00"},
            {"LASTUPDATE": "2022-01-02 00:00:00"},
            {"SHIPS": 3, "LASTUPDATE": "2022-01-03 00:00:00"}
        ]]"#;

        assert_eq!(publish_report(&context, text).unwrap(), 3);

        let timestamps: Vec<_> = context
            .messages()
            .iter()
            .map(|(_, delta)| delta.updates[0].timestamp.clone().unwrap())
            .collect();
        assert_eq!(
            timestamps,
            vec!["2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z", "2022-01-03T00:00:00Z"]
        );
        // Records without mapped fields still publish an empty update.
        assert!(context.messages()[1].1.updates[0].values.is_empty());
    }

    #[test]
    fn test_upstream_error_publishes_nothing() {
        let context = RecordingContext::default();

        let err = publish_report(&context, r#"[{"ERROR": "bad key"}, []]"#).unwrap_err();

        assert!(matches!(err, AisHubError::Upstream { .. }));
        assert!(context.messages().is_empty());
    }

    #[test]
    fn test_malformed_response_publishes_nothing() {
        let context = RecordingContext::default();
        let text = r#"[{}, [{"SHIPS": 1, "LASTUPDATE": "2022-01-01 00:00:00"}, 5]]"#;

        assert!(publish_report(&context, text).is_err());
        assert!(publish_report(&context, "not json").is_err());
        assert!(context.messages().is_empty());
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let (mut plugin, context) = plugin();

        plugin.stop();
        plugin.stop();

        assert!(!plugin.is_running());
        assert!(context.messages().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_do_not_start() {
        let (mut plugin, _) = plugin();

        let err = plugin.start(json!({"apikey": ["not", "a", "string"]})).unwrap_err();

        assert!(matches!(err, PluginError::InvalidOptions(_)));
        assert!(!plugin.is_running());
    }

    #[tokio::test]
    async fn test_huge_update_rate_starts() {
        let (mut plugin, _) = plugin();

        plugin
            .start(json!({
                "apikey": "KEY",
                "url": "http://127.0.0.1:1/stations.php",
                "updaterate": 1e20,
                "stationID": 1
            }))
            .unwrap();

        assert!(plugin.is_running());
        plugin.stop();
    }

    #[tokio::test]
    async fn test_integral_float_station_id_starts() {
        let (mut plugin, _) = plugin();

        plugin
            .start(json!({
                "apikey": "KEY",
                "url": "http://127.0.0.1:1/stations.php",
                "stationID": 3017.0
            }))
            .unwrap();

        assert!(plugin.is_running());
        plugin.stop();
    }

    #[tokio::test]
    async fn test_restart_keeps_single_timer() {
        let (mut plugin, _) = plugin();
        let options = json!({
            "apikey": "KEY",
            "url": "http://127.0.0.1:1/stations.php",
            "stationID": 1
        });

        plugin.start(options.clone()).unwrap();
        plugin.start(options).unwrap();
        assert!(plugin.is_running());

        plugin.stop();
        assert!(!plugin.is_running());
    }
}
