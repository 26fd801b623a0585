//! Host services handed to plugins.
//!
//! A plugin never reaches for global state: everything it needs from the
//! server (the message bus, debug logging, the self vessel identity) comes
//! through the [`PluginContext`] it was constructed with.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use signalk_core::Delta;

/// Server API exposed to plugins.
pub trait PluginContext: Send + Sync {
    /// Self vessel URN (e.g., "urn:mrn:signalk:uuid:...").
    fn self_id(&self) -> &str;

    /// Submit a delta produced by the plugin to the server.
    fn handle_message(&self, plugin_id: &str, delta: Delta);

    /// Plugin debug logging.
    fn debug(&self, plugin_id: &str, message: &str) {
        debug!(plugin = plugin_id, "{}", message);
    }
}

/// A delta submitted by a plugin, as queued for the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMessage {
    pub plugin_id: String,
    pub delta: Delta,
}

/// Context that forwards plugin deltas over a channel to the server's event loop.
pub struct ChannelContext {
    self_id: String,
    tx: mpsc::Sender<PluginMessage>,
}

impl ChannelContext {
    /// Create a context and the receiver the server drains.
    pub fn new(self_id: impl Into<String>) -> (Self, mpsc::Receiver<PluginMessage>) {
        let (tx, rx) = mpsc::channel(1024);
        (
            Self {
                self_id: self_id.into(),
                tx,
            },
            rx,
        )
    }
}

impl PluginContext for ChannelContext {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    fn handle_message(&self, plugin_id: &str, delta: Delta) {
        let message = PluginMessage {
            plugin_id: plugin_id.to_string(),
            delta,
        };
        if let Err(e) = self.tx.try_send(message) {
            warn!(plugin = plugin_id, "Dropped plugin delta: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signalk_core::{Source, Update};

    fn delta() -> Delta {
        Delta::single(Update::new(Source::labelled("test"), "2024-01-17T10:00:00Z"))
    }

    #[tokio::test]
    async fn test_channel_context_forwards_deltas() {
        let (context, mut rx) = ChannelContext::new("urn:mrn:signalk:uuid:test-vessel");
        assert_eq!(context.self_id(), "urn:mrn:signalk:uuid:test-vessel");

        context.handle_message("my-plugin", delta());
        context.debug("my-plugin", "sent one delta");

        let message = rx.recv().await.unwrap();
        assert_eq!(message.plugin_id, "my-plugin");
        assert_eq!(message.delta, delta());
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_panic() {
        let (context, rx) = ChannelContext::new("self");
        drop(rx);

        context.handle_message("my-plugin", delta());
    }

    #[test]
    fn test_plugin_message_serialize() {
        let message = PluginMessage {
            plugin_id: "my-plugin".to_string(),
            delta: delta(),
        };
        let json = serde_json::to_string(&message).unwrap();

        assert!(json.starts_with("{\"pluginId\":\"my-plugin\",\"delta\":{"));
    }
}
