//! Plugin lifecycle contract.
//!
//! The host constructs a plugin, lists it using [`PluginInfo`], calls
//! [`Plugin::start`] once with the resolved configuration and
//! [`Plugin::stop`] at most once to tear it down.

use serde::Serialize;
use thiserror::Error;

use crate::schema::PluginSchema;

/// Errors returned by plugin lifecycle operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The options handed to `start` do not match the plugin's configuration shape.
    #[error("Invalid plugin options: {0}")]
    InvalidOptions(String),

    /// The plugin could not acquire a runtime resource (async runtime, HTTP client).
    #[error("Plugin runtime error: {0}")]
    Runtime(String),
}

/// A SignalK server plugin.
///
/// `start` and `stop` take `&mut self`: the host owns the plugin and calls
/// them sequentially, never concurrently.
pub trait Plugin: Send {
    /// Unique identifier (npm package name for JS plugins).
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Plugin description. Defaults to the name.
    fn description(&self) -> &str {
        self.name()
    }

    /// Configuration schema rendered by the Admin UI.
    fn schema(&self) -> PluginSchema;

    /// Start the plugin with its resolved configuration.
    fn start(&mut self, options: serde_json::Value) -> Result<(), PluginError>;

    /// Stop the plugin. Must be a no-op when the plugin is not running.
    fn stop(&mut self);
}

/// Plugin descriptor as listed by `GET /skServer/plugins`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub schema: PluginSchema,
}

impl PluginInfo {
    /// Describe a plugin instance.
    pub fn of(plugin: &dyn Plugin) -> Self {
        Self {
            id: plugin.id().to_string(),
            name: plugin.name().to_string(),
            description: plugin.description().to_string(),
            schema: plugin.schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaProperty;

    struct NullPlugin {
        started: bool,
    }

    impl Plugin for NullPlugin {
        fn id(&self) -> &str {
            "null-plugin"
        }

        fn name(&self) -> &str {
            "Null Plugin"
        }

        fn schema(&self) -> PluginSchema {
            PluginSchema::new().property(SchemaProperty::number("rate", "Rate").default_value(1))
        }

        fn start(&mut self, options: serde_json::Value) -> Result<(), PluginError> {
            if !options.is_object() {
                return Err(PluginError::InvalidOptions("expected an object".to_string()));
            }
            self.started = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.started = false;
        }
    }

    #[test]
    fn test_description_defaults_to_name() {
        let plugin = NullPlugin { started: false };
        assert_eq!(plugin.description(), "Null Plugin");
    }

    #[test]
    fn test_plugin_info_serialize() {
        let plugin = NullPlugin { started: false };
        let json = serde_json::to_string(&PluginInfo::of(&plugin)).unwrap();

        assert!(json.contains("\"id\":\"null-plugin\""));
        assert!(json.contains("\"description\":\"Null Plugin\""));
        assert!(json.contains("\"rate\":{\"type\":\"number\",\"title\":\"Rate\",\"default\":1}"));
    }

    #[test]
    fn test_invalid_options_message() {
        let mut plugin = NullPlugin { started: false };
        let err = plugin.start(serde_json::json!(42)).unwrap_err();

        assert_eq!(err.to_string(), "Invalid plugin options: expected an object");
        assert!(!plugin.started);
    }
}
