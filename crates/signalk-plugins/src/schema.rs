//! Plugin configuration schema.
//!
//! Plugins describe their options with a JSON-schema-like object that the
//! Admin UI renders as a form:
//!
//! ```json
//! {
//!   "type": "object",
//!   "required": ["apikey"],
//!   "properties": {
//!     "apikey": { "type": "string", "title": "API Key" },
//!     "updaterate": { "type": "number", "title": "Update rate (s)", "default": 61 }
//!   }
//! }
//! ```
//!
//! Properties serialize in declaration order so the form layout is stable.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// JSON type of a configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
}

/// A single configuration property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaProperty {
    /// Option key in the plugin configuration.
    #[serde(skip)]
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Form label.
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip)]
    pub required: bool,
}

impl SchemaProperty {
    fn new(name: &str, property_type: PropertyType, title: &str) -> Self {
        Self {
            name: name.to_string(),
            property_type,
            title: title.to_string(),
            default: None,
            required: false,
        }
    }

    pub fn string(name: &str, title: &str) -> Self {
        Self::new(name, PropertyType::String, title)
    }

    pub fn number(name: &str, title: &str) -> Self {
        Self::new(name, PropertyType::Number, title)
    }

    pub fn integer(name: &str, title: &str) -> Self {
        Self::new(name, PropertyType::Integer, title)
    }

    /// Value the UI pre-fills and the host applies when the option is absent.
    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Configuration schema of a plugin (always an object schema).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginSchema {
    properties: Vec<SchemaProperty>,
}

impl PluginSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property.
    pub fn property(mut self, property: SchemaProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Option keys marked as required, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Fill in schema defaults for options that are absent or null.
    ///
    /// Non-object options are left untouched.
    pub fn apply_defaults(&self, options: &mut serde_json::Value) {
        let Some(map) = options.as_object_mut() else {
            return;
        };
        for property in &self.properties {
            let Some(default) = &property.default else {
                continue;
            };
            let slot = map
                .entry(property.name.clone())
                .or_insert(serde_json::Value::Null);
            if slot.is_null() {
                *slot = default.clone();
            }
        }
    }
}

impl Serialize for PluginSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [SchemaProperty]);

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for property in self.0 {
                    map.serialize_entry(&property.name, property)?;
                }
                map.end()
            }
        }

        let required = self.required();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "object")?;
        if !required.is_empty() {
            map.serialize_entry("required", &required)?;
        }
        map.serialize_entry("properties", &Properties(&self.properties))?;
        map.end()
    }
}
