//! # signalk-plugins
//!
//! Native plugin API for SignalK.
//!
//! This crate provides:
//! - The [`Plugin`] lifecycle trait (`start`/`stop`) every server plugin implements
//! - [`PluginContext`], the host services injected into a plugin at construction
//! - [`PluginSchema`], the configuration schema rendered by the Admin UI
//! - [`PeriodicTask`], a cancellable repeating background job
//!
//! **Linux only** - requires the tokio runtime.

pub mod context;
pub mod plugin;
pub mod schema;
pub mod task;

pub use context::{ChannelContext, PluginContext, PluginMessage};
pub use plugin::{Plugin, PluginError, PluginInfo};
pub use schema::{PluginSchema, PropertyType, SchemaProperty};
pub use task::PeriodicTask;
