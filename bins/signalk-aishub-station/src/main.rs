use std::sync::Arc;

use anyhow::Context;
use signalk_aishub::AisHubStationPlugin;
use signalk_plugins::{ChannelContext, Plugin, PluginInfo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_OPTIONS_FILE: &str = "aishub-options.json";
const DEFAULT_SELF_URN: &str = "urn:mrn:signalk:uuid:c0d79334-4e25-4245-8892-54e8ccc8021d";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,signalk_aishub=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Options file: first argument, then $AISHUB_OPTIONS, then ./aishub-options.json
    let options_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AISHUB_OPTIONS").ok())
        .unwrap_or_else(|| DEFAULT_OPTIONS_FILE.to_string());
    let raw = std::fs::read_to_string(&options_path)
        .with_context(|| format!("reading plugin options from {}", options_path))?;
    let mut options: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing plugin options in {}", options_path))?;

    let self_urn =
        std::env::var("SIGNALK_SELF_URN").unwrap_or_else(|_| DEFAULT_SELF_URN.to_string());
    let (context, mut rx) = ChannelContext::new(self_urn);
    let mut plugin = AisHubStationPlugin::new(Arc::new(context))?;

    let info = PluginInfo::of(&plugin);
    tracing::info!("Loaded plugin {} ({})", info.name, info.id);
    tracing::debug!("Plugin schema: {}", serde_json::to_string(&info.schema)?);

    plugin.schema().apply_defaults(&mut options);
    plugin.start(options)?;

    // Print every delta the plugin publishes as one JSON line
    let printer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!("Failed to encode delta: {}", e),
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = printer => {
            tracing::warn!("Delta channel closed");
        }
    }

    plugin.stop();
    tracing::info!("Shutdown complete");
    Ok(())
}
