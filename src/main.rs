//! messaging-manager entry point.
//!
//! Loads configuration, opens the real-time connection to the configured
//! API and logs everything it reports until interrupted.

use tracing_subscriber::EnvFilter;

use messaging_manager::app_state::AppState;
use messaging_manager::config::ManagerConfig;
use messaging_manager::domain::socket_event::LIFECYCLE_EVENTS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ManagerConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "starting messaging-manager");

    let state = AppState::build(config)?;

    // Surface notices the way a toast would
    let mut notices = state.notices.subscribe();
    let translator_state = state.clone();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            tracing::warn!(
                level = ?notice.level,
                detail = notice.detail.as_deref().unwrap_or_default(),
                "{}",
                translator_state.t(&notice.key)
            );
        }
    });

    // Real-time connection
    let socket = state.socket();
    for name in LIFECYCLE_EVENTS {
        socket.on(name, |event| tracing::info!(event = %event.name(), ?event, "socket"));
    }
    socket.connect();

    if state.api.has_api_key() {
        match state.api.fetch_instances().await {
            Ok(instances) => {
                tracing::info!(count = instances.len(), "instances loaded");
                for instance in &instances {
                    socket.on(format!("{}.connection.update", instance.name), |event| {
                        tracing::info!(?event, "instance connection update");
                    });
                }
            }
            Err(e) => tracing::error!(code = e.error_code(), error = %e, "failed to load instances"),
        }
    } else {
        tracing::info!("no API_KEY configured, skipping instance listing");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    state.shutdown();

    Ok(())
}
