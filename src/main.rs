use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use uptime_watcher::bridge::Bridge;
use uptime_watcher::context::AppContext;
use uptime_watcher::local_backend::LocalBackend;
use uptime_watcher::status::{format_response_time, format_status_with_icon};
use uptime_watcher::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    tracing::info!("Starting {}", version::banner());
    let app_config = config::AppConfig::load()?;

    let backend = Arc::new(
        LocalBackend::open(
            &app_config.database.path,
            app_config.database.max_connections,
            app_config.sync.event_channel_capacity,
            app_config.settings.default_history_limit,
        )
        .await?,
    );
    let bridge = Bridge::from_backend(backend);
    let (ctx, rehydration) = AppContext::init(&app_config, bridge);

    if rehydration.is_none() {
        let settings = ctx.settings.initialize_settings().await?;
        tracing::info!(history_limit = settings.history_limit, "settings initialized");
    }

    let loaded = ctx.sites.initialize_sites().await?;
    tracing::info!(sites_loaded = loaded.sites_loaded, "{}", loaded.message);

    let subscription = ctx.sites.subscribe_to_sync_events();

    let status = ctx.sites.get_sync_status().await;
    tracing::info!(
        site_count = status.site_count,
        synchronized = status.synchronized,
        source = ?status.source,
        "sync status"
    );

    for site in ctx.sites.sites() {
        for monitor in &site.monitors {
            tracing::info!(
                site = site.display_name(),
                monitor = %monitor.id,
                monitor_type = %monitor.monitor_type(),
                target = %monitor.kind.target(),
                status = %format_status_with_icon(monitor.status),
                response_time = %format_response_time(monitor.response_time),
                "monitor"
            );
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal");
    subscription.unsubscribe();
    if let Some(handle) = rehydration {
        handle.abort();
    }

    Ok(())
}
