// On Windows, hide the console window for the desktop build
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use pulseprint::{init_logging, Application, ServiceConfig, SettingsManager, BUILD_DATE, VERSION};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("PulsePrint {} (built {})", VERSION, BUILD_DATE);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pulseprint-worker")
        .build()?;

    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let backend = SettingsManager::default_backend()?;
    tracing::info!("Settings file: {}", backend.path().display());

    let app = Application::start(ServiceConfig::default(), Arc::new(backend)).await?;
    app.run_until(wait_for_signal()).await;
    app.shutdown().await;
    Ok(())
}

async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
