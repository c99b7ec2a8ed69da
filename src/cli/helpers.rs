use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, LoadedConfig};
use crate::monitor::Monitor;
use crate::notifier::{Notifier, NotifierHandle};
use crate::output::OutputSink;
use crate::schedule::{check_once, Runner};

/// Describe one monitor for `show`
pub fn describe_monitor(monitor: &Monitor) -> String {
    let condition = monitor
        .condition()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    format!(
        "  {}: {} on {} every {:?}\n    condition: {}",
        monitor.name(),
        monitor.task().type_name(),
        monitor.task().resource_description(),
        monitor.interval(),
        condition
    )
}

/// Print the loaded configuration without running anything
pub fn handle_show_command(config_path: &Path) -> Result<()> {
    let loaded = load_config(config_path)?;

    println!("📂 Config file: {}", config_path.display());
    println!(
        "Loaded {} monitors ({} rejected)",
        loaded.monitors.len(),
        loaded.rejected.len()
    );

    if !loaded.monitors.is_empty() {
        println!("\nMonitors:");
        for monitor in &loaded.monitors {
            println!("{}", describe_monitor(monitor));
        }
    }

    if !loaded.rejected.is_empty() {
        println!("\nRejected:");
        for rejected in &loaded.rejected {
            println!("  #{} {}: {}", rejected.index, rejected.name, rejected.error);
        }
    }

    println!("\nNotifier:");
    println!("  enabled: {}", loaded.notifier.enabled);
    match &loaded.notifier.command {
        Some(command) => println!("  command: {}", command.join(" ")),
        None => println!("  command: (log)"),
    }
    println!("  drain timeout: {:?}", loaded.notifier.drain_timeout());
    println!("Shutdown grace: {:?}", loaded.shutdown_grace);

    Ok(())
}

/// Run one tick of every monitor. Returns the number of alarms or failures.
pub async fn handle_check_command(config_path: &Path, color: bool) -> Result<usize> {
    let LoadedConfig {
        monitors,
        rejected,
        notifier,
        ..
    } = load_config(config_path)?;

    let output = Arc::new(OutputSink::stdout(color));
    let (notifier, handle) = start_notifier(&notifier);

    let alarms = check_once(monitors, output, handle).await;

    if let Some(notifier) = notifier {
        notifier.close().await;
    }
    Ok(alarms + rejected.len())
}

/// Run every monitor until Ctrl+C
pub async fn handle_run_command(config_path: &Path, color: bool) -> Result<()> {
    let LoadedConfig {
        monitors,
        rejected,
        notifier,
        shutdown_grace,
    } = load_config(config_path)?;

    println!("🎯 Healthcheck started");
    println!("📂 Config file: {}", config_path.display());
    if !rejected.is_empty() {
        eprintln!("⚠️ {} task descriptors were rejected", rejected.len());
    }
    if monitors.is_empty() {
        eprintln!("⚠️ No runnable monitors configured");
    }
    println!("🛑 Press Ctrl+C to stop");

    let output = Arc::new(OutputSink::stdout(color));
    let (notifier, handle) = start_notifier(&notifier);
    let runner = Runner::start(monitors, output, handle, shutdown_grace);
    tracing::info!("Started {} monitors", runner.len());

    tokio::signal::ctrl_c().await?;
    println!("\n🛑 Received Ctrl+C, shutting down...");

    runner.shutdown().await;
    if let Some(notifier) = notifier {
        notifier.close().await;
    }

    println!("🧹 Shutdown complete");
    Ok(())
}

fn start_notifier(config: &crate::config::NotifierConfig) -> (Option<Notifier>, NotifierHandle) {
    if !config.enabled {
        return (None, NotifierHandle::disconnected());
    }

    let notifier = Notifier::spawn(config.presenter(), config.drain_timeout());
    let handle = notifier.handle();
    (Some(notifier), handle)
}
