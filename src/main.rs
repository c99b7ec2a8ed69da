use anyhow::Result;
use clap::Parser;
use healthcheck_runner::cli::{
    handle_check_command, handle_run_command, handle_show_command, Cli, Commands,
};
use healthcheck_runner::config::resolve_config_path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    // WARN and above unless --debug; RUST_LOG overrides both
    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = resolve_config_path(cli.config);
    let color = !cli.no_color;

    match cli.command {
        None => handle_run_command(&config_path, color).await?,
        Some(Commands::Show) => handle_show_command(&config_path)?,
        Some(Commands::Check) => {
            let alarms = handle_check_command(&config_path, color).await?;
            if alarms > 0 {
                eprintln!("❌ {} monitors reported an alarm or failed", alarms);
                std::process::exit(1);
            }
            println!("✅ All monitors healthy");
        }
    }

    Ok(())
}
