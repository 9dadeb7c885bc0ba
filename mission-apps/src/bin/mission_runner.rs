use std::{
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use mission_apps::{exit_code, report_marker, run_mission, MissionClients, MissionConfig};
use tracing::{debug, error, info};

/// Drives the robot through the configured waypoints, one leg at a time.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the setting file.
    #[arg(short, long, value_parser)]
    config_path: Option<PathBuf>,
    /// Set options from command line. These settings take priority over the
    /// setting file specified by --config-path.
    #[arg(long)]
    config: Option<String>,
    /// Prints the default setting as TOML.
    #[arg(long)]
    show_default_config: bool,
    /// Keep running after the mission and log marker updates until Ctrl-C.
    #[arg(long)]
    keep_alive: bool,
    /// Also write logs to daily rotated files in this directory.
    #[arg(long, value_parser)]
    log_directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _guard =
        mission_apps::utils::init_tracing(env!("CARGO_BIN_NAME"), args.log_directory.as_deref());
    debug!(?args);

    if args.show_default_config {
        return match toml::to_string(&MissionConfig::default()) {
            Ok(s) => {
                print!("{s}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::from(mission_apps::EXIT_CODE_ERROR)
            }
        };
    }

    let mut clients = None;
    let result = async {
        let config_path = mission_apps::utils::get_apps_config_path(args.config_path.clone());
        let config = mission_apps::utils::resolve_mission_config(
            config_path.as_deref(),
            args.config.as_deref(),
        )?;
        info!(waypoints = config.waypoints.len(), "mission loaded");
        let created = clients.insert(config.create_clients()?);
        run_mission(&config, created).await
    }
    .await;

    match &result {
        Ok(outcome) => match &outcome.failure {
            None => info!("Task completed successfully!"),
            Some(failure) => error!(
                "Mission aborted at leg {} ({}): {}",
                failure.index, failure.name, failure.result
            ),
        },
        Err(e) => error!("{e}"),
    }
    let code = exit_code(&result);

    if args.keep_alive {
        if let Some(clients) = &clients {
            if let Err(e) = keep_alive(clients).await {
                error!("{e}");
            }
        }
    }
    ExitCode::from(code)
}

async fn keep_alive(clients: &MissionClients) -> Result<()> {
    info!("Node will remain active. Press Ctrl+C to exit.");
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last = None;
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                info!("Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                let marker = clients.marker_source.as_ref().and_then(|m| m.latest_marker());
                if marker.is_some() && marker != last {
                    report_marker(marker.as_ref());
                    last = marker;
                }
            }
        }
    }
}
