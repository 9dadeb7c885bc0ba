use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{mission_config::inline_config_path, overwrite::overwrite_str, Error, MissionConfig};

const MISSION_APPS_CONFIG_ENV_NAME: &str = "MISSION_APPS_CONFIG_PATH";
const DEFAULT_LOG_FILTER: &str = "info";

/// Get mission config path from input or env MISSION_APPS_CONFIG_PATH
pub fn get_apps_config_path(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(MISSION_APPS_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {} is used ###", s);
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Loads the config from `config_path` (or the defaults) and applies the
/// `overwrite` scripts on top.
pub fn resolve_mission_config(
    config_path: Option<&Path>,
    overwrite: Option<&str>,
) -> Result<MissionConfig, Error> {
    match (config_path, overwrite) {
        (Some(config_path), Some(overwrite)) => {
            let s = &fs::read_to_string(config_path)
                .map_err(|e| Error::NoFile(config_path.to_owned(), e))?;
            let s = &overwrite_str(s, overwrite).map_err(Error::ConfigOverwrite)?;
            MissionConfig::from_str(s, config_path)
        }
        (Some(config_path), None) => MissionConfig::new(config_path),
        (None, overwrite) => {
            let mut config = MissionConfig::default();
            if let Some(overwrite) = overwrite {
                let s = &toml::to_string(&config)
                    .map_err(|e| Error::ConfigOverwrite(e.into()))?;
                let s = &overwrite_str(s, overwrite).map_err(Error::ConfigOverwrite)?;
                config = MissionConfig::from_str(s, inline_config_path())?;
            }
            debug!("no config file is given, using the default mission");
            Ok(config)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes the global tracing subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `info`). If
/// `log_directory` is given, they are also written to a daily rotated file
/// named after `name`; keep the returned guard alive until exit so the file
/// writer is flushed.
pub fn init_tracing(name: &str, log_directory: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    match log_directory {
        None => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .init();
            None
        }
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, format!("{name}.log"));
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(file_writer))
                .init();
            Some(guard)
        }
    }
}
