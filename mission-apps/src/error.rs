use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("mission-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("mission-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("mission-apps: Failed to overwrite config ({:#}).", .0)]
    ConfigOverwrite(#[source] anyhow::Error),
    #[error("mission-apps: Config {:?} requires ros2 feature.", .0)]
    ConfigRequireRos2(PathBuf),
    #[error("mission-apps: Invalid config: {}", .0)]
    InvalidConfig(String),
    #[error("mission-apps: mission-arci: {:?}", .0)]
    Arci(#[from] mission_arci::Error),
    #[error("mission-apps: mission-command: {:?}", .0)]
    MissionCommand(#[from] mission_command::Error),
}
