use clap::{Parser, ValueEnum};
use schemars::schema_for;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Args {
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Generate JSON schema for the specified config file.
    Schema {
        /// Kind of config file.
        #[arg(value_enum, ignore_case = true)]
        kind: ConfigKind,
    },
    /// Print the default config as TOML.
    Default,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigKind {
    MissionConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    debug!(?args);

    match args.subcommand {
        Subcommand::Schema { kind } => {
            let schema = match kind {
                ConfigKind::MissionConfig => schema_for!(mission_apps::MissionConfig),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Subcommand::Default => {
            print!("{}", toml::to_string(&mission_apps::MissionConfig::default())?);
        }
    }
    Ok(())
}
