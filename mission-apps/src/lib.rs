mod error;
mod mission_config;
pub mod overwrite;
mod runner;
pub mod utils;

pub use error::*;
pub use mission_config::*;
pub use runner::*;
