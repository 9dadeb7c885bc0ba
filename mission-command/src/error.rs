use mission_arci::LegResult;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("mission-command: Leg {} ({}) {}.", index, name, result)]
    LegFailed {
        index: usize,
        name: String,
        result: LegResult,
    },
    #[error("mission-command: mission-arci: {:?}", .0)]
    Arci(#[from] mission_arci::Error),
}
