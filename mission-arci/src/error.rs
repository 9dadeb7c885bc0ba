use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("mission-arci: Uninitialized : {}", message)]
    Uninitialized { message: String },
    #[error("mission-arci: Connection error : {}", message)]
    Connection { message: String },
    #[error("mission-arci: Canceled : {}", message)]
    Canceled { message: String },
    #[error("mission-arci: Timeout {:?}", timeout)]
    Timeout { timeout: std::time::Duration },
    #[error("mission-arci: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}
