//! Abstract interfaces for driving a mobile robot through a waypoint mission.

mod clients;
mod error;
mod observed;
mod traits;
mod types;

pub use clients::*;
pub use error::*;
pub use observed::*;
pub use traits::*;
pub use types::*;

// re-export
pub use async_trait::async_trait;
pub use nalgebra;
pub use nalgebra::{Isometry2, Isometry3};
