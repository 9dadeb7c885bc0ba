//! Drives a navigator through an ordered list of waypoints.

mod error;
mod plan;
mod supervisor;

pub use crate::{error::*, plan::*, supervisor::*};
