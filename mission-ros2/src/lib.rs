//! [`mission_arci`] implementation using ROS2.
#![cfg(feature = "ros2")]
#![warn(missing_docs)]

mod cmd_vel_move_base;
mod marker_subscriber;
mod navigator;
mod node;
mod utils;

pub use cmd_vel_move_base::*;
pub use marker_subscriber::*;
pub use navigator::*;
pub use node::*;
// re-export
pub use r2r;
