mod dummy_marker_source;
mod dummy_move_base;
mod dummy_navigator;

pub use dummy_marker_source::*;
pub use dummy_move_base::*;
pub use dummy_navigator::*;
