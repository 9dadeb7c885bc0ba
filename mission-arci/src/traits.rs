mod marker_source;
mod move_base;
mod navigator;

pub use marker_source::*;
pub use move_base::*;
pub use navigator::*;
