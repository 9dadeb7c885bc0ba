use auto_impl::auto_impl;

use crate::error::Result;

#[derive(Clone, Debug, Default, Copy, PartialEq)]
pub struct BaseVelocity {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl BaseVelocity {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// The stop command.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.theta == 0.0
    }
}

/// Velocity command sink of the mobile base.
#[auto_impl(&, Box, Arc)]
pub trait MoveBase: Send + Sync {
    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<()>;
}
