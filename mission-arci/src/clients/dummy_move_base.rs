use std::sync::Mutex;

use crate::{
    error::Result,
    traits::{BaseVelocity, MoveBase},
};

/// Dummy MoveBase for debug or tests. Keeps every command it receives.
#[derive(Debug, Default)]
pub struct DummyMoveBase {
    sent_velocities: Mutex<Vec<BaseVelocity>>,
}

impl DummyMoveBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_velocities(&self) -> Vec<BaseVelocity> {
        self.sent_velocities.lock().unwrap().clone()
    }

    pub fn current_velocity(&self) -> BaseVelocity {
        self.sent_velocities
            .lock()
            .unwrap()
            .last()
            .copied()
            .unwrap_or_default()
    }
}

impl MoveBase for DummyMoveBase {
    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<()> {
        self.sent_velocities.lock().unwrap().push(*velocity);
        Ok(())
    }
}
