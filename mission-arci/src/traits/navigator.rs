use auto_impl::auto_impl;

use crate::{error::Result, LegResult, Pose2D};

/// A navigation stack that moves the robot to one goal pose at a time.
///
/// Only one goal is active at once. `begin_navigation` returns as soon as the
/// goal has been handed over; completion is observed through `is_complete`
/// and the outcome read through `result`.
#[async_trait::async_trait]
#[auto_impl(&, Box, Arc)]
pub trait Navigator: Send + Sync {
    /// Waits until the navigation stack accepts goals.
    async fn wait_until_active(&self) -> Result<()>;

    fn begin_navigation(&self, goal: &Pose2D, frame_id: &str) -> Result<()>;

    /// Returns `true` once the current goal has reached a terminal state.
    fn is_complete(&self) -> Result<bool>;

    /// Outcome of the most recent goal. Only meaningful after `is_complete`
    /// returned `true`.
    fn result(&self) -> Result<LegResult>;

    fn cancel(&self) -> Result<()>;
}
