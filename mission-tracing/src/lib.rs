//! Wrappers that log every call made through the `mission-arci` interfaces.
//!
//! Events are emitted at `TRACE` level with a `method` field naming the
//! called trait method.

use mission_arci::{
    BaseVelocity, Error, LegResult, MarkerObservation, MarkerSource, MoveBase, Navigator, Pose2D,
};
use tracing::trace;

#[derive(Debug)]
pub struct Tracing<T>(T);

impl<T> Tracing<T> {
    pub fn new(v: T) -> Self {
        Self(v)
    }

    pub fn get_ref(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Tracing<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[mission_arci::async_trait]
impl<T: Navigator> Navigator for Tracing<T> {
    async fn wait_until_active(&self) -> Result<(), Error> {
        trace!(method = "mission_arci::Navigator::wait_until_active");
        self.0.wait_until_active().await
    }

    fn begin_navigation(&self, goal: &Pose2D, frame_id: &str) -> Result<(), Error> {
        trace!(
            method = "mission_arci::Navigator::begin_navigation",
            goal_x = goal.x,
            goal_y = goal.y,
            goal_yaw = goal.yaw,
            frame_id,
        );
        self.0.begin_navigation(goal, frame_id)
    }

    fn is_complete(&self) -> Result<bool, Error> {
        let is_complete = self.0.is_complete()?;
        trace!(method = "mission_arci::Navigator::is_complete", is_complete);
        Ok(is_complete)
    }

    fn result(&self) -> Result<LegResult, Error> {
        let result = self.0.result()?;
        trace!(method = "mission_arci::Navigator::result", ?result);
        Ok(result)
    }

    fn cancel(&self) -> Result<(), Error> {
        trace!(method = "mission_arci::Navigator::cancel");
        self.0.cancel()
    }
}

impl<T: MoveBase> MoveBase for Tracing<T> {
    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<(), Error> {
        trace!(
            method = "mission_arci::MoveBase::send_velocity",
            velocity_x = velocity.x,
            velocity_y = velocity.y,
            velocity_theta = velocity.theta
        );
        self.0.send_velocity(velocity)
    }
}

impl<T: MarkerSource> MarkerSource for Tracing<T> {
    fn latest_marker(&self) -> Option<MarkerObservation> {
        let marker = self.0.latest_marker();
        match &marker {
            Some(m) => trace!(
                method = "mission_arci::MarkerSource::latest_marker",
                frame_id = %m.frame_id,
                position_x = m.pose.translation.x,
                position_y = m.pose.translation.y,
                position_z = m.pose.translation.z,
                orientation_x = m.pose.rotation.coords.x,
                orientation_y = m.pose.rotation.coords.y,
                orientation_z = m.pose.rotation.coords.z,
                orientation_w = m.pose.rotation.coords.w,
            ),
            None => trace!(
                method = "mission_arci::MarkerSource::latest_marker",
                detected = false
            ),
        }
        marker
    }
}
