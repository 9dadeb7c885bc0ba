use std::sync::Arc;

use futures::stream::StreamExt;
use mission_arci::{
    nalgebra::{UnitQuaternion, Vector3},
    Error, LegResult, Navigator, Pose2D,
};
use parking_lot::Mutex;
use r2r::{
    builtin_interfaces::msg::Time, geometry_msgs::msg, nav2_msgs::action::NavigateToPose,
    std_msgs::msg::Header, GoalStatus,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    utils::{self, r2r_error},
    Node,
};

/// `mission_arci::Navigator` implementation for ROS2 (nav2_msgs/NavigateToPose).
pub struct Ros2Navigator {
    action_client: r2r::ActionClient<NavigateToPose::Action>,
    node: Node,
    state: Arc<Mutex<GoalState<r2r::ActionClientGoal<NavigateToPose::Action>>>>,
}

/// Bookkeeping of the latest goal. `H` is the server-side goal handle.
#[derive(Debug)]
struct GoalState<H> {
    // Incremented by every goal; a finishing goal only records its status
    // if it is still the latest one.
    generation: u64,
    has_goal: bool,
    cancel_requested: bool,
    result: Option<LegResult>,
    handle: Option<H>,
}

impl<H> Default for GoalState<H> {
    fn default() -> Self {
        Self {
            generation: 0,
            has_goal: false,
            cancel_requested: false,
            result: None,
            handle: None,
        }
    }
}

impl<H> GoalState<H> {
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.has_goal = true;
        self.cancel_requested = false;
        self.result = None;
        self.handle = None;
        self.generation
    }

    /// Records the handle of an accepted goal. Returns it back if a cancel
    /// arrived while the goal was in flight.
    fn accept(&mut self, generation: u64, handle: H) -> Option<H> {
        if self.generation != generation {
            return None;
        }
        if self.cancel_requested {
            return Some(handle);
        }
        self.handle = Some(handle);
        None
    }

    /// Returns the handle to cancel now. Without a handle yet, the cancel is
    /// deferred until the goal is accepted.
    fn request_cancel(&mut self) -> Option<H> {
        if self.is_complete() {
            return None;
        }
        self.cancel_requested = true;
        self.handle.take()
    }

    fn finish(&mut self, generation: u64, result: LegResult) {
        if self.generation == generation {
            self.result = Some(result);
            self.handle = None;
        }
    }

    fn is_complete(&self) -> bool {
        !self.has_goal || self.result.is_some()
    }
}

impl Ros2Navigator {
    /// Creates a new `Ros2Navigator` from nav2_msgs/NavigateToPose action name.
    pub fn new(node: Node, action_name: &str) -> Result<Self, Error> {
        let action_client = node
            .r2r()
            .create_action_client::<NavigateToPose::Action>(action_name)
            .map_err(|e| r2r_error(&format!("action client {action_name}"), e))?;
        Ok(Self {
            action_client,
            node,
            state: Arc::new(Mutex::new(GoalState::default())),
        })
    }

    /// Creates a new `Ros2Navigator` from config.
    pub fn new_from_config(node: Node, config: &Ros2NavigatorConfig) -> Result<Self, Error> {
        Self::new(node, &config.action_name)
    }
}

impl std::fmt::Debug for Ros2Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Ros2Navigator")
            .field("node", &self.node)
            .field("generation", &state.generation)
            .field("cancel_requested", &state.cancel_requested)
            .field("result", &state.result)
            .finish_non_exhaustive()
    }
}

fn to_pose_msg(pose: &Pose2D) -> msg::Pose {
    let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), pose.yaw);
    msg::Pose {
        position: msg::Point {
            x: pose.x,
            y: pose.y,
            z: 0.0,
        },
        orientation: msg::Quaternion {
            x: q.coords.x,
            y: q.coords.y,
            z: q.coords.z,
            w: q.coords.w,
        },
    }
}

fn to_leg_result(status: GoalStatus) -> LegResult {
    match status {
        GoalStatus::Succeeded => LegResult::Succeeded,
        GoalStatus::Canceled => LegResult::Canceled,
        _ => LegResult::Failed,
    }
}

#[mission_arci::async_trait]
impl Navigator for Ros2Navigator {
    async fn wait_until_active(&self) -> Result<(), Error> {
        let is_available = self
            .node
            .r2r()
            .is_available(&self.action_client)
            .map_err(|e| r2r_error("is_available", e))?;
        is_available
            .await
            .map_err(|e| r2r_error("waiting for action server", e))
    }

    fn begin_navigation(&self, goal: &Pose2D, frame_id: &str) -> Result<(), Error> {
        let mut clock =
            r2r::Clock::create(r2r::ClockType::RosTime).map_err(|e| r2r_error("clock", e))?;
        let now = clock.get_now().map_err(|e| r2r_error("clock", e))?;
        let goal = NavigateToPose::Goal {
            pose: msg::PoseStamped {
                header: Header {
                    frame_id: frame_id.to_owned(),
                    stamp: Time {
                        sec: now.as_secs() as i32,
                        nanosec: now.subsec_nanos(),
                    },
                },
                pose: to_pose_msg(goal),
            },
            ..Default::default()
        };
        let send_goal_request = self
            .action_client
            .send_goal_request(goal)
            .map_err(|e| r2r_error("send_goal_request", e))?;

        let generation = self.state.lock().begin();
        let state = self.state.clone();
        utils::spawn_blocking(async move {
            let outcome = match send_goal_request.await {
                Ok((handle, result, feedback)) => {
                    let to_cancel = state.lock().accept(generation, handle);
                    if let Some(handle) = to_cancel {
                        debug!("canceling a goal accepted after cancel was requested");
                        cancel_goal(&handle).await;
                    }
                    tokio::spawn(feedback.for_each(|_| std::future::ready(())));
                    match result.await {
                        Ok((status, _)) => {
                            debug!(?status, "navigate_to_pose finished");
                            to_leg_result(status)
                        }
                        Err(e) => {
                            warn!("navigate_to_pose result error: {e:?}");
                            LegResult::Failed
                        }
                    }
                }
                Err(e) => {
                    warn!("navigate_to_pose goal was rejected: {e:?}");
                    LegResult::Failed
                }
            };
            state.lock().finish(generation, outcome);
        });
        Ok(())
    }

    fn is_complete(&self) -> Result<bool, Error> {
        Ok(self.state.lock().is_complete())
    }

    fn result(&self) -> Result<LegResult, Error> {
        self.state.lock().result.ok_or_else(|| Error::Uninitialized {
            message: "no navigation goal has completed".to_owned(),
        })
    }

    fn cancel(&self) -> Result<(), Error> {
        let to_cancel = self.state.lock().request_cancel();
        if let Some(handle) = to_cancel {
            utils::spawn_blocking(async move { cancel_goal(&handle).await });
        }
        Ok(())
    }
}

async fn cancel_goal(handle: &r2r::ActionClientGoal<NavigateToPose::Action>) {
    match handle.cancel() {
        Ok(fut) => {
            if let Err(e) = fut.await {
                warn!("navigate_to_pose cancel failed: {e:?}");
            }
        }
        Err(e) => warn!("navigate_to_pose cancel request failed: {e:?}"),
    }
}

/// Configuration for `Ros2Navigator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Ros2NavigatorConfig {
    /// Action name for nav2_msgs/NavigateToPose.
    #[serde(default = "default_action_name")]
    pub action_name: String,
}

fn default_action_name() -> String {
    "navigate_to_pose".to_owned()
}

impl Default for Ros2NavigatorConfig {
    fn default() -> Self {
        Self {
            action_name: default_action_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_to_pose_msg() {
        let pose = to_pose_msg(&Pose2D::new(4.4, -1.8, -1.0));
        assert_approx_eq!(pose.position.x, 4.4);
        assert_approx_eq!(pose.position.y, -1.8);
        assert_approx_eq!(pose.orientation.x, 0.0);
        assert_approx_eq!(pose.orientation.y, 0.0);
        assert_approx_eq!(pose.orientation.z, (-0.5_f64).sin());
        assert_approx_eq!(pose.orientation.w, (-0.5_f64).cos());
    }

    #[test]
    fn test_cancel_before_accept() {
        let mut state = GoalState::<&str>::default();
        assert!(state.request_cancel().is_none());
        assert!(!state.cancel_requested);

        let generation = state.begin();
        assert!(!state.is_complete());
        assert!(state.request_cancel().is_none());
        // the handle arriving after the cancel is handed back to be canceled
        assert_eq!(state.accept(generation, "goal"), Some("goal"));
        assert!(state.handle.is_none());
        state.finish(generation, LegResult::Canceled);
        assert!(state.is_complete());
        assert_eq!(state.result, Some(LegResult::Canceled));
    }

    #[test]
    fn test_cancel_after_accept() {
        let mut state = GoalState::default();
        let generation = state.begin();
        assert_eq!(state.accept(generation, "goal"), None);
        assert_eq!(state.request_cancel(), Some("goal"));
        assert!(state.request_cancel().is_none());
    }

    #[test]
    fn test_stale_goal() {
        let mut state = GoalState::default();
        let first = state.begin();
        state.request_cancel();
        let second = state.begin();
        assert!(!state.cancel_requested);
        assert_eq!(state.accept(first, "first"), None);
        state.finish(first, LegResult::Failed);
        assert!(!state.is_complete());
        assert_eq!(state.accept(second, "second"), None);
        assert_eq!(state.handle, Some("second"));
        state.finish(second, LegResult::Succeeded);
        assert_eq!(state.result, Some(LegResult::Succeeded));
        // nothing left to cancel once the goal has finished
        assert!(state.request_cancel().is_none());
    }

    #[test]
    fn test_to_leg_result() {
        assert_eq!(to_leg_result(GoalStatus::Succeeded), LegResult::Succeeded);
        assert_eq!(to_leg_result(GoalStatus::Canceled), LegResult::Canceled);
        assert_eq!(to_leg_result(GoalStatus::Aborted), LegResult::Failed);
    }
}
