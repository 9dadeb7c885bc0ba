use std::sync::Mutex;

use mission_arci::{BaseVelocity, Error, MoveBase};
use r2r::geometry_msgs::msg::Twist;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{utils::r2r_error, Node};

/// `mission_arci::MoveBase` implementation for ROS2.
pub struct Ros2CmdVelMoveBase {
    vel_publisher: Mutex<r2r::Publisher<Twist>>,
    topic: String,
    // keep not to be dropped
    _node: Node,
}

impl Ros2CmdVelMoveBase {
    /// Creates a new `Ros2CmdVelMoveBase` from geometry_msgs/Twist topic name.
    pub fn new(node: Node, cmd_topic_name: &str) -> Result<Self, Error> {
        let vel_publisher = node
            .r2r()
            .create_publisher(cmd_topic_name, r2r::QosProfile::default())
            .map_err(|e| r2r_error(&format!("publisher {cmd_topic_name}"), e))?;
        Ok(Self {
            vel_publisher: Mutex::new(vel_publisher),
            topic: cmd_topic_name.to_owned(),
            _node: node,
        })
    }

    /// Creates a new `Ros2CmdVelMoveBase` from config.
    pub fn new_from_config(node: Node, config: &Ros2CmdVelMoveBaseConfig) -> Result<Self, Error> {
        Self::new(node, &config.topic)
    }
}

impl std::fmt::Debug for Ros2CmdVelMoveBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ros2CmdVelMoveBase")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

fn to_twist(velocity: &BaseVelocity) -> Twist {
    let mut twist_msg = Twist::default();
    twist_msg.linear.x = velocity.x;
    twist_msg.linear.y = velocity.y;
    twist_msg.angular.z = velocity.theta;
    twist_msg
}

impl MoveBase for Ros2CmdVelMoveBase {
    fn send_velocity(&self, velocity: &BaseVelocity) -> Result<(), Error> {
        self.vel_publisher
            .lock()
            .map_err(|_| Error::Connection {
                message: format!("publisher for {} is poisoned", self.topic),
            })?
            .publish(&to_twist(velocity))
            .map_err(|e| r2r_error(&format!("publish to {}", self.topic), e))
    }
}

/// Configuration for `Ros2CmdVelMoveBase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Ros2CmdVelMoveBaseConfig {
    /// Topic name for geometry_msgs/Twist.
    #[serde(default = "default_cmd_vel_topic")]
    pub topic: String,
}

fn default_cmd_vel_topic() -> String {
    "/cmd_vel".to_owned()
}

impl Default for Ros2CmdVelMoveBaseConfig {
    fn default() -> Self {
        Self {
            topic: default_cmd_vel_topic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_to_twist() {
        let twist = to_twist(&BaseVelocity::new(0.1, -0.2, 0.3));
        assert_approx_eq!(twist.linear.x, 0.1);
        assert_approx_eq!(twist.linear.y, -0.2);
        assert_approx_eq!(twist.linear.z, 0.0);
        assert_approx_eq!(twist.angular.z, 0.3);
        let stop = to_twist(&BaseVelocity::zero());
        assert_eq!(stop, Twist::default());
    }
}
