use futures::stream::StreamExt;
use mission_arci::{
    nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion},
    Error, MarkerObservation, MarkerSource, ObservedValue,
};
use r2r::visualization_msgs::msg::Marker;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    utils::{self, r2r_error},
    Node,
};

/// `mission_arci::MarkerSource` implementation for ROS2 (visualization_msgs/Marker).
///
/// Keeps the pose of the last marker received on the topic.
pub struct Ros2MarkerSubscriber {
    observed: ObservedValue<MarkerObservation>,
    topic: String,
    // keep not to be dropped
    _node: Node,
}

impl Ros2MarkerSubscriber {
    /// Subscribes to `topic`. Received markers are stored from a background thread.
    pub fn new(node: Node, topic: &str) -> Result<Self, Error> {
        let mut subscriber = node
            .r2r()
            .subscribe::<Marker>(topic, r2r::QosProfile::default())
            .map_err(|e| r2r_error(&format!("subscriber {topic}"), e))?;
        let observed = ObservedValue::new();
        let writer = observed.clone();
        utils::spawn_blocking(async move {
            while let Some(msg) = subscriber.next().await {
                let marker = to_observation(&msg);
                debug!(
                    frame_id = %marker.frame_id,
                    x = marker.pose.translation.x,
                    y = marker.pose.translation.y,
                    z = marker.pose.translation.z,
                    "marker received"
                );
                writer.set(marker);
            }
        });
        Ok(Self {
            observed,
            topic: topic.to_owned(),
            _node: node,
        })
    }

    /// Creates a new `Ros2MarkerSubscriber` from config.
    pub fn new_from_config(node: Node, config: &Ros2MarkerSubscriberConfig) -> Result<Self, Error> {
        Self::new(node, &config.topic)
    }
}

impl std::fmt::Debug for Ros2MarkerSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ros2MarkerSubscriber")
            .field("topic", &self.topic)
            .field("observed", &self.observed)
            .finish_non_exhaustive()
    }
}

fn to_observation(msg: &Marker) -> MarkerObservation {
    let p = &msg.pose.position;
    let o = &msg.pose.orientation;
    let rotation = UnitQuaternion::try_new(Quaternion::new(o.w, o.x, o.y, o.z), f64::EPSILON)
        .unwrap_or_else(UnitQuaternion::identity);
    MarkerObservation {
        frame_id: msg.header.frame_id.clone(),
        pose: Isometry3::from_parts(Translation3::new(p.x, p.y, p.z), rotation),
    }
}

impl MarkerSource for Ros2MarkerSubscriber {
    fn latest_marker(&self) -> Option<MarkerObservation> {
        self.observed.get()
    }
}

/// Configuration for `Ros2MarkerSubscriber`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Ros2MarkerSubscriberConfig {
    /// Topic name for visualization_msgs/Marker.
    #[serde(default = "default_marker_topic")]
    pub topic: String,
}

fn default_marker_topic() -> String {
    "/aruco_detect/marker".to_owned()
}

impl Default for Ros2MarkerSubscriberConfig {
    fn default() -> Self {
        Self {
            topic: default_marker_topic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_to_observation() {
        let mut msg = Marker::default();
        msg.header.frame_id = "camera_link".to_owned();
        msg.pose.position.x = 0.5;
        msg.pose.position.z = 1.5;
        msg.pose.orientation.z = (0.25_f64).sin();
        msg.pose.orientation.w = (0.25_f64).cos();
        let marker = to_observation(&msg);
        assert_eq!(marker.frame_id, "camera_link");
        assert_approx_eq!(marker.pose.translation.x, 0.5);
        assert_approx_eq!(marker.pose.translation.z, 1.5);
        assert_approx_eq!(marker.pose.rotation.angle(), 0.5);
    }

    #[test]
    fn test_zero_quaternion_is_identity() {
        let marker = to_observation(&Marker::default());
        assert_approx_eq!(marker.pose.rotation.angle(), 0.0);
    }
}
