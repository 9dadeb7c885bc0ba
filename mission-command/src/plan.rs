use mission_arci::{LegResult, Pose2D};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A named target pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Waypoint {
    pub name: String,
    pub pose: Pose2D,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, pose: Pose2D) -> Self {
        Self {
            name: name.into(),
            pose,
        }
    }
}

/// Ordered list of waypoints. Insertion order is traversal order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MissionPlan {
    waypoints: Vec<Waypoint>,
}

impl MissionPlan {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Builds a plan of unnamed poses. Legs are named `leg-<index>`.
    pub fn from_poses(poses: impl IntoIterator<Item = Pose2D>) -> Self {
        Self::new(
            poses
                .into_iter()
                .enumerate()
                .map(|(i, pose)| Waypoint::new(format!("leg-{i}"), pose))
                .collect(),
        )
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl FromIterator<Waypoint> for MissionPlan {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The first leg that did not succeed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegFailure {
    pub index: usize,
    pub name: String,
    pub result: LegResult,
}

/// Summary of one mission run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MissionOutcome {
    /// Number of legs for which navigation was begun.
    pub legs_attempted: usize,
    pub failure: Option<LegFailure>,
}

impl MissionOutcome {
    pub(crate) fn completed(legs_attempted: usize) -> Self {
        Self {
            legs_attempted,
            failure: None,
        }
    }

    pub(crate) fn failed(index: usize, name: &str, result: LegResult) -> Self {
        Self {
            legs_attempted: index + 1,
            failure: Some(LegFailure {
                index,
                name: name.to_owned(),
                result,
            }),
        }
    }

    /// `true` if every leg of the plan succeeded.
    pub fn is_completed(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failed_at_index(&self) -> Option<usize> {
        self.failure.as_ref().map(|f| f.index)
    }

    pub fn into_result(self) -> Result<(), Error> {
        match self.failure {
            None => Ok(()),
            Some(LegFailure {
                index,
                name,
                result,
            }) => Err(Error::LegFailed {
                index,
                name,
                result,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_from_poses_keeps_order() {
        let plan = MissionPlan::from_poses([
            Pose2D::new(0.0, 0.0, 0.0),
            Pose2D::new(4.4, -1.8, -1.0),
        ]);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.waypoints()[0].name, "leg-0");
        assert_eq!(plan.waypoints()[1].name, "leg-1");
        assert_approx_eq!(plan.waypoints()[1].pose.x, 4.4);
        assert!(MissionPlan::default().is_empty());
    }

    #[test]
    fn test_waypoint_toml() {
        let waypoint: Waypoint = toml::from_str(
            r#"
            name = "obstacle 9"
            pose = { x = 4.4, y = -1.8, yaw = -1.0 }
            "#,
        )
        .unwrap();
        assert_eq!(
            waypoint,
            Waypoint::new("obstacle 9", Pose2D::new(4.4, -1.8, -1.0))
        );
    }

    #[test]
    fn test_outcome() {
        let ok = MissionOutcome::completed(4);
        assert!(ok.is_completed());
        assert_eq!(ok.failed_at_index(), None);
        assert!(ok.into_result().is_ok());

        let failed = MissionOutcome::failed(1, "obstacle 9", LegResult::Failed);
        assert!(!failed.is_completed());
        assert_eq!(failed.failed_at_index(), Some(1));
        assert_eq!(failed.legs_attempted, 2);
        let err = failed.into_result().unwrap_err();
        assert!(matches!(err, Error::LegFailed { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "mission-command: Leg 1 (obstacle 9) failed."
        );
    }
}
