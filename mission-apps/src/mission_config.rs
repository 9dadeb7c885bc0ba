use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use mission_arci::Pose2D;
use mission_command::{MissionPlan, SupervisorConfig, Waypoint};
#[cfg(feature = "ros2")]
use mission_ros2::{Ros2CmdVelMoveBaseConfig, Ros2MarkerSubscriberConfig, Ros2NavigatorConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

/// Where navigation, velocity and marker clients come from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type")]
#[non_exhaustive] // The variants will increase depending on the feature flag.
pub enum BackendConfig {
    /// In-process clients that reach every waypoint immediately unless told
    /// otherwise.
    Dummy {
        /// Index of the first leg that fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fail_at: Option<usize>,
        /// Number of polls each leg stays in progress.
        #[serde(default)]
        polls_to_complete: usize,
    },
    #[cfg(feature = "ros2")]
    Ros2(Ros2BackendConfig),
    // Not public API.
    // A dummy variant to catch that there is a config that requires the ros2 feature.
    #[doc(hidden)]
    #[cfg(not(feature = "ros2"))]
    #[serde(rename = "Ros2")]
    __Ros2,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Dummy {
            fail_at: None,
            polls_to_complete: 0,
        }
    }
}

#[cfg(feature = "ros2")]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Ros2BackendConfig {
    #[serde(default = "default_node_name")]
    pub node_name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default = "default_spin_interval_ms")]
    pub spin_interval_ms: u64,
    #[serde(default)]
    pub navigator: Ros2NavigatorConfig,
    #[serde(default)]
    pub cmd_vel: Ros2CmdVelMoveBaseConfig,
    /// Marker topic. Markers are not observed if this is omitted.
    #[serde(default = "default_marker")]
    pub marker: Option<Ros2MarkerSubscriberConfig>,
}

#[cfg(feature = "ros2")]
fn default_node_name() -> String {
    "task_node".to_owned()
}

#[cfg(feature = "ros2")]
fn default_spin_interval_ms() -> u64 {
    10
}

#[cfg(feature = "ros2")]
fn default_marker() -> Option<Ros2MarkerSubscriberConfig> {
    Some(Ros2MarkerSubscriberConfig::default())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MissionConfig {
    // TOML format has a restriction that if a table itself contains tables,
    // all keys with non-table values must be emitted first.
    // Therefore, these fields must be located at the start of the struct.
    #[serde(default = "default_frame_id")]
    pub frame_id: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Cancel a leg that takes longer than this. Legs may take forever if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg_timeout_secs: Option<f64>,

    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_waypoints")]
    pub waypoints: Vec<Waypoint>,
}

fn default_frame_id() -> String {
    "map".to_owned()
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// Initial position, obstacle 9, an intermediate point, and back.
fn default_waypoints() -> Vec<Waypoint> {
    let initial = Waypoint::new("initial position", Pose2D::new(0.0, 0.0, 0.0));
    vec![
        initial.clone(),
        Waypoint::new("obstacle 9", Pose2D::new(4.4, -1.8, -1.0)),
        Waypoint::new("intermediate point", Pose2D::new(2.5, -0.4, 0.0)),
        initial,
    ]
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            frame_id: default_frame_id(),
            poll_interval_ms: default_poll_interval_ms(),
            leg_timeout_secs: None,
            backend: BackendConfig::default(),
            waypoints: default_waypoints(),
        }
    }
}

impl MissionConfig {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|e| Error::NoFile(path.to_owned(), e))?;
        Self::from_str(&s, path)
    }

    /// Parses `s`. `path` is only used in error messages.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str, path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let config: MissionConfig =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.to_owned(), e))?;
        config.validate(path)?;
        debug!(?path, ?config, "mission config loaded");
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), Error> {
        #[cfg(not(feature = "ros2"))]
        if matches!(self.backend, BackendConfig::__Ros2) {
            return Err(Error::ConfigRequireRos2(path.to_owned()));
        }
        if let Some(timeout) = self.leg_timeout_secs {
            if timeout <= 0.0 || Duration::try_from_secs_f64(timeout).is_err() {
                return Err(Error::InvalidConfig(format!(
                    "{path:?}: leg_timeout_secs must be a positive duration, got {timeout}"
                )));
            }
        }
        for waypoint in &self.waypoints {
            let Pose2D { x, y, yaw } = waypoint.pose;
            if !(x.is_finite() && y.is_finite() && yaw.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "{path:?}: waypoint {:?} has a non-finite pose",
                    waypoint.name
                )));
            }
        }
        Ok(())
    }

    pub fn plan(&self) -> MissionPlan {
        self.waypoints.iter().cloned().collect()
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            frame_id: self.frame_id.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            // out of range only if the field was edited after validation
            leg_timeout: self
                .leg_timeout_secs
                .map(|t| Duration::try_from_secs_f64(t).unwrap_or(Duration::MAX)),
        }
    }

    pub fn has_ros2_clients(&self) -> bool {
        #[cfg(feature = "ros2")]
        {
            matches!(self.backend, BackendConfig::Ros2(_))
        }
        #[cfg(not(feature = "ros2"))]
        {
            false
        }
    }
}

/// Path used in error messages for configs that did not come from a file.
pub(crate) fn inline_config_path() -> PathBuf {
    PathBuf::from("<inline>")
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = MissionConfig::default();
        let plan = config.plan();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.waypoints()[1].name, "obstacle 9");
        assert_approx_eq!(plan.waypoints()[1].pose.yaw, -1.0);
        assert_eq!(plan.waypoints()[0], plan.waypoints()[3]);
        let supervisor = config.supervisor_config();
        assert_eq!(supervisor.frame_id, "map");
        assert_eq!(supervisor.poll_interval, Duration::from_millis(100));
        assert_eq!(supervisor.leg_timeout, None);
        assert!(!config.has_ros2_clients());
    }

    #[test]
    fn test_roundtrip_default() {
        let s = toml::to_string(&MissionConfig::default()).unwrap();
        let config = MissionConfig::from_str(&s, inline_config_path()).unwrap();
        assert_eq!(config, MissionConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MissionConfig::from_str("", inline_config_path()).unwrap();
        assert_eq!(config, MissionConfig::default());
    }

    #[test]
    fn test_leg_timeout() {
        let config = MissionConfig::from_str("leg_timeout_secs = 2.5", inline_config_path()).unwrap();
        assert_eq!(
            config.supervisor_config().leg_timeout,
            Some(Duration::from_millis(2500))
        );
        for invalid in ["-1.0", "0.0", "1e20", "inf", "nan"] {
            let result =
                MissionConfig::from_str(&format!("leg_timeout_secs = {invalid}"), inline_config_path());
            assert!(
                matches!(result, Err(Error::InvalidConfig(_))),
                "{invalid} {result:?}"
            );
        }

        let mut config = MissionConfig::default();
        config.leg_timeout_secs = Some(1e20);
        assert_eq!(config.supervisor_config().leg_timeout, Some(Duration::MAX));
    }

    #[test]
    fn test_dummy_backend() {
        let config = MissionConfig::from_str(
            r#"
            [backend]
            type = "Dummy"
            fail_at = 2
            "#,
            inline_config_path(),
        )
        .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Dummy {
                fail_at: Some(2),
                polls_to_complete: 0
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            MissionConfig::from_str("speed = 1.0", inline_config_path()),
            Err(Error::TomlParseFailure(..))
        ));
    }

    #[cfg(not(feature = "ros2"))]
    #[test]
    fn test_ros2_backend_requires_feature() {
        let result = MissionConfig::from_str(
            r#"
            [backend]
            type = "Ros2"
            node_name = "task_node"
            "#,
            "ros2.toml",
        );
        assert!(
            matches!(result, Err(Error::ConfigRequireRos2(ref p)) if p == Path::new("ros2.toml")),
            "{result:?}"
        );
    }
}
