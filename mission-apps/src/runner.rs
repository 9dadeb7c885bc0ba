use mission_arci::{
    DummyMarkerSource, DummyMoveBase, DummyNavigator, MarkerObservation, MarkerSource, MoveBase,
    Navigator,
};
use mission_command::{MissionOutcome, MissionSupervisor};
use mission_tracing::Tracing;
use tracing::info;

use crate::{BackendConfig, Error, MissionConfig};

/// Exit code of a mission in which a leg did not succeed.
pub const EXIT_CODE_LEG_FAILED: u8 = 1;
/// Exit code when the mission could not be run at all.
pub const EXIT_CODE_ERROR: u8 = 2;

/// Clients the mission talks to.
pub struct MissionClients {
    pub navigator: Box<dyn Navigator>,
    pub move_base: Box<dyn MoveBase>,
    pub marker_source: Option<Box<dyn MarkerSource>>,
}

impl std::fmt::Debug for MissionClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissionClients")
            .field("has_marker_source", &self.marker_source.is_some())
            .finish_non_exhaustive()
    }
}

impl MissionConfig {
    /// Creates the clients described by `backend`, each wrapped in [`Tracing`].
    ///
    /// ROS2 clients spin their node on the current tokio runtime.
    pub fn create_clients(&self) -> Result<MissionClients, Error> {
        match &self.backend {
            BackendConfig::Dummy {
                fail_at,
                polls_to_complete,
            } => {
                let navigator = match fail_at {
                    Some(index) => DummyNavigator::failing_at(*index),
                    None => DummyNavigator::new(),
                }
                .with_polls_to_complete(*polls_to_complete);
                Ok(MissionClients {
                    navigator: Box::new(Tracing::new(navigator)),
                    move_base: Box::new(Tracing::new(DummyMoveBase::new())),
                    marker_source: Some(Box::new(Tracing::new(DummyMarkerSource::new()))),
                })
            }
            #[cfg(feature = "ros2")]
            BackendConfig::Ros2(config) => create_ros2_clients(config),
            #[cfg(not(feature = "ros2"))]
            BackendConfig::__Ros2 => Err(Error::InvalidConfig(
                "backend type \"Ros2\" requires the ros2 feature".to_owned(),
            )),
        }
    }
}

#[cfg(feature = "ros2")]
fn create_ros2_clients(config: &crate::Ros2BackendConfig) -> Result<MissionClients, Error> {
    use std::time::Duration;

    use mission_ros2::{Node, Ros2CmdVelMoveBase, Ros2MarkerSubscriber, Ros2Navigator};

    let node = Node::spawn(
        &config.node_name,
        &config.namespace,
        Duration::from_millis(config.spin_interval_ms),
    )?;
    let navigator = Ros2Navigator::new_from_config(node.clone(), &config.navigator)?;
    let move_base = Ros2CmdVelMoveBase::new_from_config(node.clone(), &config.cmd_vel)?;
    let marker_source = match &config.marker {
        Some(marker) => Some(Box::new(Tracing::new(Ros2MarkerSubscriber::new_from_config(
            node.clone(),
            marker,
        )?)) as Box<dyn MarkerSource>),
        None => None,
    };
    Ok(MissionClients {
        navigator: Box::new(Tracing::new(navigator)),
        move_base: Box::new(Tracing::new(move_base)),
        marker_source,
    })
}

/// Waits for the navigator, then runs every waypoint of `config`.
pub async fn run_mission(
    config: &MissionConfig,
    clients: &MissionClients,
) -> Result<MissionOutcome, Error> {
    let supervisor = MissionSupervisor::new(
        &*clients.navigator,
        &*clients.move_base,
        config.supervisor_config(),
    );
    supervisor.wait_until_active().await?;
    let outcome = supervisor.execute(&config.plan()).await?;
    if let Some(marker_source) = &clients.marker_source {
        report_marker(marker_source.latest_marker().as_ref());
    }
    Ok(outcome)
}

/// Logs the last observed marker pose.
pub fn report_marker(marker: Option<&MarkerObservation>) {
    match marker {
        Some(marker) => {
            let t = &marker.pose.translation;
            let (roll, pitch, yaw) = marker.pose.rotation.euler_angles();
            info!(
                "Marker in {}: position ({:.3}, {:.3}, {:.3}), rpy ({:.3}, {:.3}, {:.3})",
                marker.frame_id, t.x, t.y, t.z, roll, pitch, yaw
            );
        }
        None => info!("No marker observed"),
    }
}

/// Maps the result of [`run_mission`] to a process exit code.
pub fn exit_code(result: &Result<MissionOutcome, Error>) -> u8 {
    match result {
        Ok(outcome) if outcome.is_completed() => 0,
        Ok(_) => EXIT_CODE_LEG_FAILED,
        Err(_) => EXIT_CODE_ERROR,
    }
}
