use std::time::Duration;

use mission_arci::{BaseVelocity, LegResult, MoveBase, Navigator};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::{Error, MissionOutcome, MissionPlan, Waypoint};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Debug, PartialEq)]
pub struct SupervisorConfig {
    /// Frame the waypoints are expressed in.
    pub frame_id: String,
    /// How often the navigator is asked whether the current leg is done.
    pub poll_interval: Duration,
    /// Upper bound on a single leg. `None` waits forever.
    pub leg_timeout: Option<Duration>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            frame_id: "map".to_owned(),
            poll_interval: Duration::from_millis(100),
            leg_timeout: None,
        }
    }
}

/// Runs a [`MissionPlan`] leg by leg and stops at the first leg that does not
/// succeed.
#[derive(Debug)]
pub struct MissionSupervisor<N, M> {
    navigator: N,
    move_base: M,
    config: SupervisorConfig,
}

impl<N, M> MissionSupervisor<N, M>
where
    N: Navigator,
    M: MoveBase,
{
    pub fn new(navigator: N, move_base: M, config: SupervisorConfig) -> Self {
        Self {
            navigator,
            move_base,
            config,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn move_base(&self) -> &M {
        &self.move_base
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub async fn wait_until_active(&self) -> Result<(), Error> {
        info!("Waiting for the navigator to become active");
        self.navigator.wait_until_active().await?;
        info!("Navigator is active");
        Ok(())
    }

    /// Navigates to every waypoint of `plan` in order.
    ///
    /// A leg that ends in anything but [`LegResult::Succeeded`] ends the
    /// mission: later legs are not begun and no stop command is sent. When
    /// every leg succeeds, a single zero velocity is sent to the base.
    ///
    /// Errors reported by the navigator or the base are returned as `Err`;
    /// leg failures are reported through the returned [`MissionOutcome`].
    pub async fn execute(&self, plan: &MissionPlan) -> Result<MissionOutcome, Error> {
        info!(legs = plan.len(), frame_id = %self.config.frame_id, "Starting mission");
        for (index, waypoint) in plan.waypoints().iter().enumerate() {
            info!(
                "Going to {} {} [{}/{}]",
                waypoint.name,
                waypoint.pose,
                index + 1,
                plan.len()
            );
            let result = self.run_leg(waypoint).await?;
            if !result.is_succeeded() {
                error!("Failed to reach {} ({result})", waypoint.name);
                return Ok(MissionOutcome::failed(index, &waypoint.name, result));
            }
            info!("Reached {}", waypoint.name);
        }

        self.move_base.send_velocity(&BaseVelocity::zero())?;
        info!("Mission completed successfully, robot stopped");
        Ok(MissionOutcome::completed(plan.len()))
    }

    async fn run_leg(&self, waypoint: &Waypoint) -> Result<LegResult, Error> {
        self.navigator
            .begin_navigation(&waypoint.pose, &self.config.frame_id)?;
        match self.config.leg_timeout {
            None => self.wait_for_completion().await?,
            Some(leg_timeout) => match timeout(leg_timeout, self.wait_for_completion()).await {
                Ok(completion) => completion?,
                Err(_) => {
                    warn!(
                        "{} was not reached within {leg_timeout:?}, canceling",
                        waypoint.name
                    );
                    self.navigator.cancel()?;
                    return Ok(LegResult::Canceled);
                }
            },
        }
        Ok(self.navigator.result()?)
    }

    async fn wait_for_completion(&self) -> Result<(), Error> {
        let mut ticker = interval(self.config.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls: u64 = 0;
        loop {
            ticker.tick().await;
            polls += 1;
            if self.navigator.is_complete()? {
                debug!(polls, "leg complete");
                return Ok(());
            }
        }
    }
}
