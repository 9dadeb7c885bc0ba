use std::sync::Mutex;

use crate::{
    error::{Error, Result},
    traits::Navigator,
    LegResult, Pose2D,
};

/// Dummy Navigator for debug or tests.
///
/// Goal `i` resolves to `results[i]`, or to [`LegResult::Succeeded`] when no
/// result was scripted for it. The goal at `fail_at` always fails.
#[derive(Debug, Default)]
pub struct DummyNavigator {
    results: Vec<LegResult>,
    fail_at: Option<usize>,
    polls_to_complete: usize,
    never_complete: bool,
    state: Mutex<DummyNavigatorState>,
}

#[derive(Debug, Default)]
struct DummyNavigatorState {
    is_active: bool,
    goals: Vec<(Pose2D, String)>,
    remaining_polls: usize,
    result: Option<LegResult>,
    poll_count: usize,
    cancel_count: usize,
}

impl DummyNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result of each goal in the order they are sent.
    pub fn with_results(mut self, results: Vec<LegResult>) -> Self {
        self.results = results;
        self
    }

    /// Makes the first goal at `index` fail and every earlier goal succeed.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    /// Number of `is_complete` calls that report `false` before each goal
    /// completes.
    pub fn with_polls_to_complete(mut self, polls: usize) -> Self {
        self.polls_to_complete = polls;
        self
    }

    /// Goals never complete unless canceled.
    pub fn never_completing(mut self) -> Self {
        self.never_complete = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().is_active
    }

    /// Every goal received so far, oldest first.
    pub fn goals(&self) -> Vec<Pose2D> {
        self.state
            .lock()
            .unwrap()
            .goals
            .iter()
            .map(|(pose, _)| *pose)
            .collect()
    }

    pub fn frame_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .goals
            .iter()
            .map(|(_, frame_id)| frame_id.clone())
            .collect()
    }

    pub fn poll_count(&self) -> usize {
        self.state.lock().unwrap().poll_count
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().unwrap().cancel_count
    }
}

#[async_trait::async_trait]
impl Navigator for DummyNavigator {
    async fn wait_until_active(&self) -> Result<()> {
        self.state.lock().unwrap().is_active = true;
        Ok(())
    }

    fn begin_navigation(&self, goal: &Pose2D, frame_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.goals.push((*goal, frame_id.to_owned()));
        state.remaining_polls = self.polls_to_complete;
        state.result = None;
        Ok(())
    }

    fn is_complete(&self) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.poll_count += 1;
        if state.goals.is_empty() || state.result.is_some() {
            return Ok(true);
        }
        if self.never_complete {
            return Ok(false);
        }
        if state.remaining_polls > 0 {
            state.remaining_polls -= 1;
            return Ok(false);
        }
        let index = state.goals.len() - 1;
        state.result = Some(if self.fail_at == Some(index) {
            LegResult::Failed
        } else {
            self.results
                .get(index)
                .copied()
                .unwrap_or(LegResult::Succeeded)
        });
        Ok(true)
    }

    fn result(&self) -> Result<LegResult> {
        self.state
            .lock()
            .unwrap()
            .result
            .ok_or_else(|| Error::Uninitialized {
                message: "no navigation goal has completed".to_owned(),
            })
    }

    fn cancel(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.cancel_count += 1;
        if !state.goals.is_empty() && state.result.is_none() {
            state.result = Some(LegResult::Canceled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_activate() {
        let nav = DummyNavigator::new();
        assert!(!nav.is_active());
        nav.wait_until_active().await.unwrap();
        assert!(nav.is_active());
    }

    #[test]
    fn test_scripted_results() {
        let nav = DummyNavigator::failing_at(1);
        assert!(nav.result().is_err());

        nav.begin_navigation(&Pose2D::new(1.0, 2.0, 3.0), "map")
            .unwrap();
        assert!(nav.is_complete().unwrap());
        assert_eq!(nav.result().unwrap(), LegResult::Succeeded);

        nav.begin_navigation(&Pose2D::new(4.0, 5.0, 6.0), "odom")
            .unwrap();
        assert!(nav.is_complete().unwrap());
        assert_eq!(nav.result().unwrap(), LegResult::Failed);

        // unscripted goals succeed
        nav.begin_navigation(&Pose2D::default(), "map").unwrap();
        assert!(nav.is_complete().unwrap());
        assert_eq!(nav.result().unwrap(), LegResult::Succeeded);

        assert_eq!(
            nav.goals(),
            vec![
                Pose2D::new(1.0, 2.0, 3.0),
                Pose2D::new(4.0, 5.0, 6.0),
                Pose2D::default()
            ]
        );
        assert_eq!(nav.frame_ids(), vec!["map", "odom", "map"]);
    }

    #[test]
    fn test_failing_at_far_index() {
        let nav = DummyNavigator::failing_at(usize::MAX);
        for _ in 0..3 {
            nav.begin_navigation(&Pose2D::default(), "map").unwrap();
            assert!(nav.is_complete().unwrap());
            assert_eq!(nav.result().unwrap(), LegResult::Succeeded);
        }
    }

    #[test]
    fn test_polls_to_complete() {
        let nav = DummyNavigator::new().with_polls_to_complete(2);
        nav.begin_navigation(&Pose2D::default(), "map").unwrap();
        assert!(!nav.is_complete().unwrap());
        assert!(nav.result().is_err());
        assert!(!nav.is_complete().unwrap());
        assert!(nav.is_complete().unwrap());
        assert!(nav.is_complete().unwrap());
        assert_eq!(nav.poll_count(), 4);
        assert_eq!(nav.result().unwrap(), LegResult::Succeeded);
    }

    #[test]
    fn test_cancel() {
        let nav = DummyNavigator::new().never_completing();
        nav.begin_navigation(&Pose2D::default(), "map").unwrap();
        for _ in 0..10 {
            assert!(!nav.is_complete().unwrap());
        }
        nav.cancel().unwrap();
        assert!(nav.is_complete().unwrap());
        assert_eq!(nav.result().unwrap(), LegResult::Canceled);
        assert_eq!(nav.cancel_count(), 1);
    }
}
