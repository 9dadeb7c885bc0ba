use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use mission_arci::Error;
use parking_lot::{Mutex, MutexGuard};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::utils::r2r_error;

const MIN_SPIN_INTERVAL: Duration = Duration::from_millis(1);

/// Shared handle to an `r2r::Node`.
///
/// The node is spun on the tokio runtime it was created on until the last
/// handle is dropped.
#[derive(Clone)]
pub struct Node {
    node: Arc<Mutex<r2r::Node>>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("handles", &Arc::strong_count(&self.node))
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Creates a node and starts spinning it every `spin_interval`.
    ///
    /// Fails if called outside of a tokio runtime.
    pub fn spawn(name: &str, namespace: &str, spin_interval: Duration) -> Result<Self, Error> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| Error::Uninitialized {
            message: format!("node {name} needs a tokio runtime to spin: {e}"),
        })?;
        let ctx = r2r::Context::create().map_err(|e| r2r_error("context", e))?;
        let node = r2r::Node::create(ctx, name, namespace)
            .map_err(|e| r2r_error(&format!("node {name}"), e))?;
        let node = Arc::new(Mutex::new(node));
        runtime.spawn(spin(
            Arc::downgrade(&node),
            spin_interval.max(MIN_SPIN_INTERVAL),
        ));
        Ok(Self { node })
    }

    /// Gets underlying `r2r::Node`.
    pub fn r2r(&self) -> MutexGuard<'_, r2r::Node> {
        self.node.lock()
    }
}

async fn spin(node: Weak<Mutex<r2r::Node>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let Some(node) = node.upgrade() else {
            break;
        };
        // zero timeout: waiting belongs to the ticker, not to the node lock
        node.lock().spin_once(Duration::ZERO);
    }
    debug!("all node handles dropped, stopped spinning");
}
