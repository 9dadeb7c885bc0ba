use std::fmt;

use nalgebra::{Isometry2, Vector2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Target location and heading in a fixed map frame.
///
/// `yaw` is in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub yaw: f64,
}

impl Pose2D {
    pub const fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    /// Converts to an isometry on the plane.
    ///
    /// # Example
    ///
    /// ```
    /// use assert_approx_eq::assert_approx_eq;
    /// use mission_arci::Pose2D;
    ///
    /// let iso = Pose2D::new(4.4, -1.8, -1.0).to_isometry();
    /// assert_approx_eq!(iso.translation.x, 4.4);
    /// assert_approx_eq!(iso.translation.y, -1.8);
    /// assert_approx_eq!(iso.rotation.angle(), -1.0);
    /// ```
    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.x, self.y), self.yaw)
    }
}

impl From<Pose2D> for Isometry2<f64> {
    fn from(pose: Pose2D) -> Self {
        pose.to_isometry()
    }
}

impl From<Isometry2<f64>> for Pose2D {
    fn from(iso: Isometry2<f64>) -> Self {
        Self::new(iso.translation.x, iso.translation.y, iso.rotation.angle())
    }
}

impl fmt::Display for Pose2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.3}, y: {:.3}, yaw: {:.3})",
            self.x, self.y, self.yaw
        )
    }
}

/// Outcome of navigating to one pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LegResult {
    Succeeded,
    Failed,
    Canceled,
}

impl LegResult {
    pub fn is_succeeded(self) -> bool {
        matches!(self, LegResult::Succeeded)
    }
}

impl fmt::Display for LegResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegResult::Succeeded => f.write_str("succeeded"),
            LegResult::Failed => f.write_str("failed"),
            LegResult::Canceled => f.write_str("canceled"),
        }
    }
}
