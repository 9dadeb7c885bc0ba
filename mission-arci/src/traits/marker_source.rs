use auto_impl::auto_impl;
use nalgebra::Isometry3;

/// Pose of the most recently detected marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerObservation {
    pub frame_id: String,
    pub pose: Isometry3<f64>,
}

/// Asynchronously updated source of marker detections.
///
/// There is no contract on timing: a consumer reads whatever was observed
/// last, or `None` if nothing has been detected yet.
#[auto_impl(&, Box, Arc)]
pub trait MarkerSource: Send + Sync {
    fn latest_marker(&self) -> Option<MarkerObservation>;
}
