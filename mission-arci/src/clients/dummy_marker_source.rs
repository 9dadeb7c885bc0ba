use crate::{
    traits::{MarkerObservation, MarkerSource},
    ObservedValue,
};

/// Dummy MarkerSource for debug or tests.
#[derive(Debug, Default, Clone)]
pub struct DummyMarkerSource {
    pub observed: ObservedValue<MarkerObservation>,
}

impl DummyMarkerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a detection.
    pub fn observe(&self, marker: MarkerObservation) {
        self.observed.set(marker);
    }
}

impl MarkerSource for DummyMarkerSource {
    fn latest_marker(&self) -> Option<MarkerObservation> {
        self.observed.get()
    }
}
