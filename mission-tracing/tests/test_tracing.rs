use std::{
    io,
    sync::{Arc, Mutex},
};

use mission_arci::*;
use mission_tracing::Tracing;
use tracing::Level;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

fn json_subscriber(buf: &SharedBuf) -> impl tracing::Subscriber + Send + Sync {
    let buf = buf.clone();
    tracing_subscriber::fmt()
        .json()
        .with_max_level(Level::TRACE)
        .with_writer(move || buf.clone())
        .finish()
}

#[tokio::test]
async fn test_navigator_calls_are_traced() {
    let buf = SharedBuf::default();
    let _guard = tracing::subscriber::set_default(json_subscriber(&buf));

    let nav = Tracing::new(DummyNavigator::new());
    nav.wait_until_active().await.unwrap();
    nav.begin_navigation(&Pose2D::new(4.4, -1.8, -1.0), "map")
        .unwrap();
    assert!(nav.is_complete().unwrap());
    assert_eq!(nav.result().unwrap(), LegResult::Succeeded);
    nav.cancel().unwrap();

    let lines = buf.lines();
    let methods = [
        "mission_arci::Navigator::wait_until_active",
        "mission_arci::Navigator::begin_navigation",
        "mission_arci::Navigator::is_complete",
        "mission_arci::Navigator::result",
        "mission_arci::Navigator::cancel",
    ];
    assert_eq!(lines.len(), methods.len());
    for (line, method) in lines.iter().zip(methods) {
        assert!(line.contains(method), "{line}");
    }
    assert!(lines[1].contains("\"goal_x\":4.4"), "{}", lines[1]);
    assert!(lines[1].contains("\"frame_id\":\"map\""), "{}", lines[1]);
    assert!(nav.get_ref().is_active());
}

#[test]
fn test_move_base_and_marker_calls_are_traced() {
    let buf = SharedBuf::default();
    tracing::subscriber::with_default(json_subscriber(&buf), || {
        let base = Tracing::from(DummyMoveBase::new());
        base.send_velocity(&BaseVelocity::zero()).unwrap();
        assert_eq!(base.into_inner().sent_velocities().len(), 1);

        let source = DummyMarkerSource::new();
        let traced = Tracing::new(source.clone());
        assert!(traced.latest_marker().is_none());
        source.observe(MarkerObservation {
            frame_id: "camera".to_owned(),
            pose: Isometry3::identity(),
        });
        assert!(traced.latest_marker().is_some());
    });

    let lines = buf.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("mission_arci::MoveBase::send_velocity"));
    assert!(lines[1].contains("\"detected\":false"));
    assert!(lines[2].contains("\"frame_id\":\"camera\""));
    assert!(lines[2].contains("\"orientation_w\":1.0"));
}
