use std::{fs, path::Path};

use assert_approx_eq::assert_approx_eq;
use mission_apps::{utils::resolve_mission_config, BackendConfig, Error, MissionConfig};

#[test]
fn verify_sample_configs() {
    let files = ["config/fra2mo_mission.toml", "config/dummy_mission.toml"];
    for f in files {
        let result = MissionConfig::new(f);
        if cfg!(not(feature = "ros2")) && f.contains("fra2mo") {
            assert!(
                matches!(result, Err(Error::ConfigRequireRos2(..))),
                "{:?} {:?}",
                f,
                result
            );
        } else {
            assert!(result.is_ok(), "{:?} {:?}", f, result);
            let config = result.unwrap();
            assert_eq!(config.waypoints.len(), 4);
            let ser_result = toml::to_string(&config);
            assert!(ser_result.is_ok(), "{:?} {:?}", f, ser_result);
        }
    }
}

#[test]
fn ser_default_config() {
    toml::to_string(&MissionConfig::default()).unwrap();
}

#[test]
fn schema_default_config() {
    let schema = schemars::schema_for!(MissionConfig);
    let s = serde_json::to_string(&schema).unwrap();
    assert!(s.contains("waypoints"));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        MissionConfig::new("config/does_not_exist.toml"),
        Err(Error::NoFile(..))
    ));
}

#[test]
fn test_overwrite_file_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mission.toml");
    fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("config/dummy_mission.toml"),
        &path,
    )
    .unwrap();

    let config = resolve_mission_config(
        Some(&path),
        Some("backend.fail_at = 1; leg_timeout_secs =; waypoints.[2].pose.x = 3.0"),
    )
    .unwrap();
    assert_eq!(
        config.backend,
        BackendConfig::Dummy {
            fail_at: Some(1),
            polls_to_complete: 3
        }
    );
    assert_eq!(config.leg_timeout_secs, None);
    assert_approx_eq!(config.waypoints[2].pose.x, 3.0);
    assert_approx_eq!(config.waypoints[1].pose.yaw, -1.0);

    // the file itself is untouched
    let unchanged = resolve_mission_config(Some(&path), None).unwrap();
    assert_eq!(unchanged.leg_timeout_secs, Some(5.0));
}

#[test]
fn test_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "waypoints = [").unwrap();
    assert!(matches!(
        MissionConfig::new(&path),
        Err(Error::TomlParseFailure(p, _)) if p == path
    ));
}
