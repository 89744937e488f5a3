use super::*;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SettingsStore {
    SettingsStore::new(dir.path().join("nested").join(SETTINGS_FILE_NAME))
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = store_in(&dir).load().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.threshold, 0.2);
    assert_eq!(settings.dwell_seconds, 11.0);
    assert!(settings.alert_tone);
}

#[test]
fn test_save_creates_directory_and_reloads() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let settings = Settings {
        threshold: 0.35,
        dwell_seconds: 4.5,
        device: Some("USB Microphone".to_string()),
        alert_tone: false,
    };

    store.save(&settings).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load().unwrap(), settings);
}

#[test]
fn test_file_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&Settings::default()).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"dwellSeconds\""));
    assert!(raw.contains("\"alertTone\""));
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"{"dwellSeconds": 3.0, "somethingElse": 1}"#).unwrap();

    let settings = store.load().unwrap();
    assert_eq!(settings.dwell_seconds, 3.0);
    assert_eq!(settings.threshold, 0.2);
    assert_eq!(settings.device, None);
}

#[test]
fn test_corrupt_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "not json").unwrap();

    assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
}

#[test]
fn test_update_persists_changes() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let updated = store
        .update(|s| s.set_monitor_config(MonitorConfig::new(0.5, 7.0)))
        .unwrap();
    assert_eq!(updated.threshold, 0.5);
    assert_eq!(store.load().unwrap().dwell_seconds, 7.0);
}

#[test]
fn test_monitor_config_is_clamped() {
    let settings = Settings {
        threshold: 4.0,
        dwell_seconds: 0.0,
        ..Settings::default()
    };
    let config = settings.monitor_config();
    assert_eq!(config.threshold(), 1.0);
    assert_eq!(config.dwell_seconds(), 0.1);
}

#[test]
fn test_default_location_ends_with_app_dir() {
    // Some CI sandboxes have no config dir; only check the shape when present
    if let Ok(store) = SettingsStore::default_location() {
        assert!(store.path().ends_with("noisewatch/settings.json"));
    }
}
