use super::*;

#[test]
fn test_list_devices_default_first() {
    let names = vec![
        "Device A".to_string(),
        "Device B".to_string(),
        "Device C".to_string(),
    ];

    let devices = sort_default_first(names, Some("Device B"));

    // Default device should be first
    assert!(devices[0].is_default);
    assert_eq!(devices[0].name, "Device B");
    // Remaining devices keep their order
    assert_eq!(devices[1].name, "Device A");
    assert_eq!(devices[2].name, "Device C");
    assert!(!devices[1].is_default && !devices[2].is_default);
}

#[test]
fn test_no_default_device() {
    let devices = sort_default_first(vec!["USB Mic".to_string()], None);
    assert_eq!(devices.len(), 1);
    assert!(!devices[0].is_default);
}

#[test]
fn test_device_serializes_camel_case() {
    let device = AudioInputDevice {
        name: "Built-in Microphone".to_string(),
        is_default: true,
    };
    let json = serde_json::to_string(&device).unwrap();
    assert!(json.contains("\"isDefault\":true"));
}
