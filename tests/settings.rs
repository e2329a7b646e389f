use tempora::{EqualsMode, Settings, TemporaError};

#[test]
fn defaults_follow_containment() {
    let settings = Settings::default();
    assert_eq!(settings.reduced_precision_equals, EqualsMode::Containment);
    assert_eq!(settings.placeholder_prefix, "");
}

#[test]
fn toml_overrides_defaults() {
    let settings = Settings::from_toml("reduced_precision_equals = \"exact\"\nplaceholder_prefix = \"tf_\"\n").unwrap();
    assert_eq!(settings.reduced_precision_equals, EqualsMode::Exact);
    assert_eq!(settings.placeholder_prefix, "tf_");

    let partial = Settings::from_toml("placeholder_prefix = \"p\"").unwrap();
    assert_eq!(partial.reduced_precision_equals, EqualsMode::Containment);
}

#[test]
fn unknown_mode_is_a_config_error() {
    let err = Settings::from_toml("reduced_precision_equals = \"roughly\"").unwrap_err();
    assert!(matches!(err, TemporaError::Config(_)));
}

#[test]
fn settings_file_is_read() {
    let path = std::env::temp_dir().join(format!("tempora-settings-{}.toml", std::process::id()));
    std::fs::write(&path, "reduced_precision_equals = \"exact\"\n").unwrap();
    let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(settings.reduced_precision_equals, EqualsMode::Exact);
}

#[test]
fn missing_settings_file_is_an_error() {
    let path = std::env::temp_dir().join("tempora-settings-that-does-not-exist.toml");
    let err = Settings::load(Some(path.to_str().unwrap())).unwrap_err();
    assert!(err.to_string().starts_with("Config error"));
}
