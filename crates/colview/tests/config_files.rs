//! Loading `ViewConfig` from disk.

use std::io::Write;

use colview::{ColumnSpec, ColumnView, ConfigError, Easing, ImmediateAnimator, ViewConfig};

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn toml_file_drives_the_view() {
    let file = write_temp(
        ".toml",
        r#"
        drag_z_index = 9
        default_min_width = 40.0
        easing = "ease_in_out"
        "#,
    );
    let config = ViewConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.easing, Easing::EaseInOut);

    let mut view = ColumnView::new(config, Box::new(ImmediateAnimator), None);
    let id = view.add_column(ColumnSpec::new("Name", 10.0));
    assert_eq!(view.column(id).unwrap().width(), 40.0);
    view.start_drag(id, 0.0).unwrap();
    assert_eq!(view.column(id).unwrap().z_index(), 9);
}

#[test]
fn json_file_round_trips() {
    let config = ViewConfig {
        allow_reorder: false,
        default_max_width: Some(300.0),
        ..ViewConfig::default()
    };
    let file = write_temp(".json", &serde_json::to_string_pretty(&config).unwrap());
    assert_eq!(ViewConfig::from_json_file(file.path()).unwrap(), config);
}

#[test]
fn invalid_file_lists_every_problem() {
    let file = write_temp(
        ".toml",
        r#"
        base_z_index = 4
        drag_z_index = 4
        animation_duration_ms = 60000
        "#,
    );
    match ViewConfig::from_toml_file(file.path()) {
        Err(ConfigError::Invalid(problems)) => assert_eq!(problems.len(), 2, "{problems:?}"),
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ViewConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
