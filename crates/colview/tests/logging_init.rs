//! Installing the global subscriber. Lives in its own test binary because
//! the subscriber is process-wide.

use colview::ConfigError;
use colview::logging::{LogFormat, LoggingConfig, init};

#[test]
fn second_init_reports_error() {
    let config = LoggingConfig {
        filter: "warn".into(),
        format: LogFormat::Json,
    };
    init(&config).unwrap();
    assert!(matches!(init(&config), Err(ConfigError::Logging(_))));
}
