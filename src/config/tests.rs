use super::load_config;
use super::settings::Settings;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.client.base_url, "ws://127.0.0.1:8080/ws");
    assert_eq!(settings.client.topic_id, "default");
    assert_eq!(settings.client.max_job, 0);
    assert_eq!(settings.client.max_pending, 10_000);
    assert_eq!(settings.client.connect_delay_ms, 5000);
    assert_eq!(settings.client.reconnect_delay_ms, 1000);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // Run from a temporary directory so load_config picks up config/default.toml there.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [client]
        base_url = "wss://broker.example.com/ws"
        token = "file_token"
        topic_id = "billing"
        max_job = 7
        max_pending = 250

        [logging]
        level = "debug"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.client.base_url, "wss://broker.example.com/ws");
    assert_eq!(cfg.client.token, "file_token");
    assert_eq!(cfg.client.topic_id, "billing");
    assert_eq!(cfg.client.max_job, 7);
    assert_eq!(cfg.client.max_pending, 250);
    assert_eq!(cfg.client.acknowledge_timeout_in_seconds, 0);
    assert_eq!(cfg.client.reconnect_delay_ms, 1000);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn load_config_reads_prefixed_environment() {
    temp_env::with_vars(
        [
            ("NUNGGU__CLIENT__TOPIC_ID", Some("orders")),
            ("NUNGGU__CLIENT__ACKNOWLEDGE_TIMEOUT_IN_SECONDS", Some("30")),
            ("NUNGGU__LOGGING__LEVEL", Some("warn")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.client.topic_id, "orders");
            assert_eq!(cfg.client.acknowledge_timeout_in_seconds, 30);
            assert_eq!(cfg.logging.level, "warn");
            assert_eq!(cfg.client.token, "");
        },
    );
}
