use now_playing_kiosk::config::Config;

#[test]
fn empty_config_uses_defaults() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").expect("write");

    let cfg = Config::from_path(&path).expect("load config");
    assert_eq!(cfg.poll_interval_ms, 5000);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.scroll_threshold, 20);
    assert_eq!(cfg.fallback_image, "spotify_logo.jpg");
    assert_eq!(cfg.weather.timezone, "America/Chicago");
    assert_eq!(cfg.weather.forecast_days, 1);
}

#[test]
fn partial_config_overrides_only_named_fields() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
poll_interval_ms = 2000
credentials_path = "/tmp/token"

[weather]
latitude = 51.5
longitude = -0.12
timezone = "Europe/London"
"#,
    )
    .expect("write");

    let cfg = Config::from_path(&path).expect("load config");
    assert_eq!(cfg.poll_interval_ms, 2000);
    assert_eq!(cfg.credentials_path, std::path::PathBuf::from("/tmp/token"));
    // untouched fields keep their defaults
    assert_eq!(cfg.scroll_threshold, 20);
    assert_eq!(cfg.weather.timezone, "Europe/London");
    assert_eq!(cfg.weather.forecast_days, 1);
}

#[test]
fn invalid_toml_is_an_error() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "poll_interval_ms = \"soon\"").expect("write");
    assert!(Config::from_path(&path).is_err());
}

#[test]
fn example_config_in_repo_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/example-config.toml");
    let cfg = Config::from_path(&path).expect("example config");
    assert_eq!(cfg.poll_interval_ms, 5000);
}
