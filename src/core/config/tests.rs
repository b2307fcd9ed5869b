use super::data::{Config, SessionBackend};
use super::defaults::DEFAULT_API_BASE_URL;
use super::io::ConfigError;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::load_from_path(&dir.path().join("absent.toml")).expect("load");
    assert_eq!(config, Config::default());
    assert_eq!(config.session_backend(), SessionBackend::File);
}

#[test]
fn saved_settings_survive_reload_and_edits() {
    let dir = TempDir::new().expect("tempdir");
    let config_path = dir.path().join("nested").join("config.toml");

    let config = Config {
        api_base_url: Some("https://thrapy.example/api".to_string()),
        session_backend: Some(SessionBackend::Keyring),
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save");
    let loaded = Config::load_from_path(&config_path).expect("reload");
    assert_eq!(loaded, config);

    let mut config = loaded;
    config.session_backend = None;
    config.ai_session_minutes = Some(30);
    config.save_to_path(&config_path).expect("save edit");
    let loaded = Config::load_from_path(&config_path).expect("reload edit");
    assert_eq!(loaded.session_backend, None);
    assert_eq!(loaded.ai_session_minutes, Some(30));
    assert_eq!(
        loaded.api_base_url.as_deref(),
        Some("https://thrapy.example/api")
    );
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "api_base_url = [not toml").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }), "unexpected: {err}");
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn backend_and_minutes_read_from_toml() {
    let config: Config = toml::from_str("session_backend = \"keyring\"\nai_session_minutes = 45")
        .expect("config parses");
    assert_eq!(config.session_backend(), SessionBackend::Keyring);
    assert_eq!(config.ai_session_minutes(), 45);
    assert_eq!(config.therapist_session_minutes(), 60);
}

#[test]
fn zero_minutes_mean_default() {
    let config = Config {
        ai_session_minutes: Some(0),
        ..Default::default()
    };
    assert_eq!(config.ai_session_minutes(), 60);
}

#[test]
fn base_url_prefers_override_then_config() {
    let config = Config::default();
    assert_eq!(config.resolve_api_base_url(None), DEFAULT_API_BASE_URL);

    let config = Config {
        api_base_url: Some("https://configured.example/api/".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.resolve_api_base_url(None),
        "https://configured.example/api"
    );
    assert_eq!(
        config.resolve_api_base_url(Some("http://override.example/api")),
        "http://override.example/api"
    );
    assert_eq!(
        config.resolve_api_base_url(Some("  ")),
        "https://configured.example/api"
    );
}

#[test]
fn failed_mutation_is_not_written() {
    let dir = TempDir::new().expect("tempdir");
    let config_path = dir.path().join("config.toml");

    Config::mutate_at(&config_path, |config| {
        config.therapist_session_minutes = Some(90);
        Ok(())
    })
    .expect("mutate succeeds");

    let result: Result<(), _> = Config::mutate_at(&config_path, |config| {
        config.therapist_session_minutes = Some(15);
        Err("rejected".into())
    });
    assert!(result.is_err());

    let loaded = Config::load_from_path(&config_path).expect("load config");
    assert_eq!(loaded.therapist_session_minutes, Some(90));
}
