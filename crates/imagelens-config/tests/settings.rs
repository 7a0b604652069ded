use std::io::Write;

use imagelens_config::*;
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn write_toml(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_values_are_loaded() {
    let file = write_toml(
        r#"
default_api_provider = "google"
max_image_size_mb = 20.0
request_timeout = 45
max_retries = 5
batch_concurrency = 4
google_application_credentials = "/srv/creds.json"
"#,
    );

    let settings = SettingsLoader::new()
        .with_file(file.path())
        .with_env_vars(Vec::<(String, String)>::new())
        .load()
        .unwrap();

    assert_eq!(settings.default_provider, ProviderKind::Google);
    assert_eq!(settings.max_image_size_mb, 20.0);
    assert_eq!(settings.request_timeout, 45);
    assert_eq!(settings.max_retries, 5);
    assert_eq!(settings.batch_concurrency, 4);
    assert_eq!(settings.available_providers(), vec![ProviderKind::Google]);
}

#[test]
fn test_env_beats_file() {
    let file = write_toml("request_timeout = 45\nopenai_api_key = \"sk-file\"\n");

    let settings = SettingsLoader::new()
        .with_file(file.path())
        .with_env_vars([("REQUEST_TIMEOUT", "90"), ("OPENAI_API_KEY", "sk-env")])
        .load()
        .unwrap();

    assert_eq!(settings.request_timeout, 90);
    assert_eq!(
        settings.api_key_for(ProviderKind::OpenAi, None).as_deref(),
        Some("sk-env")
    );
}

#[test]
fn test_missing_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SettingsLoader::new()
        .with_file(dir.path().join("absent.toml"))
        .with_env_vars(Vec::<(String, String)>::new())
        .load()
        .unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_empty_env_values_are_ignored() {
    let settings = SettingsLoader::new()
        .with_env_vars([("OPENAI_API_KEY", ""), ("REQUEST_TIMEOUT", "")])
        .load()
        .unwrap();
    assert!(settings.available_providers().is_empty());
    assert_eq!(settings.request_timeout, 30);
}

#[test]
fn test_non_numeric_value_is_parse_error() {
    let result = SettingsLoader::new()
        .with_env_vars([("MAX_RETRIES", "lots")])
        .load();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_zero_concurrency_rejected() {
    let result = SettingsLoader::new()
        .with_env_vars([("BATCH_CONCURRENCY", "0")])
        .load();
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

proptest! {
    #[test]
    fn prop_image_size_in_range_accepted(size in 0.01f64..=100.0) {
        let settings = Settings { max_image_size_mb: size, ..Settings::default() };
        prop_assert!(settings.validate().is_ok());
    }

    #[test]
    fn prop_image_size_out_of_range_rejected(size in 100.001f64..10_000.0) {
        let settings = Settings { max_image_size_mb: size, ..Settings::default() };
        prop_assert!(settings.validate().is_err());
    }

    #[test]
    fn prop_timeout_range(timeout in 0u64..1000) {
        let settings = Settings { request_timeout: timeout, ..Settings::default() };
        prop_assert_eq!(settings.validate().is_ok(), (1..=300).contains(&timeout));
    }
}
