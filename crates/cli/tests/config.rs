use std::io::Write;

use keytree_cli::config::Config;
use keytree_core::PrivateKey;

fn token(seed: u8) -> String {
    PrivateKey::from_seed(&[seed; 32]).public_key().to_token()
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_trust_config_from_file() {
    let file = write_config(&format!(
        r#"
# Two of three private servers.
[trust]
keys = ["{}", "{}", "{}"]
threshold = 2
max_signature_age_secs = 120

[logging]
level = "debug"
format = "json"
"#,
        token(1),
        token(2),
        token(3)
    ));

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");

    let trust = config.trust_config().unwrap();
    assert_eq!(trust.keys().len(), 3);
    assert_eq!(trust.threshold(), 2);
    assert_eq!(trust.max_signature_age_secs(), 120);
}

#[test]
fn test_keys_from_environment() {
    std::env::set_var("KEYTREE_CONFIG_TEST_KEY", token(7));
    let file = write_config(
        r#"
[trust]
keys = ["${KEYTREE_CONFIG_TEST_KEY}"]
threshold = 1
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.trust.keys, vec![token(7)]);
    assert_eq!(config.trust.max_signature_age_secs, 60);
    std::env::remove_var("KEYTREE_CONFIG_TEST_KEY");
}

#[test]
fn test_rejects_threshold_above_key_count() {
    let file = write_config(&format!(
        r#"
[trust]
keys = ["{}"]
threshold = 2
"#,
        token(1)
    ));
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("threshold"));
}

#[test]
fn test_rejects_zero_threshold() {
    let file = write_config(&format!(
        r#"
[trust]
keys = ["{}"]
threshold = 0
"#,
        token(1)
    ));
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_rejects_malformed_key() {
    let file = write_config(
        r#"
[trust]
keys = ["ed25519-pub(not-a-key)"]
threshold = 1
"#,
    );
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Trust key #0"));
}

#[test]
fn test_rejects_empty_keys() {
    let file = write_config(
        r#"
[trust]
keys = []
threshold = 1
"#,
    );
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file() {
    let err = Config::from_file("/nonexistent/keytree.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
