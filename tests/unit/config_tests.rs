// Configuration module unit tests

use std::io::Write;

use tempfile::NamedTempFile;
use utsushi::config::*;
use utsushi::error::ConfigError;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp config");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[test]
fn test_can_deserialize_empty_yaml_config() {
    let config: Config = serde_yaml::from_str("{}").expect("Failed to deserialize YAML");
    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.threads, 4);
    assert_eq!(config.server.max_concurrent_requests, 1000);
    assert_eq!(config.server.issue_path, "/issue");
    assert_eq!(config.media.cdn_host, "res.cloudinary.com");
    assert_eq!(config.media.resource_type, "image");
    assert_eq!(config.media.delivery_type, "authenticated");
    assert_eq!(config.media.default_transformation, "f_auto,q_auto,dpr_auto");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_can_deserialize_full_yaml_config() {
    let yaml = r#"
server:
  address: "127.0.0.1"
  port: 9000
  threads: 2
  max_concurrent_requests: 50
  issue_path: "/sign"
  security_limits:
    max_header_size: 1024
    max_uri_length: 512
media:
  cloud_name: "demo"
  api_key: "123456"
  api_secret: "shh"
  cdn_host: "media.example.com"
  delivery_type: "private"
  default_transformation: "q_auto"
logging:
  level: "debug"
  format: "text"
"#;
    let config: Config = serde_yaml::from_str(yaml).expect("Failed to deserialize YAML");

    assert_eq!(config.server.listen_addr(), "127.0.0.1:9000");
    assert_eq!(config.server.security_limits.max_uri_length, 512);
    assert_eq!(config.media.delivery_type, "private");
    assert_eq!(config.logging.format, LogFormat::Text);
    assert!(config.media.credentials().is_some());
    assert!(config.validate().is_ok());
    assert_eq!(
        config.issue_paths(),
        vec!["/sign".to_string(), "/api/cloudinary-url".to_string()]
    );
}

#[test]
fn test_env_substitution_in_yaml() {
    std::env::set_var("UTSUSHI_TEST_SUBST_SECRET", "from-env-secret");
    let yaml = r#"
media:
  cloud_name: "demo"
  api_key: "123456"
  api_secret: "${UTSUSHI_TEST_SUBST_SECRET}"
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.media.api_secret.as_deref(), Some("from-env-secret"));
}

#[test]
fn test_env_substitution_missing_variable_is_error() {
    let yaml = r#"
media:
  api_secret: "${UTSUSHI_TEST_DEFINITELY_UNSET_VAR}"
"#;
    let result = Config::from_yaml_with_env(yaml);
    match result {
        Err(ConfigError::MissingEnvVar(name)) => {
            assert_eq!(name, "UTSUSHI_TEST_DEFINITELY_UNSET_VAR")
        }
        other => panic!("Expected MissingEnvVar, got {:?}", other),
    }
}

#[test]
fn test_from_file_reads_yaml() {
    let file = write_config(
        r#"
server:
  port: 8181
media:
  cloud_name: "demo"
  api_key: "123456"
  api_secret: "shh"
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 8181);
    assert!(config.media.credentials().is_some());
}

#[test]
fn test_load_with_path_uses_file() {
    let file = write_config("server:\n  port: 8282\n");
    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 8282);
}

#[test]
fn test_from_file_missing_file_is_read_error() {
    let result = Config::from_file("/nonexistent/utsushi/config.yaml");
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn test_from_file_invalid_yaml_is_parse_error() {
    let file = write_config("server: [not, a, map\n");
    let result = Config::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_validate_rejects_zero_port() {
    let mut config = Config::default();
    config.server.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_concurrency() {
    let mut config = Config::default();
    config.server.max_concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_accepts_missing_credentials() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.media.missing_credentials(),
        vec![
            "CLOUDINARY_CLOUD_NAME",
            "CLOUDINARY_API_KEY",
            "CLOUDINARY_API_SECRET"
        ]
    );
}
