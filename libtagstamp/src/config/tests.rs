use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.registry.url, "https://gcr.io");
    assert_eq!(
        config.registry.repository,
        "kubeflow-images-public/admission-webhook"
    );
    assert!(config.registry.username.is_none());
    assert!(config.registry.password.is_none());
    assert_eq!(config.network.timeout, 30);
    assert_eq!(config.scan.on_error, OnError::Abort);
}

#[test]
fn test_from_str_empty_yaml() {
    let config = Config::from_yaml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_str_partial_yaml() {
    let yaml = r#"
registry:
  url: https://registry.hub.docker.com
  repository: murillovaz/minecraft-server
scan:
  on_error: skip
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(config.registry.url, "https://registry.hub.docker.com");
    assert_eq!(config.registry.repository, "murillovaz/minecraft-server");
    assert_eq!(config.scan.on_error, OnError::Skip);

    // Untouched sections keep their defaults
    assert_eq!(config.network.timeout, 30);
    assert!(config.registry.username.is_none());
}

#[test]
fn test_from_str_credentials_and_timeout() {
    let yaml = r#"
registry:
  username: robot
  password: hunter2
network:
  timeout: 0
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(config.registry.username.as_deref(), Some("robot"));
    assert_eq!(config.registry.password.as_deref(), Some("hunter2"));
    assert_eq!(config.registry.url, "https://gcr.io");
    assert_eq!(config.network.timeout, 0);
}

#[test]
fn test_from_str_invalid_on_error() {
    let yaml = r#"
scan:
  on_error: sometimes
"#;
    let err = Config::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, TagstampError::Config { .. }));
}

#[test]
fn test_from_str_invalid_yaml() {
    let err = Config::from_yaml_str("registry: [unclosed").unwrap_err();
    assert!(matches!(err, TagstampError::Config { .. }));
}

#[test]
fn test_load_without_path_uses_defaults() {
    let config = Config::load(None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "registry:\n  repository: team/app\nnetwork:\n  timeout: 5").unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.registry.repository, "team/app");
    assert_eq!(config.network.timeout, 5);
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");

    match Config::load(Some(&path)).unwrap_err() {
        TagstampError::Config { path: Some(p), .. } => {
            assert!(p.ends_with("missing.yaml"));
        }
        other => panic!("Expected Config error with path, got {:?}", other),
    }
}

#[test]
fn test_client_config_uses_network_timeout() {
    let config = Config::from_yaml_str("network:\n  timeout: 12").unwrap();

    assert_eq!(config.client_config().timeout_seconds, 12);
}
