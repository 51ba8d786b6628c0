use super::*;

#[test]
fn test_explicit_path_wins() {
    let temp_dir = tempfile::tempdir().unwrap();
    let default = temp_dir.path().join("config.yaml");
    std::fs::write(&default, "scan:\n  on_error: skip\n").unwrap();

    let explicit = PathBuf::from("/somewhere/else.yaml");
    let resolved = resolve_config_path(Some(explicit.clone()), Some(&default));

    assert_eq!(resolved, Some(explicit));
}

#[test]
fn test_existing_default_is_used() {
    let temp_dir = tempfile::tempdir().unwrap();
    let default = temp_dir.path().join("config.yaml");
    std::fs::write(&default, "").unwrap();

    assert_eq!(resolve_config_path(None, Some(&default)), Some(default));
}

#[test]
fn test_missing_default_means_no_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let default = temp_dir.path().join("config.yaml");

    assert_eq!(resolve_config_path(None, Some(&default)), None);
    assert_eq!(resolve_config_path(None, None), None);
}

#[test]
fn test_default_path_layout() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("tagstamp/config.yaml"));
    }
}
