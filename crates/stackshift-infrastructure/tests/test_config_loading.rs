use std::time::Duration;

use stackshift_infrastructure::paths::LOCAL_CONFIG_FILE;
use stackshift_infrastructure::{MigrationConfig, StackshiftPaths};
use tempfile::TempDir;

#[test]
fn test_load_local_config_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(LOCAL_CONFIG_FILE),
        r#"
[portainer]
url = "https://portainer.example.com/"
username = "admin"
password = "secret"

[swarm]
cluster_id = "jpofkc0i9uo9wtx1zesuk649w"

[policy]
poll_budget_secs = 20
"#,
    )
    .unwrap();

    let path = StackshiftPaths::resolve_config_file(None, temp_dir.path()).unwrap();
    let config = MigrationConfig::load(&path).expect("Should load config");

    assert_eq!(config.url, "https://portainer.example.com");
    assert_eq!(config.cluster_id, "jpofkc0i9uo9wtx1zesuk649w");
    assert_eq!(config.policy.poll_budget, Duration::from_secs(20));
    assert_eq!(config.policy.poll_interval, Duration::from_secs(1));
}

#[test]
fn test_cluster_override() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "[portainer]\nurl = \"http://p\"\nusername = \"u\"\npassword = \"p\"\n[swarm]\ncluster_id = \"a\"\n",
    )
    .unwrap();

    let config = MigrationConfig::load(&path)
        .unwrap()
        .with_cluster_id(" b ");
    assert_eq!(config.cluster_id, "b");
}

#[test]
fn test_malformed_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[portainer\nurl = ").unwrap();

    let err = MigrationConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn test_unreadable_file_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("binary.toml");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let err = MigrationConfig::load(&path).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("binary.toml"));
}
