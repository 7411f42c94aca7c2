//! End-to-end test through the facade crate.

use aia::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_settings_file_to_access_checks() {
    let dir = TempDir::new().unwrap();
    let users = dir.path().join("users");
    fs::create_dir(&users).unwrap();
    fs::write(dir.path().join("whitelist.txt"), "111\nabc\n222\n").unwrap();
    fs::write(
        users.join("42.json"),
        r#"{"UserID":"42","ActiveCommands":["ping","unknown"],"Comment":"ops"}"#,
    )
    .unwrap();

    let settings_path = dir.path().join("aia.toml");
    fs::write(
        &settings_path,
        format!(
            "working_directory = {:?}\nwhitelist_location = {:?}\nuser_directory = {:?}\napi_port = 3300\n",
            dir.path().display().to_string(),
            dir.path().join("whitelist.txt").display().to_string(),
            users.display().to_string(),
        ),
    )
    .unwrap();

    let settings = UnitSettings::from_file(&settings_path).unwrap();
    let registry = vec![Command::new("ping", true), Command::new("pong", true)];
    let unit = ConfigurationUnit::new(settings);
    let outcome = unit.reload(&registry);

    assert!(outcome.changed());
    assert!(unit.is_admin(111));
    assert!(unit.is_admin(222));
    assert!(unit.is_command_allowed_for_user("42", "ping"));
    assert!(!unit.is_command_allowed_for_user("42", "unknown"));
    assert!(unit.describe_configuration().contains("`3300`"));
}

#[test]
fn test_bad_settings_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("aia.toml");
    fs::write(&settings_path, "api_port = \"not a port\"\n").unwrap();

    let err = UnitSettings::from_file(&settings_path).unwrap_err();

    assert!(matches!(err.kind(), AiaErrorKind::Config(_)));
}
