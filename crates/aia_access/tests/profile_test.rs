//! Tests for loading per-user command profiles.

use aia_access::*;
use aia_core::{Command, Keyword, UserId};
use aia_error::AccessErrorKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn registry() -> Vec<Command> {
    vec![Command::new("ping", true), Command::new("pong", false)]
}

fn keywords(profile: &UserProfile) -> Vec<&str> {
    profile
        .active_commands()
        .iter()
        .map(Keyword::as_str)
        .collect()
}

// ============================================================================
// Registry Validation
// ============================================================================

#[test]
fn test_unknown_keyword_removed() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "42.json",
        r#"{"UserID":"42","ActiveCommands":["ping","unknown"]}"#,
    );

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    let profile = &load.profiles()[&UserId::new("42")];
    assert_eq!(keywords(profile), vec!["ping"]);
    assert_eq!(load.issues().len(), 1);
    assert!(matches!(
        load.issues()[0].kind(),
        AccessErrorKind::ReferentialMismatch { .. }
    ));
}

#[test]
fn test_keywords_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "1.json",
        r#"{"UserID":"1","ActiveCommands":["PING","Pong"]}"#,
    );

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(
        keywords(&load.profiles()[&UserId::new("1")]),
        vec!["ping", "pong"]
    );
    assert!(load.issues().is_empty());
}

#[test]
fn test_every_kept_keyword_is_registered() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"UserID":"1","ActiveCommands":["ping","x","y"]}"#);
    write(dir.path(), "b.json", r#"{"UserID":"2","ActiveCommands":["z","pong"]}"#);
    write(dir.path(), "c.json", r#"{"UserID":"3","ActiveCommands":["PONG","ping","q"]}"#);

    let registry = registry();
    let load = UserProfileStore::new(dir.path()).load(&registry).unwrap();

    let known: Vec<&Keyword> = registry.iter().map(Command::keyword).collect();
    for profile in load.profiles().values() {
        for keyword in profile.active_commands() {
            assert!(known.contains(&keyword), "{} is not registered", keyword);
        }
    }
}

#[test]
fn test_empty_registry_disables_validation() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "1.json",
        r#"{"UserID":"1","ActiveCommands":["anything","else"]}"#,
    );

    let load = UserProfileStore::new(dir.path())
        .load(&Vec::<Command>::new())
        .unwrap();

    assert_eq!(
        keywords(&load.profiles()[&UserId::new("1")]),
        vec!["anything", "else"]
    );
}

#[test]
fn test_profile_emptied_by_filtering_is_kept() {
    // Only a file that declares no commands is rejected. A profile whose
    // commands are all unknown survives with an empty list.
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "1.json",
        r#"{"UserID":"1","ActiveCommands":["gone","missing"]}"#,
    );

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    let profile = &load.profiles()[&UserId::new("1")];
    assert!(profile.active_commands().is_empty());
    assert_eq!(load.issues().len(), 2);
}

// ============================================================================
// File-level Rejections
// ============================================================================

#[test]
fn test_empty_command_list_excluded() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"UserID":"1","ActiveCommands":[]}"#);
    write(dir.path(), "b.json", r#"{"UserID":"2","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert!(!load.profiles().contains_key(&UserId::new("1")));
    assert!(load.profiles().contains_key(&UserId::new("2")));
}

#[test]
fn test_missing_command_list_excluded() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"UserID":"1"}"#);
    write(dir.path(), "b.json", r#"{"UserID":"2","ActiveCommands":null}"#);
    write(dir.path(), "c.json", r#"{"UserID":"3","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(load.profiles().len(), 1);
    assert_eq!(load.issues().len(), 2);
}

#[test]
fn test_malformed_file_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", "{ not json");
    write(dir.path(), "b.json", r#"{"UserID":"2","ActiveCommands":["ping", 5]}"#);
    write(dir.path(), "c.json", r#"{"UserID":"3","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(*load.files_seen(), 3);
    assert_eq!(load.profiles().len(), 1);
    assert!(load.issues().iter().all(|issue| matches!(
        issue.kind(),
        AccessErrorKind::MalformedRecord { .. }
    )));
}

#[test]
fn test_missing_user_id_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"ActiveCommands":["ping"]}"#);
    write(dir.path(), "b.json", r#"{"UserID":"  ","ActiveCommands":["ping"]}"#);
    write(dir.path(), "c.json", r#"{"UserID":"3","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(load.profiles().len(), 1);
}

#[test]
fn test_duplicate_user_first_path_wins() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.json", r#"{"UserID":"7","ActiveCommands":["pong"]}"#);
    write(dir.path(), "a.json", r#"{"UserID":"7","ActiveCommands":["ping"]}"#);
    write(dir.path(), "c.json", r#"{"UserID":"8","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(load.profiles().len(), 2);
    assert_eq!(keywords(&load.profiles()[&UserId::new("7")]), vec!["ping"]);
    let conflicts = load
        .issues()
        .iter()
        .filter(|issue| matches!(issue.kind(), AccessErrorKind::Conflict { .. }))
        .count();
    assert_eq!(conflicts, 1);
}

#[test]
fn test_duplicate_detection_uses_normalized_id() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"UserID":" 7","ActiveCommands":["ping"]}"#);
    write(dir.path(), "b.json", r#"{"UserID":7,"ActiveCommands":["pong"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(load.profiles().len(), 1);
    assert_eq!(keywords(&load.profiles()[&UserId::new("7")]), vec!["ping"]);
}

#[test]
fn test_duplicate_user_order_compares_whole_path() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/b.json", r#"{"UserID":"7","ActiveCommands":["ping"]}"#);
    write(dir.path(), "a-b.json", r#"{"UserID":"7","ActiveCommands":["pong"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(load.profiles().len(), 1);
    assert_eq!(keywords(&load.profiles()[&UserId::new("7")]), vec!["pong"]);
    assert!(load.issues().iter().any(|issue| matches!(
        issue.kind(),
        AccessErrorKind::Conflict { path, .. } if path.ends_with("a/b.json")
    )));
}

#[test]
fn test_byte_order_mark_accepted() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "1.json",
        "\u{feff}{\"UserID\":\"1\",\"ActiveCommands\":[\"ping\"]}",
    );

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(keywords(&load.profiles()[&UserId::new("1")]), vec!["ping"]);
    assert!(load.issues().is_empty());
}

// ============================================================================
// Enumeration
// ============================================================================

#[test]
fn test_nested_directories_and_other_extensions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "team/ops/1.json", r#"{"UserID":"1","ActiveCommands":["ping"]}"#);
    write(dir.path(), "2.JSON", r#"{"UserID":"2","ActiveCommands":["ping"]}"#);
    write(dir.path(), "notes.txt", r#"{"UserID":"3","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(*load.files_seen(), 2);
    assert!(load.profiles().contains_key(&UserId::new("1")));
    assert!(load.profiles().contains_key(&UserId::new("2")));
    assert!(!load.profiles().contains_key(&UserId::new("3")));
}

#[cfg(unix)]
#[test]
fn test_symlinked_profile_enumerated() {
    let dir = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    write(source.path(), "1.json", r#"{"UserID":"1","ActiveCommands":["ping"]}"#);
    std::os::unix::fs::symlink(source.path().join("1.json"), dir.path().join("1.json")).unwrap();

    let load = UserProfileStore::new(dir.path()).load(&registry()).unwrap();

    assert_eq!(*load.files_seen(), 1);
    assert!(load.profiles().contains_key(&UserId::new("1")));
}

#[test]
fn test_custom_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "1.profile", r#"{"UserID":"1","ActiveCommands":["ping"]}"#);

    let load = UserProfileStore::new(dir.path())
        .with_extension("profile")
        .load(&registry())
        .unwrap();

    assert_eq!(load.profiles().len(), 1);
}

// ============================================================================
// Load-level Failures
// ============================================================================

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();

    let err = UserProfileStore::new(dir.path().join("absent"))
        .load(&registry())
        .unwrap_err();

    assert!(err.kind().is_missing_input());
}

#[test]
fn test_no_profile_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "readme.md", "nothing here");

    let err = UserProfileStore::new(dir.path()).load(&registry()).unwrap_err();

    assert!(matches!(
        err.kind(),
        AccessErrorKind::TotalLoadFailure { .. }
    ));
}

#[test]
fn test_no_profile_accepted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.json", r#"{"UserID":"1","ActiveCommands":[]}"#);
    write(dir.path(), "b.json", "[]");

    let err = UserProfileStore::new(dir.path()).load(&registry()).unwrap_err();

    assert!(matches!(
        err.kind(),
        AccessErrorKind::TotalLoadFailure { .. }
    ));
}
