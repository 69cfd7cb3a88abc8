//! Config load, parse-error and validation tests.

use assert_fs::prelude::*;
use diskmirror_core::{config, ConfigError, LogFormat};
use predicates::prelude::predicate;
use rstest::rstest;

fn write_config(dir: &assert_fs::TempDir, local_folder: &std::path::Path, extra: &str) -> std::path::PathBuf {
    let file = dir.child("config.yaml");
    file.write_str(&format!(
        "local_folder: {}\nremote_folder: disk:/Backup\ntoken: secret\nsync_interval: 30\nlog_file: {}\n{extra}",
        local_folder.display(),
        dir.path().join("diskmirror.log").display(),
    ))
    .expect("write config");
    file.path().to_path_buf()
}

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn load_valid_config_and_validate() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let outbox = dir.child("outbox");
    outbox.create_dir_all().expect("mkdir");

    let path = write_config(&dir, outbox.path(), "log_format: json\npermanently_delete: true\n");
    let cfg = config::load_at(&path).expect("load");
    cfg.validate().expect("valid");

    assert_eq!(cfg.local_folder, outbox.path());
    assert_eq!(cfg.remote_folder, "disk:/Backup");
    assert_eq!(cfg.sync_interval, 30);
    assert_eq!(cfg.log_format, LogFormat::Json);
    assert!(cfg.permanently_delete);
    dir.child("config.yaml").assert(predicate::path::exists());
}

#[test]
fn load_with_explicit_path_validates() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let outbox = dir.child("outbox");
    outbox.create_dir_all().expect("mkdir");
    let path = write_config(&dir, outbox.path(), "");
    assert_eq!(config::load(Some(&path)).expect("load").sync_interval, 30);

    let path = write_config(&dir, &dir.path().join("missing"), "");
    let err = config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::LocalFolderMissing { .. }), "got: {err}");
}

#[test]
fn load_missing_file_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = config::load_at(&dir.path().join("config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[rstest]
#[case::missing_token(
    "local_folder: /tmp\nremote_folder: disk:/B\nsync_interval: 5\nlog_file: /tmp/l.log\n"
)]
#[case::non_numeric_interval(
    "local_folder: /tmp\nremote_folder: disk:/B\ntoken: t\nsync_interval: soon\nlog_file: /tmp/l.log\n"
)]
#[case::negative_interval(
    "local_folder: /tmp\nremote_folder: disk:/B\ntoken: t\nsync_interval: -5\nlog_file: /tmp/l.log\n"
)]
#[case::not_a_mapping("- just\n- a list\n")]
#[case::broken_yaml(": : corrupt : yaml : !!!\n  - broken: [unclosed")]
fn malformed_config_returns_parse_error_with_path(#[case] contents: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str(contents).expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"), "must contain file path, got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Validate
// ---------------------------------------------------------------------------

#[test]
fn validate_rejects_missing_local_folder() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, &dir.path().join("nope"), "");
    let cfg = config::load_at(&path).expect("load");

    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ConfigError::LocalFolderMissing { .. }), "got: {err}");
    assert!(err.to_string().contains("nope"));
}

#[test]
fn validate_rejects_local_folder_that_is_a_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("not-a-dir");
    file.write_str("x").expect("write");
    let path = write_config(&dir, file.path(), "");
    let cfg = config::load_at(&path).expect("load");

    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::LocalFolderMissing { .. })
    ));
}

#[rstest]
#[case::zero_interval("sync_interval", |c: &mut diskmirror_core::SyncConfig| c.sync_interval = 0)]
#[case::blank_token("token", |c: &mut diskmirror_core::SyncConfig| c.token = "  ".into())]
#[case::blank_remote("remote_folder", |c: &mut diskmirror_core::SyncConfig| c.remote_folder.clear())]
#[case::zero_timeout("timeouts.read_secs", |c: &mut diskmirror_core::SyncConfig| c.timeouts.read_secs = 0)]
fn validate_rejects_unusable_values(
    #[case] expected_field: &str,
    #[case] mutate: fn(&mut diskmirror_core::SyncConfig),
) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let outbox = dir.child("outbox");
    outbox.create_dir_all().expect("mkdir");
    let path = write_config(&dir, outbox.path(), "");
    let mut cfg = config::load_at(&path).expect("load");
    mutate(&mut cfg);

    match cfg.validate() {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected Invalid for {expected_field}, got {other:?}"),
    }
}
