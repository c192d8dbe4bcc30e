//! Integration tests for configuration files.

use std::sync::Arc;

use focustone_core::storage::MAX_REPEAT_COUNT;
use focustone_core::{Config, FocusController, RecordingSink, SessionKind};

#[test]
fn save_then_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut cfg = Config::default();
    cfg.set("alarm.pattern", "gentle").unwrap();
    cfg.set("alarm.volume", "80").unwrap();
    cfg.set("session.default_kind", "long_break").unwrap();
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, cfg);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[alarm]"));
    assert!(written.contains("pattern = \"gentle\""));
    assert!(written.contains("default_kind = \"long_break\""));
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[alarm\npattern = ").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("parse"), "{err}");
}

#[test]
fn controller_follows_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[alarm]\npattern = \"chime\"\nrepeat_count = 2\n\n[session]\ndefault_kind = \"short_break\"\n",
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    let sink = Arc::new(RecordingSink::new());
    let mut ctl = FocusController::from_config(&cfg, sink.clone());
    assert_eq!(ctl.clock().kind(), SessionKind::ShortBreak);
    assert_eq!(ctl.alarm_pattern(), "chime");

    ctl.apply(focustone_core::Intent::Start);
    for _ in 0..300 {
        ctl.tick();
    }
    assert!(ctl.clock().is_expired());
    assert_eq!(sink.len(), 4 * 2);
}

#[test]
fn out_of_range_repeat_count_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[alarm]\nrepeat_count = 4000000000\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("alarm.repeat_count"), "{err}");

    std::fs::write(&path, "[alarm]\nrepeat_count = 0\n").unwrap();
    assert!(Config::load_from(&path).is_err());

    std::fs::write(&path, format!("[alarm]\nrepeat_count = {MAX_REPEAT_COUNT}\n")).unwrap();
    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.alarm.repeat_count, MAX_REPEAT_COUNT);
}

#[test]
fn unknown_pattern_in_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[alarm]\npattern = \"foghorn\"\n").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("alarm.pattern"), "{err}");
}
