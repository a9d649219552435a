use std::fs;

use tempfile::TempDir;
use wpr_core::location::week_digest;
use wpr_core::{CalendarDate, FixedClock, StoreConfig, StoreError, WeekFiles, WeeklyStore};

fn today() -> FixedClock {
    FixedClock(CalendarDate::parse("2024-03-20").expect("valid date"))
}

fn config(tmp: &TempDir) -> StoreConfig {
    StoreConfig::new(tmp.path().join("store"))
}

#[test]
fn opening_creates_the_root_but_no_week_files() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);
    let store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");

    assert!(cfg.root.is_dir());
    assert!(store.is_empty());
    assert_eq!(fs::read_dir(&cfg.root).expect("read root").count(), 0);
}

#[test]
fn empty_store_sync_then_reopen_is_empty_and_consistent() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);

    let mut store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");
    store.sync().expect("sync");

    let reopened = WeeklyStore::open_with_clock(&cfg, None, today()).expect("reopen");
    assert!(reopened.is_empty());
    assert_eq!(reopened.memo(), "");
    assert!(reopened.files().check_consistency().expect("check"));
    assert!(!reopened.todolist_path().exists());
}

#[test]
fn added_task_survives_reopen() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);

    let mut store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");
    store.add_task("renew passport").expect("add");
    store.add_task("call plumber").expect("add");
    store.complete_task(2).expect("complete");
    store.set_memo("focus: paperwork\n");
    store.sync().expect("sync");

    let reopened = WeeklyStore::open_with_clock(&cfg, None, today()).expect("reopen");
    assert_eq!(reopened.len(), 2);
    let first = reopened.task(1).expect("task 1");
    assert_eq!(first.description(), "renew passport");
    assert_eq!(first.originated_on().to_string(), "2024-03-20");
    assert!(!first.is_completed());
    assert!(reopened.task(2).expect("task 2").is_completed());
    assert_eq!(reopened.memo(), "focus: paperwork\n");

    let monday = cfg.root.join("2024-03-18");
    assert!(monday.with_extension("todolist").is_file());
    assert!(monday.with_extension("memo").is_file());
    assert!(monday.with_extension("checksum").is_file());
}

#[test]
fn corrupting_one_byte_fails_the_next_open() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);

    let mut store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");
    store.add_task("pay rent").expect("add");
    store.sync().expect("sync");

    let path = store.todolist_path().to_path_buf();
    let mut bytes = fs::read(&path).expect("read");
    bytes[11] = b'C';
    fs::write(&path, bytes).expect("tamper");

    let err = WeeklyStore::open_with_clock(&cfg, None, today()).expect_err("must fail");
    assert!(matches!(err, StoreError::ChecksumMismatch { .. }));
}

#[test]
fn editing_the_memo_externally_is_detected() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);

    let mut store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");
    store.add_task("x").expect("add");
    store.set_memo("original");
    store.sync().expect("sync");

    fs::write(cfg.root.join("2024-03-18.memo"), "rewritten").expect("tamper");
    assert!(matches!(
        store.sync(),
        Err(StoreError::ChecksumMismatch { .. })
    ));
}

#[test]
fn memo_with_invalid_utf8_still_loads() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);
    fs::create_dir_all(&cfg.root).expect("mkdir");

    let memo = [0x66, 0xff, 0x66];
    let todolist = b"2024-03-18:A:pay rent\n";
    let monday = cfg.root.join("2024-03-18");
    fs::write(monday.with_extension("memo"), memo).expect("write memo");
    fs::write(monday.with_extension("todolist"), todolist).expect("write tasks");
    fs::write(
        monday.with_extension("checksum"),
        week_digest(&memo, todolist).to_string(),
    )
    .expect("write checksum");

    let store = WeeklyStore::open_with_clock(&cfg, None, today()).expect("open");
    assert_eq!(store.memo(), "f\u{fffd}f");
    assert_eq!(store.len(), 1);
}

#[test]
fn previous_week_opens_read_only() {
    let tmp = TempDir::new().expect("tempdir");
    let cfg = config(&tmp);
    let last_week = CalendarDate::parse("2024-03-13").expect("valid date");

    let mut store = WeeklyStore::open_with_clock(&cfg, Some(last_week), today()).expect("open");
    assert_eq!(store.week_start().to_string(), "2024-03-11");
    assert!(!store.is_editable());
    assert!(!store.add_task("too late").expect("no-op"));
    store.sync().expect("reload");
    assert!(!cfg.root.join("2024-03-11.todolist").exists());
}

#[test]
fn groups_are_separate_namespaces() {
    let tmp = TempDir::new().expect("tempdir");
    let plain = config(&tmp);
    let work = config(&tmp).with_group("work").expect("group");

    let mut store = WeeklyStore::open_with_clock(&work, None, today()).expect("open");
    store.add_task("ship release").expect("add");
    store.sync().expect("sync");

    let default_ns = WeeklyStore::open_with_clock(&plain, None, today()).expect("open");
    assert!(default_ns.is_empty());
    let work_ns = WeeklyStore::open_with_clock(&work, None, today()).expect("open");
    assert_eq!(work_ns.len(), 1);
    assert_eq!(work_ns.group(), Some("work"));

    assert_eq!(
        wpr_core::list_groups(&plain.root).expect("groups"),
        vec!["work".to_string()]
    );
}
