#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for [`ProfileStore`] against real files.
//!
//! Each test works on its own temporary INI file through the default file
//! backend, exactly as a caller of the library would.

mod common;

use std::collections::HashSet;

use common::{StoreTestContext, TestContextBuilder};
use profile_store::ProfileError;
use profile_store::ProfileStore;
use profile_store::probe::BufferLimits;

// ---------------------------------------------------------------------------
// Round trip and idempotence
// ---------------------------------------------------------------------------

#[test]
fn written_values_read_back_exactly() {
    let ctx = StoreTestContext::new();
    let values = [
        "plain",
        "",
        "with spaces inside",
        "  leading and trailing  ",
        "\ttabbed\t",
        "\"already quoted\"",
        "\"",
        "a=b=c",
        ";not a comment",
        "# nor this",
        "[not a section]",
        "ünïcödé ✓ 日本語",
    ];
    for (i, value) in values.iter().enumerate() {
        let key = format!("k{i}");
        ctx.store.write_entry("S", &key, Some(value)).unwrap();
        assert_eq!(
            ctx.store.entry_value("S", &key).unwrap(),
            *value,
            "value {value:?} did not survive a round trip"
        );
    }
    // A fresh store on the same file sees the same values.
    let other = ctx.reopen();
    for (i, value) in values.iter().enumerate() {
        assert_eq!(other.entry_value("S", &format!("k{i}")).unwrap(), *value);
    }
}

#[test]
fn repeated_write_is_idempotent() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("S", "K", Some("V")).unwrap();
    let once = ctx.content();
    ctx.store.write_entry("S", "K", Some("V")).unwrap();
    assert_eq!(ctx.content(), once);
    assert_eq!(ctx.store.entry_names("S").unwrap(), ["K"]);
}

#[test]
fn names_are_case_insensitive() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("Window", "Width", Some("640")).unwrap();
    ctx.store.write_entry("WINDOW", "width", Some("800")).unwrap();
    assert_eq!(ctx.store.entry_value("window", "WIDTH").unwrap(), "800");
    assert_eq!(ctx.content(), "[Window]\nWidth=800\n");
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[test]
fn delete_entry_empties_value() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("S", "K", Some("V")).unwrap();
    ctx.store.delete_entry("S", "K").unwrap();
    assert_eq!(ctx.store.entry_value("S", "K").unwrap(), "");
    assert!(!ctx.store.key_exists("S", "K").unwrap());
}

#[test]
fn write_entry_with_none_deletes() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("S", "K", Some("V")).unwrap();
    ctx.store.write_entry("S", "K", None).unwrap();
    assert!(ctx.store.entry_names("S").unwrap().is_empty());
    assert!(ctx.store.section_exists("S").unwrap());
}

#[test]
fn batch_write_can_delete_keys() {
    let ctx = TestContextBuilder::new()
        .with_ini("[S]\nold=1\nkeep=2\n")
        .build();
    ctx.store
        .write_entries("S", [("old", None), ("new", Some("3"))])
        .unwrap();
    assert_eq!(ctx.store.entry_names("S").unwrap(), ["keep", "new"]);
    assert_eq!(ctx.content(), "[S]\nkeep=2\nnew=3\n");
}

#[test]
fn delete_section_cascades() {
    let ctx = StoreTestContext::new();
    ctx.store
        .write_entries("S", [("a", Some("1")), ("b", Some("2"))])
        .unwrap();
    ctx.store.write_entry("T", "c", Some("3")).unwrap();

    ctx.store.delete_section("S").unwrap();

    assert!(!ctx.store.section_exists("S").unwrap());
    assert_eq!(ctx.store.entry_value("S", "a").unwrap(), "");
    assert_eq!(ctx.store.entry_value("S", "b").unwrap(), "");
    assert!(ctx.store.entry_names("S").unwrap().is_empty());
    assert_eq!(ctx.store.entry_value("T", "c").unwrap(), "3");
}

#[test]
fn deleting_absent_names_is_harmless() {
    let ctx = StoreTestContext::new();
    ctx.store.delete_entry("S", "K").unwrap();
    ctx.store.delete_section("S").unwrap();
    assert!(!ctx.ini_path().exists());
}

// ---------------------------------------------------------------------------
// Existence
// ---------------------------------------------------------------------------

#[test]
fn key_exists_treats_empty_as_absent() {
    let ctx = TestContextBuilder::new()
        .with_ini("[S]\nfull=x\nempty=\n")
        .build();
    assert!(ctx.store.key_exists("S", "full").unwrap());
    assert!(!ctx.store.key_exists("S", "empty").unwrap());
    assert!(!ctx.store.key_exists("S", "missing").unwrap());
    assert_eq!(ctx.store.entry_names("S").unwrap(), ["full", "empty"]);
}

#[test]
fn section_exists_tracks_writes() {
    let ctx = StoreTestContext::new();
    assert!(!ctx.store.section_exists("S").unwrap());
    ctx.store.write_entry("S", "K", Some("V")).unwrap();
    assert!(ctx.store.section_exists("S").unwrap());
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

#[test]
fn entry_names_are_complete_without_artifacts() {
    let ctx = StoreTestContext::new();
    for key in ["a", "b", "c"] {
        ctx.store.write_entry("X", key, Some("v")).unwrap();
    }
    let names = ctx.store.entry_names("X").unwrap();
    let set: HashSet<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(set, HashSet::from(["a", "b", "c"]));
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| !n.is_empty()));
}

#[test]
fn section_names_keep_file_order() {
    let ctx = TestContextBuilder::new()
        .with_ini("; comment\n[zeta]\n[alpha]\nk=v\n[Mid]\n")
        .build();
    assert_eq!(ctx.store.section_names().unwrap(), ["zeta", "alpha", "Mid"]);
}

#[test]
fn missing_file_enumerates_nothing() {
    let ctx = StoreTestContext::new();
    assert!(ctx.store.section_names().unwrap().is_empty());
    assert!(ctx.store.entry_names("any").unwrap().is_empty());
    assert!(ctx.store.entries("any").unwrap().is_empty());
}

#[test]
fn entries_of_ws_in_order() {
    let ctx = StoreTestContext::new();
    ctx.store
        .write_entries("ws", [("k1", Some("v1")), ("k2", Some("v2"))])
        .unwrap();
    assert_eq!(
        ctx.store.entries("ws").unwrap(),
        vec![
            ("k1".to_string(), "v1".to_string()),
            ("k2".to_string(), "v2".to_string()),
        ]
    );
}

// ---------------------------------------------------------------------------
// Growing buffer
// ---------------------------------------------------------------------------

#[test]
fn ten_thousand_char_value_is_not_truncated() {
    let ctx = StoreTestContext::new();
    let value = "0123456789".repeat(1000);
    ctx.store.write_entry("big", "blob", Some(&value)).unwrap();
    let read = ctx.store.entry_value("big", "blob").unwrap();
    assert_eq!(read.len(), 10_000);
    assert_eq!(read, value);
}

#[test]
fn many_sections_enumerate_past_initial_capacity() {
    let ctx = StoreTestContext::new();
    let names: Vec<String> = (0..300).map(|i| format!("section-{i:04}")).collect();
    let ini: String = names.iter().map(|n| format!("[{n}]\n")).collect();
    std::fs::write(ctx.ini_path(), ini).unwrap();
    assert_eq!(ctx.store.section_names().unwrap(), names);
}

#[test]
fn value_beyond_ceiling_is_oversized() {
    let ctx = TestContextBuilder::new()
        .with_limits(BufferLimits {
            initial_value: 8,
            initial_list: 8,
            max: 64,
        })
        .build();
    ctx.store
        .write_entry("S", "K", Some(&"x".repeat(200)))
        .unwrap();
    let err = ctx.store.entry_value("S", "K").unwrap_err();
    assert!(matches!(err, ProfileError::OversizedPayload { limit: 64 }));
    // Values under the ceiling still work.
    ctx.store.write_entry("S", "small", Some("ok")).unwrap();
    assert_eq!(ctx.store.entry_value("S", "small").unwrap(), "ok");
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn find_section_by_key_and_value() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("s1", "Type", Some("t1")).unwrap();
    ctx.store.write_entry("s2", "Type", Some("t2")).unwrap();

    assert_eq!(
        ctx.store
            .find_section_by_key_and_value("Type", "t2")
            .unwrap()
            .as_deref(),
        Some("s2")
    );
    assert_eq!(
        ctx.store.find_section_by_key_and_value("Type", "t3").unwrap(),
        None
    );
}

#[test]
fn find_returns_first_match_in_file_order() {
    let ctx = TestContextBuilder::new()
        .with_ini("[b]\nType=t\n[a]\nType=t\n")
        .build();
    assert_eq!(
        ctx.store
            .find_section_by_key_and_value("Type", "t")
            .unwrap()
            .as_deref(),
        Some("b")
    );
}

// ---------------------------------------------------------------------------
// File handling
// ---------------------------------------------------------------------------

#[test]
fn external_edits_are_seen_immediately() {
    let ctx = StoreTestContext::new();
    ctx.store.write_entry("S", "K", Some("mine")).unwrap();
    std::fs::write(ctx.ini_path(), "[S]\nK=theirs\n").unwrap();
    assert_eq!(ctx.store.entry_value("S", "K").unwrap(), "theirs");
}

#[test]
fn comments_and_layout_survive_edits() {
    let ctx = TestContextBuilder::new()
        .with_ini("; top\n[A]\n# about k\nk = 1\n\n[B]\nx=y\n")
        .build();
    ctx.store.write_entry("A", "k", Some("2")).unwrap();
    ctx.store.write_entry("A", "new", Some("n")).unwrap();
    assert_eq!(
        ctx.content(),
        "; top\n[A]\n# about k\nk=2\nnew=n\n\n[B]\nx=y\n"
    );
}

#[test]
fn crlf_line_endings_are_kept() {
    let ctx = TestContextBuilder::new().with_ini("[A]\r\nk=1\r\n").build();
    ctx.store.write_entry("A", "j", Some("2")).unwrap();
    assert_eq!(ctx.content(), "[A]\r\nk=1\r\nj=2\r\n");
}

#[test]
fn reopened_store_resolves_to_same_path() {
    let ctx = StoreTestContext::new();
    let store = ProfileStore::open(ctx.ini_path()).unwrap();
    assert!(store.path().is_absolute());
    assert_eq!(store.path(), ctx.store.path());
}

#[test]
fn directory_as_store_is_unavailable() {
    let ctx = StoreTestContext::new();
    let store = ProfileStore::open(ctx.dir_path()).unwrap();
    assert!(matches!(
        store.section_names(),
        Err(ProfileError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        store.write_entry("S", "K", Some("V")),
        Err(ProfileError::StoreUnavailable { .. })
    ));
}

#[test]
fn invalid_names_are_rejected_before_touching_the_file() {
    let ctx = StoreTestContext::new();
    let err = ctx.store.write_entry("bad]name", "K", Some("V")).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidName { .. }));
    let err = ctx.store.write_entry("S", "K", Some("two\nlines")).unwrap_err();
    assert!(matches!(err, ProfileError::InvalidValue { .. }));
    assert!(!ctx.ini_path().exists());
}

#[cfg(not(windows))]
#[test]
fn native_backend_is_unsupported_off_windows() {
    use profile_store::backend::BackendKind;
    use profile_store::config::Settings;

    let ctx = StoreTestContext::new();
    let mut settings = Settings::default();
    settings.store.backend = BackendKind::Native;
    let err = ProfileStore::from_settings(ctx.ini_path(), &settings).unwrap_err();
    assert!(matches!(err, ProfileError::UnsupportedBackend { .. }));
}
