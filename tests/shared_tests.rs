// SPDX-License-Identifier: PMPL-1.0-or-later

//! Hot reload through SharedCatalog / CatalogSource

use filetime::{set_file_mtime, FileTime};
use linguist_catalog::{CatalogSource, LoadOptions, ReloadError, SharedCatalog};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn catalog_text(yes: &str) -> String {
    format!(
        "<TS language=\"pl\"><context><name>QMessageBox</name>\
         <message><source>Yes</source><translation>{}</translation></message>\
         <message><source>No</source><translation>Nie</translation></message>\
         </context></TS>",
        yes
    )
}

fn write_with_mtime(path: &Path, content: &str, seconds: i64) {
    fs::write(path, content).unwrap();
    set_file_mtime(path, FileTime::from_unix_time(seconds, 0)).unwrap();
}

#[test]
fn test_reload_swaps_on_change() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("qt_pl.ts");
    write_with_mtime(&path, &catalog_text("Tak"), 1_000);

    let source = CatalogSource::new(&path, LoadOptions::default());
    let shared = SharedCatalog::new(source.load().unwrap());
    assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Tak");

    assert!(!source.reload_if_changed(&shared).unwrap());

    write_with_mtime(&path, &catalog_text("Jasne"), 2_000);
    assert!(source.reload_if_changed(&shared).unwrap());
    assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Jasne");
}

#[test]
fn test_touch_without_content_change_skips_swap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("qt_pl.ts");
    write_with_mtime(&path, &catalog_text("Tak"), 1_000);

    let source = CatalogSource::new(&path, LoadOptions::default());
    let shared = SharedCatalog::new(source.load().unwrap());
    let before = shared.snapshot();

    set_file_mtime(&path, FileTime::from_unix_time(5_000, 0)).unwrap();
    assert!(!source.reload_if_changed(&shared).unwrap());
    assert!(Arc::ptr_eq(&before, &shared.snapshot()));
}

#[test]
fn test_broken_file_keeps_old_catalog() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("qt_pl.ts");
    write_with_mtime(&path, &catalog_text("Tak"), 1_000);

    let source = CatalogSource::new(&path, LoadOptions::default());
    let shared = SharedCatalog::new(source.load().unwrap());

    write_with_mtime(&path, "<TS><context><name>QMessageBox</name>", 2_000);
    let err = source.reload_if_changed(&shared).unwrap_err();
    assert!(matches!(err, ReloadError::Parse { .. }));
    assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Tak");

    write_with_mtime(&path, &catalog_text("Jasne"), 3_000);
    assert!(source.reload_if_changed(&shared).unwrap());
    assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Jasne");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let source = CatalogSource::new(dir.path().join("gone.ts"), LoadOptions::default());
    let shared = SharedCatalog::default();
    assert!(matches!(
        source.reload_if_changed(&shared),
        Err(ReloadError::Io { .. })
    ));
}

#[test]
fn test_readers_see_whole_catalogs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("qt_pl.ts");
    write_with_mtime(&path, &catalog_text("Tak"), 1_000);

    let source = CatalogSource::new(&path, LoadOptions::default());
    let shared = Arc::new(SharedCatalog::new(source.load().unwrap()));
    let start = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                let deadline = Instant::now() + Duration::from_secs(10);
                let mut reads = 0usize;
                loop {
                    let snapshot = shared.snapshot();
                    let yes = snapshot.lookup("QMessageBox", "Yes", None);
                    assert!(yes == "Tak" || yes == "Jasne", "unexpected {:?}", yes);
                    assert_eq!(snapshot.lookup("QMessageBox", "No", None), "Nie");
                    assert_eq!(snapshot.len(), 2);
                    reads += 1;
                    if yes == "Jasne" {
                        return reads;
                    }
                    assert!(Instant::now() < deadline, "swap never became visible");
                }
            })
        })
        .collect();

    write_with_mtime(&path, &catalog_text("Jasne"), 2_000);
    start.wait();
    assert!(source.reload_if_changed(&shared).unwrap());

    for reader in readers {
        assert!(reader.join().unwrap() >= 1);
    }
    assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Jasne");
}
