// SPDX-License-Identifier: PMPL-1.0-or-later

//! Loading and lookup against a real-shaped Polish catalog

use linguist_catalog::types::*;
use linguist_catalog::{LoadOptions, ParseError, Position, TranslationCatalog};
use std::fs::File;
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/qt_pl_sample.ts")
}

fn load_fixture() -> TranslationCatalog {
    TranslationCatalog::load(File::open(fixture()).expect("fixture should exist"))
        .expect("fixture should parse")
}

#[test]
fn test_fixture_shape() {
    let catalog = load_fixture();
    assert_eq!(catalog.header().version.as_deref(), Some("2.1"));
    assert_eq!(catalog.header().language.as_deref(), Some("pl_PL"));
    assert_eq!(catalog.language().as_deref(), Some("pl"));
    assert_eq!(catalog.len(), 14);
    assert_eq!(catalog.duplicates(), 1);
    assert_eq!(
        catalog.contexts(),
        vec![
            "QMessageBox",
            "QColorDialog",
            "QCupsJobWidget",
            "QFileSystemModel",
            "QSqlConnectionDialogUi"
        ]
    );
}

#[test]
fn test_ok_button() {
    let catalog = load_fixture();
    assert_eq!(catalog.lookup("QMessageBox", "OK", None), "OK");
}

#[test]
fn test_empty_translation_falls_back_to_source() {
    let catalog = load_fixture();
    assert_eq!(catalog.lookup("QColorDialog", "Increase", None), "Increase");
}

#[test]
fn test_unknown_triple_is_identity() {
    let catalog = load_fixture();
    assert_eq!(catalog.lookup("NoSuchContext", "NoSuchText", None), "NoSuchText");
    assert_eq!(catalog.lookup("QMessageBox", "NoSuchText", None), "NoSuchText");
    assert_eq!(
        catalog.lookup("QMessageBox", "OK", Some("not a real comment")),
        "OK"
    );
}

#[test]
fn test_every_translated_entry_resolves_to_itself() {
    let catalog = load_fixture();
    for entry in catalog.entries() {
        let expected = if entry.is_active() && !entry.translation.is_empty() {
            entry.translation.as_str()
        } else {
            entry.source.as_str()
        };
        assert_eq!(
            catalog.lookup(&entry.context, &entry.source, entry.disambiguation()),
            expected,
            "lookup mismatch for {}",
            entry.key()
        );
    }
}

#[test]
fn test_banner_page_disambiguation() {
    let catalog = load_fixture();
    assert_eq!(
        catalog.lookup("QCupsJobWidget", "End:", Some("Banner page at end")),
        "Koniec:"
    );
    assert_eq!(
        catalog.lookup("QCupsJobWidget", "Start:", Some("Banner page at start")),
        "Początek:"
    );
    assert_eq!(
        catalog.lookup("QCupsJobWidget", "End:", Some("Banner page at start")),
        "End:"
    );
}

#[test]
fn test_entities_and_bytes_decoded() {
    let catalog = load_fixture();
    assert_eq!(catalog.lookup("QColorDialog", "Hu&e:", None), "Barw&a:");
    assert_eq!(
        catalog.lookup(
            "QMessageBox",
            "<h3>About Qt</h3><p>This program uses Qt version %1.</p>",
            None
        ),
        "<h3>Informacje o Qt</h3><p>Ten program używa Qt w wersji %1.</p>"
    );
    assert_eq!(
        catalog.lookup("QSqlConnectionDialogUi", "Escape\u{1b}sequence", None),
        "Sekwencja\u{1b}ucieczki"
    );
}

#[test]
fn test_duplicate_last_wins() {
    let catalog = load_fixture();
    assert_eq!(
        catalog.lookup("QSqlConnectionDialogUi", "D&atabase name:", None),
        "Nazwa b&azy:"
    );
    let entry = catalog
        .get(&EntryKey::new("QSqlConnectionDialogUi", "D&atabase name:", None))
        .expect("entry should exist");
    assert_eq!(entry.locations[0].line.as_deref(), Some("+30"));
}

#[test]
fn test_obsolete_is_kept_but_not_served() {
    let catalog = load_fixture();
    assert_eq!(
        catalog.lookup("QFileSystemModel", "Date Modified", None),
        "Date Modified"
    );
    let entry = catalog
        .get(&EntryKey::new("QFileSystemModel", "Date Modified", None))
        .expect("obsolete entry kept");
    assert_eq!(entry.state, TranslationState::Obsolete);
}

#[test]
fn test_untranslated_in_file_order() {
    let catalog = load_fixture();
    let sources: Vec<&str> = catalog
        .untranslated_entries()
        .map(|e| e.source.as_str())
        .collect();
    assert_eq!(sources, vec!["Increase", "Scheduled printing:"]);
    assert_eq!(catalog.untranslated_entries().count(), 2);
}

#[test]
fn test_polish_numerus() {
    let catalog = load_fixture();
    let pick = |n| catalog.translate_plural("QFileSystemModel", "%n byte(s)", None, n);
    assert_eq!(pick(1), "1 bajt");
    assert_eq!(pick(2), "2 bajty");
    assert_eq!(pick(5), "5 bajtów");
    assert_eq!(pick(12), "12 bajtów");
    assert_eq!(pick(22), "22 bajty");
    assert_eq!(pick(25), "25 bajtów");
}

#[test]
fn test_locations_are_opaque() {
    let catalog = load_fixture();
    let entry = catalog
        .get(&EntryKey::new("QMessageBox", "OK", None))
        .unwrap();
    assert_eq!(
        entry.locations,
        vec![
            Location {
                filename: Some("../../src/widgets/dialogs/qmessagebox.cpp".into()),
                line: Some("+1921".into()),
            },
            Location {
                filename: None,
                line: Some("+8".into()),
            },
        ]
    );
}

#[test]
fn test_unfinished_can_be_excluded() {
    let doc = r#"<TS><context><name>QPrintDialog</name>
        <message><source>Print</source><translation type="unfinished">Drukuj</translation></message>
        </context></TS>"#;
    let lenient = TranslationCatalog::from_str_with(doc, &LoadOptions::default()).unwrap();
    assert_eq!(lenient.lookup("QPrintDialog", "Print", None), "Drukuj");

    let strict = TranslationCatalog::from_str_with(
        doc,
        &LoadOptions {
            include_unfinished: false,
            language: None,
        },
    )
    .unwrap();
    assert_eq!(strict.lookup("QPrintDialog", "Print", None), "Print");
}

#[test]
fn test_parse_error_positions() {
    let doc = "<TS>\n<context>\n    <name>QMessageBox</name>\n    <message>\n        <source>OK</sourc>\n";
    let err = doc.parse::<TranslationCatalog>().unwrap_err();
    assert_eq!(err.position(), Some(Position::new(5, 19)));
    assert!(err.to_string().starts_with("5:19:"));
}

#[test]
fn test_truncated_document_fails() {
    let full = std::fs::read_to_string(fixture()).unwrap();
    let cut = (0..=full.len() / 2)
        .rev()
        .find(|i| full.is_char_boundary(*i))
        .unwrap();
    let truncated = &full[..cut];
    let err = truncated.parse::<TranslationCatalog>().unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_invalid_utf8_reports_offset() {
    let mut bytes = b"<TS><context><name>Q".to_vec();
    bytes.push(0xC3);
    bytes.extend_from_slice(b"</name></context></TS>");
    let err = TranslationCatalog::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.byte_offset(), Some(20));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = TranslationCatalog::load_path(Path::new("/no/such/catalog.ts")).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
}

#[test]
fn test_crlf_catalog_resolves_multiline_messages() {
    let doc = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<!DOCTYPE TS>\r\n\
        <TS version=\"2.1\" language=\"pl_PL\">\r\n<context>\r\n    <name>QMessageBox</name>\r\n\
        <message>\r\n        <source>Line one\r\nLine two</source>\r\n\
        <translation>Linia jeden\r\nLinia dwa</translation>\r\n    </message>\r\n\
        </context>\r\n</TS>\r\n";
    let catalog: TranslationCatalog = doc.parse().unwrap();
    assert_eq!(
        catalog.lookup("QMessageBox", "Line one\nLine two", None),
        "Linia jeden\nLinia dwa"
    );
    assert_eq!(catalog.entries()[0].source, "Line one\nLine two");
}

#[test]
fn test_crlf_fixture_matches_lf_fixture() {
    let lf = std::fs::read_to_string(fixture()).unwrap();
    let crlf = lf.replace("\r\n", "\n").replace('\n', "\r\n");
    let from_lf: TranslationCatalog = lf.parse().unwrap();
    let from_crlf: TranslationCatalog = crlf.parse().unwrap();
    assert_eq!(from_crlf.entries(), from_lf.entries());
    assert!(from_crlf
        .entries()
        .iter()
        .all(|entry| !entry.source.contains('\r') && !entry.translation.contains('\r')));
}

#[test]
fn test_carriage_return_reference_is_kept() {
    let doc = "<TS><context><name>C</name>\
        <message><source>a&#xd;\nb</source><translation>x&#13;\ny</translation></message>\
        </context></TS>";
    let catalog: TranslationCatalog = doc.parse().unwrap();
    assert_eq!(catalog.lookup("C", "a\r\nb", None), "x\r\ny");
}
