// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serializes a catalog back to `.ts` XML
//!
//! Output follows the layout lupdate produces (four-space indentation,
//! contexts in first-seen order) so regenerated files diff cleanly against
//! tool-written ones.

use crate::catalog::parser::LENGTH_VARIANT_SEPARATOR;
use crate::catalog::TranslationCatalog;
use crate::types::CatalogEntry;
use std::io::{self, Write};

pub fn to_ts_string(catalog: &TranslationCatalog) -> String {
    let mut out = String::with_capacity(catalog.len() * 160 + 128);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    let header = catalog.header();
    out.push_str("<TS");
    push_attribute(&mut out, "version", header.version.as_deref().or(Some("2.1")));
    push_attribute(&mut out, "language", header.language.as_deref());
    push_attribute(&mut out, "sourcelanguage", header.source_language.as_deref());
    out.push_str(">\n");

    for context in catalog.contexts() {
        out.push_str("<context>\n    <name>");
        push_escaped(&mut out, context);
        out.push_str("</name>\n");
        for entry in catalog.entries().iter().filter(|e| e.context == context) {
            push_message(&mut out, entry);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

pub fn write_ts<W: Write>(catalog: &TranslationCatalog, mut writer: W) -> io::Result<()> {
    writer.write_all(to_ts_string(catalog).as_bytes())?;
    writer.flush()
}

fn push_message(out: &mut String, entry: &CatalogEntry) {
    out.push_str("    <message");
    if let Some(id) = &entry.id {
        push_attribute(out, "id", Some(id));
    }
    if entry.numerus {
        push_attribute(out, "numerus", Some("yes"));
    }
    out.push_str(">\n");

    for location in &entry.locations {
        out.push_str("        <location");
        push_attribute(out, "filename", location.filename.as_deref());
        push_attribute(out, "line", location.line.as_deref());
        out.push_str("/>\n");
    }

    push_element(out, "source", Some(&entry.source));
    push_element(out, "comment", entry.disambiguation.as_deref());
    push_element(out, "extracomment", entry.extra_comment.as_deref());
    push_element(out, "translatorcomment", entry.translator_comment.as_deref());

    out.push_str("        <translation");
    push_attribute(out, "type", entry.state.attribute());
    if entry.numerus && !entry.plural_forms.is_empty() {
        out.push_str(">\n");
        for form in &entry.plural_forms {
            out.push_str("            <numerusform");
            push_text_or_variants(out, form);
            out.push_str("</numerusform>\n");
        }
        out.push_str("        </translation>\n");
    } else {
        push_text_or_variants(out, &entry.translation);
        out.push_str("</translation>\n");
    }

    out.push_str("    </message>\n");
}

/// Writes the rest of an open tag plus its content.
fn push_text_or_variants(out: &mut String, text: &str) {
    if text.contains(LENGTH_VARIANT_SEPARATOR) {
        out.push_str(" variants=\"yes\">");
        for variant in text.split(LENGTH_VARIANT_SEPARATOR) {
            out.push_str("<lengthvariant>");
            push_escaped(out, variant);
            out.push_str("</lengthvariant>");
        }
    } else {
        out.push('>');
        push_escaped(out, text);
    }
}

fn push_element(out: &mut String, name: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    out.push_str("        <");
    out.push_str(name);
    out.push('>');
    push_escaped(out, value);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        for ch in value.chars() {
            match ch {
                c if (c as u32) < 0x20 || c == '"' || c == '&' || c == '<' => {
                    out.push_str(&format!("&#x{:x};", c as u32));
                }
                c => out.push(c),
            }
        }
        out.push('"');
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#xd;"),
            '\n' | '\t' => out.push(ch),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("<byte value=\"x{:x}\"/>", c as u32));
            }
            c => out.push(c),
        }
    }
}
