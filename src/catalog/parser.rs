// SPDX-License-Identifier: PMPL-1.0-or-later

//! Builds catalog records from the XML event stream
//!
//! Expected shape:
//!
//! ```text
//! TS (version, language, sourcelanguage)
//! └── context*
//!     ├── name
//!     └── message* (numerus, id)
//!         ├── location* (filename, line)
//!         ├── source
//!         ├── comment?            disambiguation
//!         ├── extracomment?
//!         ├── translatorcomment?
//!         └── translation? (type)
//!             └── numerusform*    numerus messages only
//! ```
//!
//! Elements we do not model (`oldsource`, `userdata`, `extra-*`, ...) are
//! skipped with their whole subtree.

use crate::catalog::error::{ParseError, Position};
use crate::catalog::xml::{attribute, Event, Reader};
use crate::types::{CatalogEntry, CatalogHeader, Location, TranslationState};

/// Separator Qt uses between length variants of one string.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub header: CatalogHeader,
    /// Every record in file order, duplicates included.
    pub records: Vec<CatalogEntry>,
}

pub fn parse_document(text: &str) -> Result<ParsedDocument, ParseError> {
    let mut parser = DocumentParser {
        reader: Reader::new(text),
    };
    parser.parse()
}

struct DocumentParser<'a> {
    reader: Reader<'a>,
}

impl DocumentParser<'_> {
    fn parse(&mut self) -> Result<ParsedDocument, ParseError> {
        let mut document = ParsedDocument::default();

        let root_closed = loop {
            match self.reader.next_event()? {
                Event::Text(_) => continue,
                Event::Start {
                    name,
                    attributes,
                    self_closing,
                    ..
                } if name == "TS" => {
                    document.header = CatalogHeader {
                        version: attribute(&attributes, "version").map(str::to_string),
                        language: attribute(&attributes, "language").map(str::to_string),
                        source_language: attribute(&attributes, "sourcelanguage")
                            .map(str::to_string),
                    };
                    break self_closing;
                }
                Event::Start { name, position, .. } => {
                    return Err(ParseError::UnexpectedElement {
                        position,
                        expected: "<TS> root element".into(),
                        found: name,
                    })
                }
                Event::End { position, .. } => {
                    return Err(ParseError::syntax(position, "expected <TS> root element"))
                }
                Event::Eof => {
                    return Err(ParseError::syntax(
                        self.reader.position(),
                        "expected <TS> root element",
                    ))
                }
            }
        };

        if !root_closed {
            loop {
                match self.reader.next_event()? {
                    Event::Text(_) => {}
                    Event::Start {
                        name,
                        position,
                        self_closing,
                        ..
                    } => {
                        if name == "context" && !self_closing {
                            let records = self.parse_context(position)?;
                            document.records.extend(records);
                        } else if name == "context" {
                            return Err(missing(position, "context", "name"));
                        } else if !self_closing {
                            self.skip_element()?;
                        }
                    }
                    Event::End { .. } => break,
                    Event::Eof => return Err(eof(&self.reader)),
                }
            }
        }

        match self.reader.next_event()? {
            Event::Eof => Ok(document),
            Event::End { position, .. } | Event::Start { position, .. } => {
                Err(ParseError::syntax(position, "content after the <TS> root element"))
            }
            Event::Text(_) => Err(ParseError::syntax(
                self.reader.position(),
                "content after the <TS> root element",
            )),
        }
    }

    fn parse_context(&mut self, start: Position) -> Result<Vec<CatalogEntry>, ParseError> {
        let mut name: Option<String> = None;
        let mut messages = Vec::new();
        loop {
            match self.reader.next_event()? {
                Event::Text(_) => {}
                Event::Start {
                    name: element,
                    attributes,
                    position,
                    self_closing,
                } => match element.as_str() {
                    "name" => {
                        name = Some(if self_closing {
                            String::new()
                        } else {
                            self.read_text("name")?
                        });
                    }
                    "message" => {
                        if self_closing {
                            return Err(missing(position, "message", "source"));
                        }
                        messages.push(self.parse_message(&attributes, position)?);
                    }
                    _ => {
                        if !self_closing {
                            self.skip_element()?;
                        }
                    }
                },
                Event::End { .. } => break,
                Event::Eof => return Err(eof(&self.reader)),
            }
        }

        let context = name.ok_or_else(|| missing(start, "context", "name"))?;
        for message in &mut messages {
            message.context = context.clone();
        }
        Ok(messages)
    }

    fn parse_message(
        &mut self,
        attributes: &[(String, String)],
        start: Position,
    ) -> Result<CatalogEntry, ParseError> {
        let mut entry = CatalogEntry {
            numerus: attribute(attributes, "numerus") == Some("yes"),
            id: attribute(attributes, "id").map(str::to_string),
            ..Default::default()
        };
        let mut source: Option<String> = None;

        loop {
            match self.reader.next_event()? {
                Event::Text(_) => {}
                Event::Start {
                    name,
                    attributes,
                    position,
                    self_closing,
                } => {
                    let text = |parser: &mut Self, element: &str| -> Result<String, ParseError> {
                        if self_closing {
                            Ok(String::new())
                        } else {
                            parser.read_text(element)
                        }
                    };
                    match name.as_str() {
                        "location" => {
                            entry.locations.push(Location {
                                filename: attribute(&attributes, "filename").map(str::to_string),
                                line: attribute(&attributes, "line").map(str::to_string),
                            });
                            if !self_closing {
                                self.skip_element()?;
                            }
                        }
                        "source" => source = Some(text(self, "source")?),
                        "comment" => {
                            let value = text(self, "comment")?;
                            entry.disambiguation = (!value.is_empty()).then_some(value);
                        }
                        "extracomment" => entry.extra_comment = Some(text(self, "extracomment")?),
                        "translatorcomment" => {
                            entry.translator_comment = Some(text(self, "translatorcomment")?)
                        }
                        "translation" => {
                            let kind = attribute(&attributes, "type").unwrap_or("");
                            entry.state = TranslationState::parse(kind).ok_or_else(|| {
                                ParseError::syntax(
                                    position,
                                    format!("unknown translation type {:?}", kind),
                                )
                            })?;
                            if !self_closing {
                                self.parse_translation(&mut entry)?;
                            }
                        }
                        _ => {
                            if !self_closing {
                                self.skip_element()?;
                            }
                        }
                    }
                }
                Event::End { .. } => break,
                Event::Eof => return Err(eof(&self.reader)),
            }
        }

        entry.source = source.ok_or_else(|| missing(start, "message", "source"))?;
        Ok(entry)
    }

    /// Fills `translation` and, for numerus messages, `plural_forms`.
    fn parse_translation(&mut self, entry: &mut CatalogEntry) -> Result<(), ParseError> {
        let mut text = String::new();
        let mut forms = Vec::new();
        let mut variants = Vec::new();
        loop {
            match self.reader.next_event()? {
                Event::Text(chunk) => text.push_str(&chunk),
                Event::Start {
                    name,
                    attributes,
                    position,
                    self_closing,
                } => match name.as_str() {
                    "numerusform" => forms.push(if self_closing {
                        String::new()
                    } else {
                        self.read_text("numerusform")?
                    }),
                    "lengthvariant" => variants.push(if self_closing {
                        String::new()
                    } else {
                        self.read_text("lengthvariant")?
                    }),
                    "byte" => {
                        text.push(byte_value(&attributes, position)?);
                        if !self_closing {
                            self.skip_element()?;
                        }
                    }
                    _ => {
                        return Err(ParseError::UnexpectedElement {
                            position,
                            expected: "text inside <translation>".into(),
                            found: name,
                        })
                    }
                },
                Event::End { .. } => break,
                Event::Eof => return Err(eof(&self.reader)),
            }
        }

        if !forms.is_empty() {
            entry.translation = forms[0].clone();
            entry.plural_forms = forms;
        } else if !variants.is_empty() {
            entry.translation = join_variants(&variants);
        } else {
            entry.translation = text;
        }
        Ok(())
    }

    /// Character content of a leaf element, with `<byte>` and
    /// `<lengthvariant>` children folded in. Consumes the closing tag.
    fn read_text(&mut self, element: &str) -> Result<String, ParseError> {
        let mut text = String::new();
        let mut variants = Vec::new();
        loop {
            match self.reader.next_event()? {
                Event::Text(chunk) => text.push_str(&chunk),
                Event::Start {
                    name,
                    attributes,
                    position,
                    self_closing,
                } => match name.as_str() {
                    "byte" => {
                        text.push(byte_value(&attributes, position)?);
                        if !self_closing {
                            self.skip_element()?;
                        }
                    }
                    "lengthvariant" if !self_closing => {
                        variants.push(self.read_text("lengthvariant")?)
                    }
                    "lengthvariant" => variants.push(String::new()),
                    _ => {
                        return Err(ParseError::UnexpectedElement {
                            position,
                            expected: format!("text inside <{}>", element),
                            found: name,
                        })
                    }
                },
                Event::End { .. } => break,
                Event::Eof => return Err(eof(&self.reader)),
            }
        }
        if variants.is_empty() {
            Ok(text)
        } else {
            Ok(join_variants(&variants))
        }
    }

    /// Skips the rest of an element whose start tag was just read.
    fn skip_element(&mut self) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.reader.next_event()? {
                Event::Start { self_closing, .. } => {
                    if !self_closing {
                        depth += 1;
                    }
                }
                Event::End { .. } => depth -= 1,
                Event::Text(_) => {}
                Event::Eof => return Err(eof(&self.reader)),
            }
        }
        Ok(())
    }
}

fn join_variants(variants: &[String]) -> String {
    let mut joined = String::new();
    for (i, variant) in variants.iter().enumerate() {
        if i > 0 {
            joined.push(LENGTH_VARIANT_SEPARATOR);
        }
        joined.push_str(variant);
    }
    joined
}

/// `<byte value="x1b"/>` or `<byte value="27"/>`.
fn byte_value(attributes: &[(String, String)], position: Position) -> Result<char, ParseError> {
    let raw = attribute(attributes, "value")
        .ok_or_else(|| ParseError::syntax(position, "<byte> without a value attribute"))?;
    let parsed = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse::<u32>().ok(),
    };
    parsed
        .and_then(char::from_u32)
        .ok_or_else(|| ParseError::syntax(position, format!("invalid <byte> value {:?}", raw)))
}

fn missing(position: Position, parent: &str, element: &str) -> ParseError {
    ParseError::MissingElement {
        position,
        parent: parent.to_string(),
        element: element.to_string(),
    }
}

fn eof(reader: &Reader<'_>) -> ParseError {
    ParseError::syntax(reader.position(), "unexpected end of document")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pl_PL">
<context>
    <name>QMessageBox</name>
    <message>
        <location filename="../../src/widgets/dialogs/qmessagebox.cpp" line="+1921"/>
        <location line="-3"/>
        <source>OK</source>
        <translation>OK</translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn header_and_record() {
        let doc = parse_document(MINIMAL).unwrap();
        assert_eq!(doc.header.version.as_deref(), Some("2.1"));
        assert_eq!(doc.header.language.as_deref(), Some("pl_PL"));
        assert_eq!(doc.records.len(), 1);
        let entry = &doc.records[0];
        assert_eq!(entry.context, "QMessageBox");
        assert_eq!(entry.source, "OK");
        assert_eq!(entry.translation, "OK");
        assert_eq!(entry.locations.len(), 2);
        assert_eq!(entry.locations[1].filename, None);
        assert_eq!(entry.locations[1].line.as_deref(), Some("-3"));
    }

    #[test]
    fn byte_elements_decode() {
        let doc = parse_document(
            r#"<TS><context><name>C</name><message>
                 <source>a<byte value="x9"/>b</source>
                 <translation>c<byte value="10"/>d</translation>
               </message></context></TS>"#,
        )
        .unwrap();
        assert_eq!(doc.records[0].source, "a\tb");
        assert_eq!(doc.records[0].translation, "c\nd");
    }

    #[test]
    fn numerus_forms_collected() {
        let doc = parse_document(
            r#"<TS><context><name>QDir</name>
               <message numerus="yes">
                 <source>%n file(s)</source>
                 <translation type="unfinished">
                   <numerusform>%n plik</numerusform>
                   <numerusform>%n pliki</numerusform>
                   <numerusform></numerusform>
                 </translation>
               </message></context></TS>"#,
        )
        .unwrap();
        let entry = &doc.records[0];
        assert!(entry.numerus);
        assert_eq!(entry.state, TranslationState::Unfinished);
        assert_eq!(entry.plural_forms, vec!["%n plik", "%n pliki", ""]);
        assert_eq!(entry.translation, "%n plik");
    }

    #[test]
    fn unknown_children_skipped() {
        let doc = parse_document(
            r#"<TS><defaultcodec>UTF-8</defaultcodec><context><name>C</name>
               <message><oldsource>old <i>x</i></oldsource><source>S</source>
               <extra-po-flags>c-format</extra-po-flags><translation/></message>
               </context></TS>"#,
        )
        .unwrap();
        assert_eq!(doc.records[0].source, "S");
        assert_eq!(doc.records[0].translation, "");
    }

    #[test]
    fn missing_source_is_reported_at_message() {
        let err = parse_document("<TS>\n<context><name>C</name>\n  <message><translation>x</translation></message></context></TS>")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingElement {
                position: Position::new(3, 3),
                parent: "message".into(),
                element: "source".into(),
            }
        );
    }

    #[test]
    fn missing_context_name() {
        let err = parse_document("<TS><context><message><source>x</source></message></context></TS>")
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { ref element, .. } if element == "name"));
    }

    #[test]
    fn wrong_root_rejected() {
        let err = parse_document("<resources/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedElement { ref found, .. } if found == "resources"));
    }

    #[test]
    fn bad_translation_type() {
        let err = parse_document(
            "<TS><context><name>C</name><message><source>x</source><translation type=\"weird\">y</translation></message></context></TS>",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown translation type"));
    }

    #[test]
    fn length_variants_join() {
        let doc = parse_document(
            "<TS><context><name>C</name><message><source>Long</source><translation variants=\"yes\"><lengthvariant>Długi</lengthvariant><lengthvariant>Dł.</lengthvariant></translation></message></context></TS>",
        )
        .unwrap();
        assert_eq!(doc.records[0].translation, "Długi\u{9c}Dł.");
    }
}
