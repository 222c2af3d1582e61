// SPDX-License-Identifier: PMPL-1.0-or-later

//! Minimal XML pull reader for `.ts` documents
//!
//! Covers the subset Qt Linguist writes: one root element, attributes,
//! character data with the five predefined entities and numeric character
//! references, comments, CDATA sections, processing instructions and a
//! `DOCTYPE`. Well-formedness (tag nesting, a single root, nothing but
//! whitespace outside it, separated attributes) is enforced here so the
//! record builder only has to care about the catalog shape.
//!
//! Line endings are normalized on input: `\r\n` and a lone `\r` both read as
//! `\n`. A carriage return only survives when written as a character
//! reference (`&#xd;`).

use crate::catalog::error::{ParseError, Position};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        position: Position,
        self_closing: bool,
    },
    End {
        name: String,
        position: Position,
    },
    Text(String),
    Eof,
}

pub struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    open: Vec<String>,
    seen_root: bool,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            open: Vec::new(),
            seen_root: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&mut self) -> Option<char> {
        match self.chars.peek().copied() {
            Some('\r') => Some('\n'),
            other => other,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let mut ch = self.chars.next()?;
        if ch == '\r' {
            if self.chars.peek() == Some(&'\n') {
                self.chars.next();
            }
            ch = '\n';
        }
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Returns whether anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), Some(' ' | '\t' | '\n')) {
            self.bump();
            skipped = true;
        }
        skipped
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        let position = self.position();
        match self.bump() {
            Some(ch) if ch == wanted => Ok(()),
            Some(ch) => Err(ParseError::syntax(
                position,
                format!("expected '{}', found '{}'", wanted, ch),
            )),
            None => Err(ParseError::syntax(
                position,
                format!("expected '{}', found end of document", wanted),
            )),
        }
    }

    fn eat_literal(&mut self, literal: &str) -> Result<(), ParseError> {
        for wanted in literal.chars() {
            self.expect(wanted)?;
        }
        Ok(())
    }

    /// Consume up to and including `terminator`, returning what came before it.
    fn read_until(
        &mut self,
        terminator: &str,
        start: Position,
        what: &str,
    ) -> Result<String, ParseError> {
        let mut buffer = String::new();
        while let Some(ch) = self.bump() {
            buffer.push(ch);
            if buffer.ends_with(terminator) {
                buffer.truncate(buffer.len() - terminator.len());
                return Ok(buffer);
            }
        }
        Err(ParseError::syntax(start, format!("unterminated {}", what)))
    }

    fn read_name(&mut self) -> Result<String, ParseError> {
        let position = self.position();
        if !matches!(self.peek(), Some(ch) if ch.is_alphabetic() || ch == '_' || ch == ':') {
            return Err(ParseError::syntax(position, "expected a name"));
        }
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':' | '.') {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    fn read_entity(&mut self) -> Result<char, ParseError> {
        let position = self.position();
        self.bump(); // consume '&'
        let mut name = String::new();
        loop {
            match self.bump() {
                Some(';') => break,
                Some(ch) if name.len() < 32 && !ch.is_whitespace() && ch != '<' && ch != '&' => {
                    name.push(ch)
                }
                _ => return Err(ParseError::syntax(position, "unterminated entity reference")),
            }
        }
        let resolved = match name.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    return Err(ParseError::syntax(
                        position,
                        format!("unknown entity &{};", name),
                    ));
                }
            }
        };
        resolved.ok_or_else(|| {
            ParseError::syntax(position, format!("invalid character reference &{};", name))
        })
    }

    /// Next event in document order.
    pub fn next_event(&mut self) -> Result<Event, ParseError> {
        loop {
            let position = self.position();
            match self.peek() {
                None => {
                    if let Some(open) = self.open.last() {
                        return Err(ParseError::syntax(
                            position,
                            format!("unexpected end of document inside <{}>", open),
                        ));
                    }
                    if !self.seen_root {
                        return Err(ParseError::syntax(position, "document has no root element"));
                    }
                    return Ok(Event::Eof);
                }
                Some('<') => {
                    self.bump();
                    match self.peek() {
                        Some('?') => {
                            self.read_until("?>", position, "processing instruction")?;
                        }
                        Some('!') => {
                            self.bump();
                            if let Some(text) = self.read_declaration(position)? {
                                return Ok(Event::Text(text));
                            }
                        }
                        Some('/') => {
                            self.bump();
                            return self.read_end_tag(position);
                        }
                        _ => return self.read_start_tag(position),
                    }
                }
                Some(_) => {
                    let text = self.read_text()?;
                    if self.open.is_empty() {
                        if !text.trim().is_empty() {
                            return Err(ParseError::syntax(
                                position,
                                "character data outside the root element",
                            ));
                        }
                        continue;
                    }
                    return Ok(Event::Text(text));
                }
            }
        }
    }

    /// Handles `<!--`, `<![CDATA[` and `<!DOCTYPE`; only CDATA yields text.
    fn read_declaration(&mut self, start: Position) -> Result<Option<String>, ParseError> {
        match self.peek() {
            Some('-') => {
                self.eat_literal("--")?;
                self.read_until("-->", start, "comment")?;
                Ok(None)
            }
            Some('[') => {
                self.eat_literal("[CDATA[")?;
                if self.open.is_empty() {
                    return Err(ParseError::syntax(start, "CDATA section outside the root element"));
                }
                self.read_until("]]>", start, "CDATA section").map(Some)
            }
            Some('D') => {
                self.eat_literal("DOCTYPE")?;
                if self.seen_root {
                    return Err(ParseError::syntax(start, "DOCTYPE after the root element"));
                }
                let mut depth = 0usize;
                loop {
                    match self.bump() {
                        Some('[') => depth += 1,
                        Some(']') => depth = depth.saturating_sub(1),
                        Some('>') if depth == 0 => return Ok(None),
                        Some(_) => {}
                        None => return Err(ParseError::syntax(start, "unterminated DOCTYPE")),
                    }
                }
            }
            _ => Err(ParseError::syntax(start, "unsupported markup declaration")),
        }
    }

    fn read_text(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '<' => break,
                '&' => text.push(self.read_entity()?),
                _ => {
                    text.push(ch);
                    self.bump();
                }
            }
        }
        Ok(text)
    }

    fn read_end_tag(&mut self, position: Position) -> Result<Event, ParseError> {
        let name = self.read_name()?;
        self.skip_whitespace();
        self.expect('>')?;
        match self.open.pop() {
            Some(open) if open == name => Ok(Event::End { name, position }),
            Some(open) => Err(ParseError::syntax(
                position,
                format!("mismatched closing tag </{}>, expected </{}>", name, open),
            )),
            None => Err(ParseError::syntax(
                position,
                format!("closing tag </{}> without an open element", name),
            )),
        }
    }

    fn read_start_tag(&mut self, position: Position) -> Result<Event, ParseError> {
        let name = self.read_name()?;
        if self.open.is_empty() && self.seen_root {
            return Err(ParseError::syntax(
                position,
                format!("second root element <{}>", name),
            ));
        }
        let mut attributes: Vec<(String, String)> = Vec::new();
        let self_closing = loop {
            let separated = self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect('>')?;
                    break true;
                }
                Some('>') => {
                    self.bump();
                    break false;
                }
                Some(_) if !separated => {
                    return Err(ParseError::syntax(
                        self.position(),
                        format!("expected whitespace before attribute in <{}>", name),
                    ))
                }
                Some(_) => {
                    let attr_position = self.position();
                    let attr = self.read_name()?;
                    self.skip_whitespace();
                    self.expect('=')?;
                    self.skip_whitespace();
                    let value = self.read_attribute_value()?;
                    if attributes.iter().any(|(existing, _)| *existing == attr) {
                        return Err(ParseError::syntax(
                            attr_position,
                            format!("duplicate attribute '{}' on <{}>", attr, name),
                        ));
                    }
                    attributes.push((attr, value));
                }
                None => {
                    return Err(ParseError::syntax(
                        position,
                        format!("unterminated start tag <{}>", name),
                    ))
                }
            }
        };
        self.seen_root = true;
        if !self_closing {
            self.open.push(name.clone());
        }
        Ok(Event::Start {
            name,
            attributes,
            position,
            self_closing,
        })
    }

    fn read_attribute_value(&mut self) -> Result<String, ParseError> {
        let start = self.position();
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(ParseError::syntax(start, "attribute value must be quoted")),
        };
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    self.bump();
                    return Ok(value);
                }
                Some('&') => value.push(self.read_entity()?),
                Some('<') => {
                    return Err(ParseError::syntax(
                        self.position(),
                        "'<' is not allowed in an attribute value",
                    ))
                }
                Some(ch) => {
                    value.push(if matches!(ch, '\t' | '\n') { ' ' } else { ch });
                    self.bump();
                }
                None => return Err(ParseError::syntax(start, "unterminated attribute value")),
            }
        }
    }
}

pub fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
