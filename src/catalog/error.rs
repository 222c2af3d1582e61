// SPDX-License-Identifier: PMPL-1.0-or-later

//! Errors raised while loading a catalog

use std::fmt;
use thiserror::Error;

/// 1-based line/column of the character where a problem was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{position}: {message}")]
    Syntax { position: Position, message: String },

    #[error("{position}: <{parent}> is missing required <{element}>")]
    MissingElement {
        position: Position,
        parent: String,
        element: String,
    },

    #[error("{position}: expected {expected}, found <{found}>")]
    UnexpectedElement {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("invalid {encoding} data at byte offset {offset}")]
    Encoding { encoding: String, offset: usize },

    #[error("unsupported document encoding {label:?}")]
    UnsupportedEncoding { label: String },

    #[error("reading catalog: {0}")]
    Io(String),
}

impl ParseError {
    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Location of the error, if it has a textual one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. }
            | Self::MissingElement { position, .. }
            | Self::UnexpectedElement { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Byte offset for encoding failures.
    pub fn byte_offset(&self) -> Option<usize> {
        match self {
            Self::Encoding { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
