// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core types for linguist-catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a `<translation>` element, taken from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationState {
    #[default]
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" | "finished" => Some(Self::Finished),
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Value written back to the `type` attribute, `None` for finished entries.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Obsolete and vanished messages are kept for tooling but never resolve.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }
}

/// Provenance of a message in the originating source tree.
///
/// Both fields are stored exactly as written. `line` is frequently a
/// relative delta (`+14`, `-3`) against the previous location, and
/// `filename` is sticky across messages, so neither is meaningful on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

/// Lookup key of one translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub context: String,
    pub source: String,
    pub disambiguation: Option<String>,
}

impl EntryKey {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        disambiguation: Option<&str>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            disambiguation: normalize_disambiguation(disambiguation).map(str::to_string),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.disambiguation {
            Some(d) => write!(f, "{}::{:?} ({})", self.context, self.source, d),
            None => write!(f, "{}::{:?}", self.context, self.source),
        }
    }
}

/// `None` and `Some("")` name the same entry.
pub(crate) fn normalize_disambiguation(value: Option<&str>) -> Option<&str> {
    value.filter(|d| !d.is_empty())
}

/// One `<message>` record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub context: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    /// Empty means "not yet translated". Mirrors the first plural form for
    /// numerus messages.
    #[serde(default)]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plural_forms: Vec<String>,
    #[serde(default)]
    pub numerus: bool,
    #[serde(default)]
    pub state: TranslationState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CatalogEntry {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }

    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        let value = disambiguation.into();
        self.disambiguation = if value.is_empty() { None } else { Some(value) };
        self
    }

    pub fn with_state(mut self, state: TranslationState) -> Self {
        self.state = state;
        self
    }

    pub fn with_plural_forms(mut self, forms: Vec<String>) -> Self {
        self.numerus = true;
        self.translation = forms.first().cloned().unwrap_or_default();
        self.plural_forms = forms;
        self
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(
            self.context.clone(),
            self.source.clone(),
            self.disambiguation.as_deref(),
        )
    }

    pub fn disambiguation(&self) -> Option<&str> {
        normalize_disambiguation(self.disambiguation.as_deref())
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// True when there is nothing to show a user: an empty translation, or
    /// any empty numerus form.
    pub fn is_untranslated(&self) -> bool {
        if self.numerus && !self.plural_forms.is_empty() {
            self.plural_forms.iter().any(String::is_empty)
        } else {
            self.translation.is_empty()
        }
    }
}

/// Attributes of the `<TS>` root element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}
