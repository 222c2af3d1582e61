// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog: loading and lookup.
//!
//! # Invariants
//!
//! 1. **Unique keys**: `(context, source, disambiguation)` identifies at most
//!    one entry. When a document repeats a key the last record wins and keeps
//!    its own file position; the override is counted in
//!    [`TranslationCatalog::duplicates`].
//!
//! 2. **Total lookup**: [`TranslationCatalog::lookup`] always yields a string.
//!    A missing entry, an empty translation and an obsolete entry all resolve
//!    to the source text.
//!
//! 3. **Immutability**: nothing is mutated after construction, so a catalog
//!    behind an `Arc` can serve any number of readers without locking.

pub mod decode;
pub mod error;
pub mod parser;
pub mod stats;
pub mod writer;
pub mod xml;

pub use error::{ParseError, Position};
pub use stats::{CatalogStats, ContextStats};
pub use writer::{to_ts_string, write_ts};

use crate::lang::primary_language;
use crate::plural::PluralRule;
use crate::types::{
    normalize_disambiguation, CatalogEntry, CatalogHeader, EntryKey, TranslationState,
};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Knobs applied while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Serve translations marked `type="unfinished"`. When off they behave
    /// as if empty.
    pub include_unfinished: bool,
    /// Language used to pick the plural rule, overriding the header.
    pub language: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
            language: None,
        }
    }
}

/// source text -> every (disambiguation, entry index) sharing it
type SourceIndex = HashMap<String, Vec<(Option<String>, usize)>>;

/// Immutable lookup table built from a `.ts` document.
///
/// # Example
///
/// ```
/// use linguist_catalog::TranslationCatalog;
///
/// let catalog: TranslationCatalog = r#"<TS language="pl_PL">
///   <context><name>QMessageBox</name>
///     <message><source>Help</source><translation>Pomoc</translation></message>
///   </context>
/// </TS>"#
///     .parse()
///     .unwrap();
///
/// assert_eq!(catalog.lookup("QMessageBox", "Help", None), "Pomoc");
/// assert_eq!(catalog.lookup("QMessageBox", "Abort", None), "Abort");
/// ```
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    header: CatalogHeader,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, SourceIndex>,
    plural_rule: PluralRule,
    duplicates: usize,
    include_unfinished: bool,
}

impl TranslationCatalog {
    /// A catalog with no entries; every lookup returns its source text.
    pub fn empty() -> Self {
        Self {
            header: CatalogHeader::default(),
            entries: Vec::new(),
            index: HashMap::new(),
            plural_rule: PluralRule::default(),
            duplicates: 0,
            include_unfinished: true,
        }
    }

    pub fn load<R: Read>(source: R) -> Result<Self, ParseError> {
        Self::load_with(source, &LoadOptions::default())
    }

    pub fn load_with<R: Read>(mut source: R, options: &LoadOptions) -> Result<Self, ParseError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Self::from_bytes_with(&bytes, options)
    }

    pub fn load_path(path: &Path) -> Result<Self, ParseError> {
        Self::load_path_with(path, &LoadOptions::default())
    }

    pub fn load_path_with(path: &Path, options: &LoadOptions) -> Result<Self, ParseError> {
        let bytes = std::fs::read(path)
            .map_err(|err| ParseError::Io(format!("{}: {}", path.display(), err)))?;
        Self::from_bytes_with(&bytes, options)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        Self::from_bytes_with(bytes, &LoadOptions::default())
    }

    pub fn from_bytes_with(bytes: &[u8], options: &LoadOptions) -> Result<Self, ParseError> {
        let text = decode::decode_document(bytes)?;
        Self::from_str_with(&text, options)
    }

    pub fn from_str_with(text: &str, options: &LoadOptions) -> Result<Self, ParseError> {
        let document = parser::parse_document(text)?;
        Ok(Self::from_entries(document.header, document.records, options))
    }

    /// Build from records already in memory, applying last-wins on duplicates.
    pub fn from_entries(
        header: CatalogHeader,
        records: Vec<CatalogEntry>,
        options: &LoadOptions,
    ) -> Self {
        let keys: Vec<EntryKey> = records.iter().map(CatalogEntry::key).collect();
        let mut last_seen: HashMap<&EntryKey, usize> = HashMap::with_capacity(keys.len());
        let mut duplicates = 0usize;
        for (position, key) in keys.iter().enumerate() {
            if last_seen.insert(key, position).is_some() {
                duplicates += 1;
                warn!(key = %key, "duplicate catalog entry, later record wins");
            }
        }

        let mut entries = Vec::with_capacity(last_seen.len());
        let mut index: HashMap<String, SourceIndex> = HashMap::new();
        for (position, record) in records.into_iter().enumerate() {
            if last_seen.get(&keys[position]) != Some(&position) {
                continue;
            }
            index
                .entry(record.context.clone())
                .or_default()
                .entry(record.source.clone())
                .or_default()
                .push((record.disambiguation().map(str::to_string), entries.len()));
            entries.push(record);
        }

        let plural_rule = options
            .language
            .as_deref()
            .or(header.language.as_deref())
            .map(PluralRule::for_language)
            .unwrap_or_default();

        let catalog = Self {
            header,
            entries,
            index,
            plural_rule,
            duplicates,
            include_unfinished: options.include_unfinished,
        };
        debug!(
            entries = catalog.entries.len(),
            contexts = catalog.index.len(),
            duplicates,
            language = catalog.header.language.as_deref().unwrap_or("-"),
            "catalog built"
        );
        catalog
    }

    /// Translation for `source`, or `source` itself when there is none.
    ///
    /// Matching is exact on all three key parts; a disambiguated request is
    /// never answered by an entry without one.
    pub fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        match self.resolve(context, source, disambiguation) {
            Some(entry) if !entry.translation.is_empty() => entry.translation.as_str(),
            _ => source,
        }
    }

    /// Plural-aware lookup: picks the numerus form for `n`.
    ///
    /// When the catalog holds fewer forms than the rule asks for, the last
    /// one present is used.
    pub fn lookup_plural<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
        n: u64,
    ) -> &'a str {
        let Some(entry) = self.resolve(context, source, disambiguation) else {
            return source;
        };
        if !entry.numerus || entry.plural_forms.is_empty() {
            return if entry.translation.is_empty() {
                source
            } else {
                entry.translation.as_str()
            };
        }
        let wanted = self.plural_rule.form_index(n);
        let form = entry
            .plural_forms
            .get(wanted)
            .or_else(|| entry.plural_forms.last());
        match form {
            Some(text) if !text.is_empty() => text.as_str(),
            _ => source,
        }
    }

    /// [`lookup_plural`](Self::lookup_plural) with every `%n` replaced by `n`.
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: u64,
    ) -> String {
        self.lookup_plural(context, source, disambiguation, n)
            .replace("%n", &n.to_string())
    }

    /// Entries still waiting for a translator, in file order.
    ///
    /// Each call starts over from the first entry.
    pub fn untranslated_entries(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.is_active() && entry.is_untranslated())
    }

    /// The stored entry for a key, whatever its state.
    pub fn get(&self, key: &EntryKey) -> Option<&CatalogEntry> {
        self.find(&key.context, &key.source, key.disambiguation.as_deref())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header(&self) -> &CatalogHeader {
        &self.header
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Number of records dropped because a later record had the same key.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Primary language subtag of the catalog, if it declares one.
    pub fn language(&self) -> Option<String> {
        self.header.language.as_deref().and_then(primary_language)
    }

    /// Distinct context names in order of first appearance.
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.context.as_str())
            .filter(|context| seen.insert(*context))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self)
    }

    fn find(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&CatalogEntry> {
        let wanted = normalize_disambiguation(disambiguation);
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .find(|(candidate, _)| candidate.as_deref() == wanted)
            .map(|(_, position)| &self.entries[*position])
    }

    /// Entry that lookups may answer from.
    fn resolve(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&CatalogEntry> {
        self.find(context, source, disambiguation).filter(|entry| {
            entry.is_active()
                && (self.include_unfinished || entry.state != TranslationState::Unfinished)
        })
    }
}

impl Default for TranslationCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for TranslationCatalog {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_str_with(text, &LoadOptions::default())
    }
}
