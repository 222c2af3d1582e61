// SPDX-License-Identifier: PMPL-1.0-or-later

//! linguist-catalog: Qt Linguist translation catalogs as lookup tables.
//!
//! A `.ts` file is parsed once into an immutable [`TranslationCatalog`];
//! lookups resolve `(context, source, disambiguation)` to the translated
//! string and fall back to the source text whenever no usable translation
//! exists, so they never fail.
//!
//! BUILDING BLOCKS:
//! 1. **Catalog**: decoding, parsing, lookup, statistics and re-serialization.
//! 2. **Shared**: an `Arc`-swapping handle for catalogs that are reloaded
//!    while readers keep working.
//! 3. **Report / Scan**: progress reports for translators and CI.

pub mod catalog;
pub mod config;
pub mod lang;
pub mod plural;
pub mod report;
pub mod scan;
pub mod shared;
pub mod types;

pub use catalog::{LoadOptions, ParseError, Position, TranslationCatalog};
pub use plural::PluralRule;
pub use shared::{CatalogSource, ReloadError, SharedCatalog};
pub use types::{CatalogEntry, CatalogHeader, EntryKey, Location, TranslationState};
