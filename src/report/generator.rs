// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation logic

use crate::catalog::TranslationCatalog;
use crate::lang::{is_valid_iso639_1, primary_language};
use crate::report::{CatalogReport, UntranslatedItem};
use crate::types::CatalogEntry;
use std::path::Path;

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, path: &Path, catalog: &TranslationCatalog) -> CatalogReport {
        let stats = catalog.stats();
        let untranslated = catalog
            .untranslated_entries()
            .map(untranslated_item)
            .collect();
        let findings = self.findings(catalog);

        CatalogReport {
            catalog_path: path.to_path_buf(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            stats,
            untranslated,
            findings,
        }
    }

    fn findings(&self, catalog: &TranslationCatalog) -> Vec<String> {
        let mut findings = Vec::new();
        let header = catalog.header();

        match header.language.as_deref() {
            None => findings.push("catalog declares no language".to_string()),
            Some(tag) => match primary_language(tag) {
                Some(code) if is_valid_iso639_1(&code) => {}
                _ => findings.push(format!("language tag {:?} is not ISO 639-1", tag)),
            },
        }

        if catalog.duplicates() > 0 {
            findings.push(format!(
                "{} duplicate record(s) overridden by later entries",
                catalog.duplicates()
            ));
        }

        let expected = catalog.plural_rule().form_count();
        let short_numerus = catalog
            .entries()
            .iter()
            .filter(|e| e.is_active() && e.numerus && !e.plural_forms.is_empty())
            .filter(|e| e.plural_forms.len() < expected)
            .count();
        if short_numerus > 0 {
            findings.push(format!(
                "{} numerus message(s) carry fewer than {} forms",
                short_numerus, expected
            ));
        }

        findings
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn untranslated_item(entry: &CatalogEntry) -> UntranslatedItem {
    let location = entry.locations.first().map(|loc| {
        match (loc.filename.as_deref(), loc.line.as_deref()) {
            (Some(file), Some(line)) => format!("{}:{}", file, line),
            (Some(file), None) => file.to_string(),
            (None, Some(line)) => format!("line {}", line),
            (None, None) => String::new(),
        }
    });
    UntranslatedItem {
        context: entry.context.clone(),
        source: entry.source.clone(),
        disambiguation: entry.disambiguation.clone(),
        location: location.filter(|l| !l.is_empty()),
    }
}
