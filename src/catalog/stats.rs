// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation progress counters

use crate::catalog::TranslationCatalog;
use crate::types::TranslationState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextStats {
    pub name: String,
    pub messages: usize,
    pub untranslated: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub total: usize,
    pub active: usize,
    pub translated: usize,
    pub untranslated: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub vanished: usize,
    pub numerus: usize,
    pub duplicates_overridden: usize,
    /// Share of active entries with a translation, 0.0 to 100.0.
    pub coverage_percent: f32,
    pub contexts: Vec<ContextStats>,
}

impl CatalogStats {
    pub fn collect(catalog: &TranslationCatalog) -> Self {
        let mut stats = CatalogStats {
            language: catalog.header().language.clone(),
            total: catalog.len(),
            duplicates_overridden: catalog.duplicates(),
            ..Default::default()
        };

        for entry in catalog.entries() {
            if entry.numerus {
                stats.numerus += 1;
            }
            match entry.state {
                TranslationState::Obsolete => {
                    stats.obsolete += 1;
                    continue;
                }
                TranslationState::Vanished => {
                    stats.vanished += 1;
                    continue;
                }
                TranslationState::Finished | TranslationState::Unfinished => {}
            }
            stats.active += 1;
            if entry.state == TranslationState::Unfinished {
                stats.unfinished += 1;
            }
            let untranslated = entry.is_untranslated();
            if untranslated {
                stats.untranslated += 1;
            } else {
                stats.translated += 1;
            }

            // Entries of one context are usually adjacent; fall back to a scan.
            let slot = match stats.contexts.last() {
                Some(last) if last.name == entry.context => stats.contexts.len() - 1,
                _ => match stats.contexts.iter().position(|c| c.name == entry.context) {
                    Some(found) => found,
                    None => {
                        stats.contexts.push(ContextStats {
                            name: entry.context.clone(),
                            ..Default::default()
                        });
                        stats.contexts.len() - 1
                    }
                },
            };
            let context = &mut stats.contexts[slot];
            context.messages += 1;
            if untranslated {
                context.untranslated += 1;
            }
        }

        stats.coverage_percent = if stats.active == 0 {
            100.0
        } else {
            (stats.translated as f32 / stats.active as f32) * 100.0
        };
        stats
    }
}
