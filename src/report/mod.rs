// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog progress reports

pub mod formatter;
pub mod generator;
pub mod output;

use crate::catalog::{CatalogStats, TranslationCatalog};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use formatter::ReportFormatter;
pub use generator::ReportGenerator;
pub use output::ReportOutputFormat;

/// One message still waiting for a translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntranslatedItem {
    pub context: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    /// First recorded location, as written in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogReport {
    pub catalog_path: PathBuf,
    pub generated_at: String,
    pub stats: CatalogStats,
    pub untranslated: Vec<UntranslatedItem>,
    pub findings: Vec<String>,
}

/// Build a report for a loaded catalog
pub fn generate_report(path: &Path, catalog: &TranslationCatalog) -> CatalogReport {
    ReportGenerator::new().generate(path, catalog)
}

/// Save report to file in the given format
pub fn save_report<P: AsRef<Path>>(
    report: &CatalogReport,
    format: ReportOutputFormat,
    path: P,
) -> Result<()> {
    ReportFormatter::new().save(report, format, path)
}

/// Print report to console
pub fn print_report(report: &CatalogReport) {
    ReportFormatter::new().print(report);
}
