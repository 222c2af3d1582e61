// SPDX-License-Identifier: PMPL-1.0-or-later

//! Coverage summary across a tree of `.ts` files

use crate::catalog::{LoadOptions, TranslationCatalog};
use crate::lang::describe;
use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub messages: usize,
    pub untranslated: usize,
    pub coverage_percent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileSummary>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Every `*.ts` file below `root`, sorted by path.
pub fn collect_catalog_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Target does not exist: {}", root.display());
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("ts"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load every catalog under `root` in parallel. Files that fail to parse are
/// reported individually rather than aborting the scan.
pub fn scan(root: &Path, options: &LoadOptions) -> Result<ScanReport> {
    let files = collect_catalog_files(root)?;
    debug!(root = %root.display(), files = files.len(), "scanning catalogs");

    let results: Vec<std::result::Result<FileSummary, ScanFailure>> = files
        .par_iter()
        .map(|path| match TranslationCatalog::load_path_with(path, options) {
            Ok(catalog) => {
                let stats = catalog.stats();
                Ok(FileSummary {
                    path: path.clone(),
                    language: catalog.header().language.clone(),
                    messages: stats.active,
                    untranslated: stats.untranslated,
                    coverage_percent: stats.coverage_percent,
                })
            }
            Err(err) => Err(ScanFailure {
                path: path.clone(),
                error: err.to_string(),
            }),
        })
        .collect();

    let mut report = ScanReport::default();
    for result in results {
        match result {
            Ok(summary) => report.files.push(summary),
            Err(failure) => report.failures.push(failure),
        }
    }
    Ok(report)
}

pub fn print_scan(report: &ScanReport) {
    use colored::*;

    for file in &report.files {
        let language = file
            .language
            .as_deref()
            .map(describe)
            .unwrap_or_else(|| "unknown language".to_string());
        let coverage = format!("{:>5.1}%", file.coverage_percent);
        let coverage = if file.untranslated == 0 {
            coverage.green()
        } else {
            coverage.yellow()
        };
        println!(
            "{} {} ({} messages, {} untranslated) {}",
            coverage,
            file.path.display(),
            file.messages,
            file.untranslated,
            language.dimmed()
        );
    }
    for failure in &report.failures {
        println!("{} {}: {}", "ERROR".red().bold(), failure.path.display(), failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_root_is_an_error() {
        assert!(collect_catalog_files(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn only_ts_files_collected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.ts"), "<TS/>").unwrap();
        fs::write(dir.path().join("nested/a.TS"), "<TS/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let files = collect_catalog_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().is_some()));
    }
}
