// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::lang::describe_with;
use crate::report::{CatalogReport, ReportOutputFormat};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

/// How many untranslated messages the console view lists before summarising.
const CONSOLE_UNTRANSLATED_LIMIT: usize = 25;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &CatalogReport) {
        println!("\n{}", "=== TRANSLATION CATALOG REPORT ===".bold().cyan());
        println!();

        self.print_summary(report);
        println!();

        self.print_contexts(report);
        println!();

        self.print_untranslated(report);
        println!();

        self.print_findings(&report.findings);
    }

    fn print_summary(&self, report: &CatalogReport) {
        let stats = &report.stats;
        println!("{}", "SUMMARY".bold().yellow());
        println!("  Catalog: {}", report.catalog_path.display());
        if let Some(language) = &stats.language {
            println!("  Language: {}", describe_with(language, true));
        }
        println!("  Messages: {}", stats.total);
        println!("    Translated: {}", stats.translated.to_string().green());
        println!("    Untranslated: {}", stats.untranslated.to_string().red());
        println!("    Unfinished: {}", stats.unfinished);
        println!("    Obsolete: {}", stats.obsolete.to_string().dimmed());
        println!("    Vanished: {}", stats.vanished.to_string().dimmed());
        println!("    Numerus: {}", stats.numerus);

        let coverage_color = if stats.coverage_percent >= 95.0 {
            "green"
        } else if stats.coverage_percent >= 60.0 {
            "yellow"
        } else {
            "red"
        };
        println!(
            "  Coverage: {}",
            format!("{:.1}%", stats.coverage_percent)
                .color(coverage_color)
                .bold()
        );
    }

    fn print_contexts(&self, report: &CatalogReport) {
        let mut incomplete: Vec<_> = report
            .stats
            .contexts
            .iter()
            .filter(|c| c.untranslated > 0)
            .collect();
        if incomplete.is_empty() {
            println!("{}", "All contexts fully translated".green());
            return;
        }
        incomplete.sort_by(|a, b| b.untranslated.cmp(&a.untranslated).then(a.name.cmp(&b.name)));

        println!("{}", "INCOMPLETE CONTEXTS".bold().yellow());
        for context in incomplete {
            println!(
                "  {} {}/{}",
                context.name.bold(),
                context.untranslated.to_string().red(),
                context.messages
            );
        }
    }

    fn print_untranslated(&self, report: &CatalogReport) {
        if report.untranslated.is_empty() {
            return;
        }
        println!("{}", "UNTRANSLATED".bold().yellow());
        for item in report.untranslated.iter().take(CONSOLE_UNTRANSLATED_LIMIT) {
            let mut line = format!("  {} {:?}", item.context.bold(), item.source);
            if let Some(d) = &item.disambiguation {
                line.push_str(&format!(" ({})", d.dimmed()));
            }
            if let Some(loc) = &item.location {
                line.push_str(&format!(" {}", loc.dimmed()));
            }
            println!("{}", line);
        }
        let remaining = report.untranslated.len().saturating_sub(CONSOLE_UNTRANSLATED_LIMIT);
        if remaining > 0 {
            println!("  ... and {} more", remaining);
        }
    }

    fn print_findings(&self, findings: &[String]) {
        if findings.is_empty() {
            println!("{}", "No findings".green());
            return;
        }
        println!("{}", "FINDINGS".bold().red());
        for finding in findings {
            println!("  - {}", finding);
        }
    }

    pub fn save<P: AsRef<Path>>(
        &self,
        report: &CatalogReport,
        format: ReportOutputFormat,
        path: P,
    ) -> Result<()> {
        let mut path = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension(format.extension());
        }
        let content = format.serialize(report)?;
        fs::write(&path, content)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Report saved to: {}", path.display());
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStats;
    use tempfile::tempdir;

    #[test]
    fn save_adds_missing_extension() {
        let dir = tempdir().unwrap();
        let report = CatalogReport {
            catalog_path: "qt_pl.ts".into(),
            generated_at: "2026-01-01T00:00:00+00:00".into(),
            stats: CatalogStats::default(),
            untranslated: Vec::new(),
            findings: Vec::new(),
        };
        ReportFormatter::new()
            .save(&report, ReportOutputFormat::Json, dir.path().join("progress"))
            .unwrap();
        let written = fs::read_to_string(dir.path().join("progress.json")).unwrap();
        assert!(written.contains("\"catalog_path\": \"qt_pl.ts\""));
    }
}
