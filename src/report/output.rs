// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::CatalogReport;
use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutputFormat {
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Text => "txt",
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
        }
    }

    pub fn serialize(&self, report: &CatalogReport) -> Result<String> {
        match self {
            ReportOutputFormat::Text => Ok(format_report_as_text(report)),
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}

/// Plain, uncoloured rendering for files and pipes.
fn format_report_as_text(report: &CatalogReport) -> String {
    let stats = &report.stats;
    let mut lines = Vec::new();
    lines.push(format!("catalog: {}", report.catalog_path.display()));
    lines.push(format!("generated: {}", report.generated_at));
    if let Some(language) = &stats.language {
        lines.push(format!("language: {}", language));
    }
    lines.push(format!(
        "messages: {} active, {} translated, {} untranslated, {} unfinished, {} obsolete, {} vanished",
        stats.active,
        stats.translated,
        stats.untranslated,
        stats.unfinished,
        stats.obsolete,
        stats.vanished
    ));
    lines.push(format!("coverage: {:.1}%", stats.coverage_percent));
    for finding in &report.findings {
        lines.push(format!("finding: {}", finding));
    }
    for item in &report.untranslated {
        let mut line = format!("untranslated: {} {:?}", item.context, item.source);
        if let Some(d) = &item.disambiguation {
            line.push_str(&format!(" ({})", d));
        }
        if let Some(loc) = &item.location {
            line.push_str(&format!(" @ {}", loc));
        }
        lines.push(line);
    }
    lines.push(String::new());
    lines.join("\n")
}
