// SPDX-License-Identifier: PMPL-1.0-or-later

//! lcat: inspect and query Qt Linguist translation catalogs
//!
//! Loads `.ts` files, answers lookups the way an application embedding the
//! catalog would, and produces progress reports for translators and CI.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linguist_catalog::catalog::to_ts_string;
use linguist_catalog::config::Config;
use linguist_catalog::report::{self, ReportOutputFormat};
use linguist_catalog::{scan, LoadOptions, TranslationCatalog};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lcat")]
#[command(version)]
#[command(about = "Query and report on Qt Linguist translation catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (.yaml, .yml or .json); defaults to ./lcat.yaml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one message the way an application would
    Lookup {
        /// Context, usually the originating class name
        #[arg(value_name = "CONTEXT")]
        context: String,

        /// Source text
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Catalog file (falls back to the configured catalog)
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Disambiguation comment
        #[arg(short, long)]
        disambiguation: Option<String>,

        /// Count for numerus messages; `%n` is substituted
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Answer from an empty catalog when the file cannot be loaded
        #[arg(long)]
        allow_missing_catalog: bool,
    },

    /// List messages that still need a translation, in file order
    Untranslated {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long, default_value = "text")]
        format: ReportOutputFormat,
    },

    /// Translation progress report
    Stats {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output format (defaults to the output file's extension, then the
        /// configured one)
        #[arg(long)]
        format: Option<ReportOutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a catalog; fails with the offending position
    Check {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Re-serialize a catalog in canonical layout
    Normalize {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Coverage of every .ts file below a directory
    Scan {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(long, default_value = "text")]
        format: ReportOutputFormat,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_catalog(path: &Path, options: &LoadOptions) -> Result<TranslationCatalog> {
    TranslationCatalog::load_path_with(path, options)
        .with_context(|| format!("loading catalog {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    let options = config.load_options();

    match cli.command {
        Commands::Lookup {
            context,
            source,
            file,
            disambiguation,
            count,
            allow_missing_catalog,
        } => {
            let path = config.catalog_path(file)?;
            let catalog = match load_catalog(&path, &options) {
                Ok(catalog) => catalog,
                Err(err) if allow_missing_catalog => {
                    warn!("{:#}; answering from an empty catalog", err);
                    TranslationCatalog::empty()
                }
                Err(err) => return Err(err),
            };

            let disambiguation = disambiguation.as_deref();
            let text = match count {
                Some(n) => catalog.translate_plural(&context, &source, disambiguation, n),
                None => catalog.lookup(&context, &source, disambiguation).to_string(),
            };
            println!("{}", text);
        }

        Commands::Untranslated { file, format } => {
            let path = config.catalog_path(file)?;
            let catalog = load_catalog(&path, &options)?;
            match format {
                ReportOutputFormat::Text => {
                    for entry in catalog.untranslated_entries() {
                        match entry.disambiguation() {
                            Some(d) => println!("{}\t{}\t{}", entry.context, entry.source, d),
                            None => println!("{}\t{}", entry.context, entry.source),
                        }
                    }
                }
                ReportOutputFormat::Json => {
                    let entries: Vec<_> = catalog.untranslated_entries().collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                ReportOutputFormat::Yaml => {
                    let entries: Vec<_> = catalog.untranslated_entries().collect();
                    print!("{}", serde_yaml::to_string(&entries)?);
                }
            }
        }

        Commands::Stats {
            file,
            format,
            output,
        } => {
            let path = config.catalog_path(file)?;
            let catalog = load_catalog(&path, &options)?;
            let catalog_report = report::generate_report(&path, &catalog);
            let format = format
                .or_else(|| {
                    output
                        .as_deref()
                        .and_then(|p| p.extension())
                        .and_then(|ext| ext.to_str())
                        .and_then(ReportOutputFormat::parse)
                })
                .unwrap_or(config.report_format);

            if let Some(output_path) = output {
                report::save_report(&catalog_report, format, output_path)?;
            } else if format == ReportOutputFormat::Text {
                report::print_report(&catalog_report);
            } else {
                print!("{}", format.serialize(&catalog_report)?);
            }
        }

        Commands::Check { file } => {
            let path = config.catalog_path(file)?;
            let catalog = load_catalog(&path, &options)?;
            println!(
                "{}: ok ({} messages, {} contexts, {} duplicates overridden)",
                path.display(),
                catalog.len(),
                catalog.contexts().len(),
                catalog.duplicates()
            );
        }

        Commands::Normalize { file, output } => {
            let path = config.catalog_path(file)?;
            let catalog = load_catalog(&path, &options)?;
            let text = to_ts_string(&catalog);
            match output {
                Some(output_path) => {
                    std::fs::write(&output_path, text)
                        .with_context(|| format!("writing {}", output_path.display()))?;
                    println!("Catalog written to: {}", output_path.display());
                }
                None => print!("{}", text),
            }
        }

        Commands::Scan { dir, format } => {
            let scan_report = scan::scan(&dir, &options)?;
            match format {
                ReportOutputFormat::Text => scan::print_scan(&scan_report),
                ReportOutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&scan_report)?)
                }
                ReportOutputFormat::Yaml => print!("{}", serde_yaml::to_string(&scan_report)?),
            }
            if !scan_report.is_clean() {
                anyhow::bail!("{} catalog(s) failed to load", scan_report.failures.len());
            }
        }
    }

    Ok(())
}
