// SPDX-License-Identifier: PMPL-1.0-or-later

//! Optional `lcat` configuration file.

use crate::catalog::LoadOptions;
use crate::report::ReportOutputFormat;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "lcat.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog used when a command is not given one.
    pub catalog: Option<PathBuf>,
    pub include_unfinished: bool,
    /// Overrides the catalog's own `language` for plural selection.
    pub language: Option<String>,
    pub report_format: ReportOutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            include_unfinished: true,
            language: None,
            report_format: ReportOutputFormat::Text,
        }
    }
}

impl Config {
    /// `lcat.yaml` in the working directory, or defaults when it is absent.
    pub fn load_default() -> Result<Self> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json config {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml config {}", path.display())),
            _ => Err(anyhow!(
                "unsupported config extension for {}",
                path.display()
            )),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include_unfinished: self.include_unfinished,
            language: self.language.clone(),
        }
    }

    /// The catalog to use: an explicit path wins over the configured one.
    pub fn catalog_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit
            .or_else(|| self.catalog.clone())
            .ok_or_else(|| anyhow!("no catalog given and none configured in {}", DEFAULT_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn yaml_config_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lcat.yaml");
        fs::write(
            &path,
            "catalog: translations/qt_pl.ts\ninclude_unfinished: false\nreport_format: json\n",
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("translations/qt_pl.ts")));
        assert!(!config.include_unfinished);
        assert_eq!(config.report_format, ReportOutputFormat::Json);
        assert_eq!(config.language, None);
    }

    #[test]
    fn json_config_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lcat.json");
        fs::write(&path, r#"{"language": "pl_PL"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.language.as_deref(), Some("pl_PL"));
        assert!(config.include_unfinished);
        assert_eq!(config.load_options().language.as_deref(), Some("pl_PL"));
    }

    #[test]
    fn unknown_keys_and_extensions_rejected() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("bad.yaml");
        fs::write(&yaml, "catalogue: typo.ts\n").unwrap();
        assert!(Config::load(&yaml).is_err());

        let toml = dir.path().join("lcat.toml");
        fs::write(&toml, "catalog = 'x'").unwrap();
        assert!(Config::load(&toml).is_err());
    }

    #[test]
    fn explicit_catalog_wins() {
        let config = Config {
            catalog: Some("configured.ts".into()),
            ..Default::default()
        };
        assert_eq!(
            config.catalog_path(Some("given.ts".into())).unwrap(),
            PathBuf::from("given.ts")
        );
        assert_eq!(config.catalog_path(None).unwrap(), PathBuf::from("configured.ts"));
        assert!(Config::default().catalog_path(None).is_err());
    }
}
