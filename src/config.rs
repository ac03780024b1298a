//! YAML configuration file support for the decoding pipeline.
//!
//! Every stage configuration (mark detection, matching, report, reference
//! builder) can be declared in one YAML file and loaded at runtime. Missing
//! sections fall back to their defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "clinic checklist"
//!
//! ingest:
//!   version: 1
//!   max_payload_bytes: 10485760
//!   marks:
//!     table_marks: ["+", "＋"]
//!     paragraph_marks: ["☑", "☒", "✔", "X", "x"]
//!     table_policy: exact
//!
//! matcher:
//!   cutoff: 0.6
//!   metric: sequence_ratio
//!   resolve_codes: true
//!
//! report:
//!   empty_report: "Отмеченные пункты не найдены в базе расшифровок."
//!
//! builder:
//!   max_heading_chars: 220
//!   reserved_prefixes: ["возможные", "признак", "расшифровка"]
//! ```

use std::fs;
use std::path::Path;

use index::BuilderConfig;
use ingest::IngestConfig;
use matcher::{MatchConfig, ReportConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Configuration of every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    pub name: Option<String>,

    pub ingest: IngestConfig,
    pub matcher: MatchConfig,
    pub report: ReportConfig,

    /// Only read by the offline reference builder.
    pub builder: BuilderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestConfig::default(),
            matcher: MatchConfig::default(),
            report: ReportConfig::default(),
            builder: BuilderConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the version and every stage configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;
        self.builder
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("builder: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
matcher:
  cutoff: 0.75
  metric: jaro_winkler
ingest:
  marks:
    table_policy: contains
"#;

        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.matcher.cutoff, 0.75);
        assert_eq!(config.matcher.metric, matcher::SimilarityMetric::JaroWinkler);
        assert!(config.matcher.resolve_codes);
        assert_eq!(config.ingest.marks.table_policy, ingest::TableMarkPolicy::Contains);
        assert_eq!(config.ingest.marks.table_marks, vec!["+", "\u{FF0B}"]);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = "version: \"1\"\nreport:\n  empty_report: \"Nothing found\"\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PipelineConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.empty_report, "Nothing found");
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let result = PipelineConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_matcher_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  cutoff: 1.5
"#;

        let result = PipelineConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cutoff"));
    }

    #[test]
    fn test_ingest_validation() {
        let yaml = r#"
version: "1.0"
ingest:
  marks:
    paragraph_marks: []
"#;

        let result = PipelineConfig::from_yaml(yaml);
        assert!(result.unwrap_err().to_string().contains("ingest"));
    }

    #[test]
    fn test_builder_validation() {
        let yaml = r#"
version: "1.0"
builder:
  max_heading_chars: 0
"#;

        let result = PipelineConfig::from_yaml(yaml);
        assert!(result.unwrap_err().to_string().contains("max_heading_chars"));
    }
}
