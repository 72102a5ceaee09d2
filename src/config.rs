use anyhow::{Context, Result};
use glob::Pattern;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::{CheckOptions, DEFAULT_MAX_HEADER_BYTES};
use crate::template::{builtin, MatchOptions, TemplateDefinition, TemplateRegistry};

/// Configuration file looked up in the current directory
pub const CONFIG_FILE: &str = ".header-auditor.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output format (table, json)
    pub format: Option<String>,

    /// Exit with an error when non-compliant files are found
    pub fail_on_violations: Option<bool>,

    /// Load the built-in templates in addition to `templates`
    pub builtin_templates: Option<bool>,

    /// Leading bytes read per file
    pub max_header_bytes: Option<usize>,

    /// Unmatched non-blank lines tolerated before a template
    pub max_leading_residual: Option<usize>,

    /// Unmatched non-blank lines tolerated after a template
    pub max_trailing_residual: Option<usize>,

    /// Glob patterns of paths never walked
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns of paths reported as exempt
    #[serde(default)]
    pub exempt: Vec<String>,

    /// Extension or file name to language tag
    #[serde(default)]
    pub languages: IndexMap<String, String>,

    /// Copyright holders recognized as third-party when no template matches
    #[serde(default)]
    pub third_party_holders: Vec<String>,

    /// Custom header templates
    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        let match_options = MatchOptions::default();
        Self {
            format: Some("table".to_string()),
            fail_on_violations: Some(true),
            builtin_templates: Some(true),
            max_header_bytes: Some(DEFAULT_MAX_HEADER_BYTES),
            max_leading_residual: Some(match_options.max_leading_residual),
            max_trailing_residual: Some(match_options.max_trailing_residual),
            exclude: Vec::new(),
            exempt: Vec::new(),
            languages: IndexMap::new(),
            third_party_holders: Vec::new(),
            templates: Vec::new(),
        }
    }
}

impl Config {
    /// Compile built-in and custom templates into a registry
    pub fn build_registry(&self) -> Result<TemplateRegistry> {
        let mut definitions = Vec::new();
        if self.builtin_templates.unwrap_or(true) {
            definitions.extend(builtin::definitions());
        }
        definitions.extend(self.templates.iter().cloned());

        let registry = TemplateRegistry::load(&definitions).context("Invalid template definition")?;
        if registry.is_empty() {
            warn!("No templates configured, every header will be reported as unrecognized");
        }
        debug!("Loaded {} template(s)", registry.len());
        Ok(registry)
    }

    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        compile_patterns("exclude", &self.exclude)
    }

    pub fn exempt_patterns(&self) -> Result<Vec<Pattern>> {
        compile_patterns("exempt", &self.exempt)
    }

    pub fn match_options(&self) -> MatchOptions {
        let defaults = MatchOptions::default();
        MatchOptions {
            max_leading_residual: self.max_leading_residual.unwrap_or(defaults.max_leading_residual),
            max_trailing_residual: self.max_trailing_residual.unwrap_or(defaults.max_trailing_residual),
        }
    }

    pub fn check_options(&self, fail_fast: bool) -> Result<CheckOptions> {
        Ok(CheckOptions {
            match_options: self.match_options(),
            max_header_bytes: self.max_header_bytes.unwrap_or(DEFAULT_MAX_HEADER_BYTES),
            exempt: self.exempt_patterns()?,
            languages: self.languages.clone(),
            third_party_holders: self.third_party_holders.iter().map(|holder| holder.trim().to_string()).collect(),
            fail_fast,
        })
    }

    /// Check everything that would otherwise fail at the start of a run
    pub fn validate(&self) -> Result<()> {
        match self.format.as_deref() {
            None | Some("table") | Some("json") => {}
            Some(other) => return Err(anyhow::anyhow!("Unknown output format '{}' (expected table or json)", other)),
        }
        if self.max_header_bytes == Some(0) {
            return Err(anyhow::anyhow!("max_header_bytes must be greater than 0"));
        }
        if self.third_party_holders.iter().any(|holder| holder.trim().is_empty()) {
            return Err(anyhow::anyhow!("third_party_holders must not contain empty names"));
        }
        self.exclude_patterns()?;
        self.exempt_patterns()?;
        self.build_registry()?;
        Ok(())
    }
}

fn compile_patterns(field: &str, patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).with_context(|| format!("Invalid {} pattern '{}'", field, pattern))
        })
        .collect()
}

/// Load configuration from `explicit`, or from `.header-auditor.toml` in the
/// current directory when no path is given
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }
        return load_config_from(path);
    }

    let config_path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE);

    if !config_path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE);
        return Ok(Config::default());
    }

    load_config_from(&config_path)
}

/// Load configuration from a specific file
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.format, Some("table".to_string()));
        assert_eq!(config.fail_on_violations, Some(true));
        assert_eq!(config.builtin_templates, Some(true));
        assert_eq!(config.match_options(), MatchOptions::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.build_registry().unwrap().len(), builtin::definitions().len());
    }

    #[test]
    fn test_config_load_from_file() {
        let (_temp_dir, path) = write_config(
            r#"
format = "json"
fail_on_violations = false
max_header_bytes = 2048
max_leading_residual = 0
exclude = ["third_party"]
exempt = ["**/*.pb.cc"]
third_party_holders = ["The Chromium Authors", " Google Inc. "]

[languages]
gni = "gn"
mm = "objc"

[[templates]]
id = "acme-notice"
description = "ACME internal notice"
lines = ["Copyright {year} ACME Corp. Confidential."]
"#,
        );

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.format, Some("json".to_string()));
        assert_eq!(config.fail_on_violations, Some(false));
        assert_eq!(config.builtin_templates, None);
        assert_eq!(config.match_options().max_leading_residual, 0);
        assert_eq!(config.match_options().max_trailing_residual, 2);
        assert_eq!(config.languages.keys().collect::<Vec<_>>(), vec!["gni", "mm"]);

        let options = config.check_options(true).unwrap();
        assert_eq!(options.max_header_bytes, 2048);
        assert_eq!(options.exempt.len(), 1);
        assert_eq!(options.third_party_holders, vec!["The Chromium Authors", "Google Inc."]);
        assert!(options.fail_fast);

        let registry = config.build_registry().unwrap();
        assert!(registry.get("acme-notice").is_some());
        assert!(registry.get("standard-notice").is_some());
    }

    #[test]
    fn test_builtin_templates_can_be_disabled() {
        let (_temp_dir, path) = write_config(
            r#"
builtin_templates = false

[[templates]]
id = "only"
lines = ["Copyright {year} {holder}"]
"#,
        );
        let registry = load_config_from(&path).unwrap().build_registry().unwrap();
        assert_eq!(registry.iter().map(|t| t.id()).collect::<Vec<_>>(), vec!["only"]);
    }

    #[test]
    fn test_malformed_template_is_fatal() {
        let (_temp_dir, path) = write_config(
            r#"
[[templates]]
id = "broken"
third_party = false
requires_modification_notice = true
lines = ["Copyright {year} {holder}", "{modification_notice?}"]
"#,
        );
        let config = load_config_from(&path).unwrap();
        let error = config.validate().unwrap_err();
        assert!(format!("{:#}", error).contains("not marked third_party"));
    }

    #[test]
    fn test_duplicate_of_builtin_is_rejected() {
        let mut config = Config::default();
        config.templates.push(TemplateDefinition {
            id: "standard-notice".to_string(),
            description: None,
            third_party: false,
            requires_modification_notice: false,
            lines: vec!["Copyright {year} Someone".to_string()],
            holders: Vec::new(),
        });
        assert!(config.build_registry().is_err());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.exempt = vec!["[unclosed".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.format = Some("csv".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.third_party_holders = vec!["Google Inc.".to_string(), " ".to_string()];
        assert!(config.validate().is_err());

        let (_temp_dir, path) = write_config("unknown_key = 1\n");
        assert!(load_config_from(&path).is_err());

        assert!(load_config(Some(Path::new("/nonexistent/.header-auditor.toml"))).is_err());
    }
}
