use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::bundle::BundleFormat;
use crate::cache::CachePolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "baseNames[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号つきの行に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// バンドルファイルの形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Properties,
    Json,
}

/// `reloadInterval` の単位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadUnit {
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl ReloadUnit {
    /// 値と単位から間隔を作る
    #[must_use]
    pub const fn duration(self, value: u64) -> Duration {
        match self {
            Self::Milliseconds => Duration::from_millis(value),
            Self::Seconds => Duration::from_secs(value),
            Self::Minutes => Duration::from_secs(value.saturating_mul(60)),
            Self::Hours => Duration::from_secs(value.saturating_mul(60 * 60)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverSettings {
    /// Logical bundle names, e.g. `messages` or `mail/messages`.
    pub base_names: Vec<String>,
    /// Appended after `base[_locale]`.
    pub file_suffix: String,
    pub format: FileFormat,
    /// Used to flatten nested JSON bundles.
    pub key_separator: String,

    /// Roots searched for bundles, in discovery order.
    /// Relative paths are resolved against the configuration directory.
    pub resource_roots: Vec<String>,
    /// Overlay roots. Each one becomes its own message source.
    pub extended_directories: Vec<String>,
    /// Directories holding one template per file.
    pub template_directories: Vec<String>,
    pub template_file_suffix: String,

    /// `0` loads each locale once and never reloads it.
    pub reload_interval: u64,
    pub reload_interval_unit: ReloadUnit,
    /// Keep serving the previous messages when a reload fails.
    pub serve_stale_on_error: bool,
}

impl ResolverSettings {
    /// # Errors
    /// - Required field is empty
    /// - Suffix without a leading dot
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.base_names.is_empty() {
            errors.push(ValidationError::new(
                "baseNames",
                "At least one base name is required. Example: [\"messages\"]",
            ));
        }

        for (index, name) in self.base_names.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("baseNames[{index}]"),
                    "The base name cannot be empty",
                ));
            }
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        check_suffix(&mut errors, "fileSuffix", &self.file_suffix);
        if self.file_suffix.is_empty() {
            errors.push(ValidationError::new(
                "fileSuffix",
                "The suffix cannot be empty. Example: \".properties\"",
            ));
        }
        check_suffix(&mut errors, "templateFileSuffix", &self.template_file_suffix);

        check_paths(&mut errors, "resourceRoots", &self.resource_roots);
        check_paths(&mut errors, "extendedDirectories", &self.extended_directories);
        check_paths(&mut errors, "templateDirectories", &self.template_directories);

        if self.resource_roots.is_empty() {
            errors.push(ValidationError::new(
                "resourceRoots",
                "At least one root is required. Example: [\".\"]",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 再読み込みの方針
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            reload_interval: self.reload_interval_unit.duration(self.reload_interval),
            serve_stale_on_error: self.serve_stale_on_error,
        }
    }

    /// バンドルファイルの形式
    #[must_use]
    pub fn bundle_format(&self) -> BundleFormat {
        match self.format {
            FileFormat::Properties => BundleFormat::Properties,
            FileFormat::Json => BundleFormat::Json { key_separator: self.key_separator.clone() },
        }
    }

    /// テンプレートファイルの形式
    #[must_use]
    pub fn template_format(&self) -> BundleFormat {
        BundleFormat::TemplateFile { suffix: self.template_file_suffix.clone() }
    }
}

/// 空でないサフィックスは `.` で始まること
fn check_suffix(errors: &mut Vec<ValidationError>, field: &str, suffix: &str) {
    if !suffix.is_empty() && !suffix.starts_with('.') {
        errors.push(ValidationError::new(
            field,
            format!("The suffix must start with '.'. Example: \".{suffix}\""),
        ));
    }
}

/// パスの一覧に空の要素がないこと
fn check_paths(errors: &mut Vec<ValidationError>, field: &str, paths: &[String]) {
    for (index, path) in paths.iter().enumerate() {
        if path.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                "The path cannot be empty",
            ));
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_names: vec!["messages".to_string()],
            file_suffix: ".properties".to_string(),
            format: FileFormat::default(),
            key_separator: ".".to_string(),
            resource_roots: vec![".".to_string()],
            extended_directories: vec!["extended".to_string()],
            template_directories: Vec::new(),
            template_file_suffix: String::new(),
            reload_interval: 0,
            reload_interval_unit: ReloadUnit::default(),
            serve_stale_on_error: true,
        }
    }
}
