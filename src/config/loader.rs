//! Configuration loading from bytes or disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::ValidationError;
use crate::routing::Router;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serialized configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Toml,
}

impl Format {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Deserialize a configuration without semantic validation.
pub fn parse_config(bytes: &[u8], format: Format) -> Result<AppConfig, ConfigError> {
    match format {
        Format::Json => Ok(serde_json::from_slice(bytes)?),
        Format::Toml => {
            let text = std::str::from_utf8(bytes)?;
            Ok(toml::from_str(text)?)
        }
    }
}

/// Parse, validate and compile a JSON configuration.
pub fn build_config(bytes: &[u8]) -> Result<Router, ConfigError> {
    build_config_as(bytes, Format::Json)
}

/// Parse, validate and compile a configuration in the given format.
pub fn build_config_as(bytes: &[u8], format: Format) -> Result<Router, ConfigError> {
    let config = parse_config(bytes, format)?;
    let router = Router::from_config(config).map_err(ConfigError::Validation)?;

    tracing::info!(
        rules = router.rules().len(),
        manifest_entries = router.manifest().len(),
        "Configuration built"
    );
    Ok(router)
}

/// Read a configuration file from disk without validating it.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read(path)?;
    parse_config(&content, Format::from_path(path))
}

/// Load, validate and compile a configuration file.
pub fn load_config(path: &Path) -> Result<Router, ConfigError> {
    let content = fs::read(path)?;
    build_config_as(&content, Format::from_path(path))
}
