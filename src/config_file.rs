//! Resolver settings file handling.
//!
//! Settings are read-only for the lifetime of a process: loaded once at
//! startup, then passed by value into each [`crate::Resolver`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ResolverError;
use crate::product_price::DEFAULT_UNIT_LABEL;
use crate::types::VisibilityMode;

/// Settings that tune resolver behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Whether hidden ancestors hide their descendants
    pub visibility_mode: VisibilityMode,
    /// Unit label for `unit` prices that do not name one
    pub default_unit_label: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            visibility_mode: VisibilityMode::default(),
            default_unit_label: DEFAULT_UNIT_LABEL.to_string(),
        }
    }
}

impl ResolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.default_unit_label.trim().is_empty() {
            return Err(ResolverError::config("Default unit label must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_default() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.visibility_mode, VisibilityMode::DirectParent);
        assert_eq!(settings.default_unit_label, "each");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{"visibility_mode": "ancestor_chain"}"#)
            .unwrap();
        temp_file.flush().unwrap();

        let settings = ResolverSettings::load_from_file(temp_file.path()).unwrap();
        assert_eq!(settings.visibility_mode, VisibilityMode::AncestorChain);
        assert_eq!(settings.default_unit_label, "each");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ResolverSettings::load_from_file(Path::new("/nonexistent/settings.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ invalid json }").unwrap();
        temp_file.flush().unwrap();

        assert!(ResolverSettings::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_blank_unit_label() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"default_unit_label": "  "}"#).unwrap();
        temp_file.flush().unwrap();

        let err = ResolverSettings::load_from_file(temp_file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolverError>(),
            Some(ResolverError::Config(_))
        ));
    }

    #[test]
    fn test_validate_reports_config_error() {
        let settings = ResolverSettings {
            default_unit_label: String::new(),
            ..ResolverSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Default unit label must not be empty"
        );
    }
}
