//! Adapter configuration: the integration surface named in the remediation
//! message.
//!
//! The message and documentation URL are part of the adapter's own versioned
//! contract. Users and support search for the text verbatim, so the defaults
//! below must only change together with the published plugin documentation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Documentation for the Gradle plugin integration.
pub const DEFAULT_DOCUMENTATION_URL: &str =
    "https://docs.gatling.io/reference/integrations/build-tools/gradle-plugin/";

/// Name of the plugin the user is told to update.
pub const DEFAULT_PLUGIN_NAME: &str = "Gatling Gradle plugin";

/// Name of the product the plugin integrates with.
pub const DEFAULT_PRODUCT_NAME: &str = "Gatling Enterprise";

// ---------------------------------------------------------------------------
// Integration surface
// ---------------------------------------------------------------------------

/// The integration point a compatibility error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationSurface {
    /// Plugin the user must update.
    pub plugin_name: String,
    /// Product the plugin integrates with.
    pub product_name: String,
    /// Canonical documentation page for the plugin.
    pub documentation_url: String,
}

impl Default for IntegrationSurface {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.to_owned(),
            product_name: DEFAULT_PRODUCT_NAME.to_owned(),
            documentation_url: DEFAULT_DOCUMENTATION_URL.to_owned(),
        }
    }
}

impl IntegrationSurface {
    /// The remediation sentence shown as the primary text of a compatibility
    /// error.
    pub fn remediation_message(&self) -> String {
        format!(
            "Please update the {} to the latest version for compatibility with {}. \
             See {} for more information about this plugin.",
            self.plugin_name, self.product_name, self.documentation_url
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.plugin_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "integration.plugin_name must not be empty".to_owned(),
            });
        }
        if self.product_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "integration.product_name must not be empty".to_owned(),
            });
        }
        if !self.documentation_url.starts_with("https://")
            || self.documentation_url.len() == "https://".len()
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "integration.documentation_url must be an https:// URL, got '{}'",
                    self.documentation_url
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Adapter configuration
// ---------------------------------------------------------------------------

/// Top-level adapter configuration, loaded from JSON.
///
/// Every field is optional; an empty document yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Integration surface named in compatibility errors.
    pub integration: IntegrationSurface,
}

impl AdapterConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the configuration; the adapter never starts with an invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.integration.validate()
    }
}

/// The adapter configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read adapter configuration {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has unknown fields.
    #[error("Invalid adapter configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but a value is unusable.
    #[error("Configuration error: {message}")]
    Invalid {
        /// Description of the configuration problem.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_message_is_the_published_text() {
        assert_eq!(
            IntegrationSurface::default().remediation_message(),
            "Please update the Gatling Gradle plugin to the latest version for compatibility \
             with Gatling Enterprise. See https://docs.gatling.io/reference/integrations/build-tools/gradle-plugin/ \
             for more information about this plugin."
        );
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(AdapterConfig::from_json_str("{}").unwrap(), AdapterConfig::default());
    }

    #[test]
    fn documentation_url_can_be_overridden() {
        let config = AdapterConfig::from_json_str(
            r#"{ "integration": { "documentation_url": "https://docs.gatling.io/gradle/" } }"#,
        )
        .unwrap();

        assert_eq!(config.integration.documentation_url, "https://docs.gatling.io/gradle/");
        assert_eq!(config.integration.plugin_name, DEFAULT_PLUGIN_NAME);
    }

    #[rstest]
    #[case::empty_url(r#"{ "integration": { "documentation_url": "" } }"#)]
    #[case::bare_scheme(r#"{ "integration": { "documentation_url": "https://" } }"#)]
    #[case::plain_http(r#"{ "integration": { "documentation_url": "http://docs.gatling.io/" } }"#)]
    #[case::blank_plugin(r#"{ "integration": { "plugin_name": "  " } }"#)]
    #[case::blank_product(r#"{ "integration": { "product_name": "" } }"#)]
    fn invalid_values_are_rejected(#[case] json: &str) {
        assert!(matches!(
            AdapterConfig::from_json_str(json),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            AdapterConfig::from_json_str(r#"{ "retries": 3 }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
