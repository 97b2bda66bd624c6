//! Completion engine configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{ConfigError, ValidationError};

/// Configuration for the OpenAI-compatible completion engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// API key for the completion service
    #[serde(default = "default_api_key")]
    pub api_key: SecretString,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `OPENAI_`-prefixed variables:
    /// `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL_ID`,
    /// `OPENAI_MAX_TOKENS`, `OPENAI_TEMPERATURE`, `OPENAI_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("OPENAI"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }

    /// Check if an API key is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Validate engine configuration
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any value is out of range or missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_configured() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.model_id.trim().is_empty() {
            return Err(ValidationError::InvalidModelId);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            model_id: default_model_id(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_key() -> SecretString {
    SecretString::new(String::new())
}

fn default_base_url() -> String {
    "https://api.siliconflow.cn/v1".to_string()
}

fn default_model_id() -> String {
    "deepseek-ai/DeepSeek-R1".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u32 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EngineConfig {
        EngineConfig {
            api_key: SecretString::new("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_cover_the_full_surface() {
        let config = EngineConfig::default();
        assert_eq!(config.model_id, "deepseek-ai/DeepSeek-R1");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.timeout_secs, 120);
        assert!(!config.is_configured());
    }

    #[test]
    fn timeout_duration() {
        let config = EngineConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn validation_requires_api_key() {
        let err = EngineConfig::default().validate().unwrap_err();
        assert!(matches!(err, ValidationError::MissingRequired(_)));
    }

    #[test]
    fn validation_rejects_bad_base_url() {
        let config = EngineConfig {
            base_url: "ftp://example.com".to_string(),
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl)
        ));
    }

    #[test]
    fn validation_rejects_out_of_range_temperature() {
        let config = EngineConfig {
            temperature: 2.5,
            ..configured()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature)
        ));
    }

    #[test]
    fn configured_defaults_validate() {
        assert!(configured().validate().is_ok());
    }
}
