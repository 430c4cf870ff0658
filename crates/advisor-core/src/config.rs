//! Configuration for analysis operations
//!
//! All provider credentials (news API key, model API key, SMTP credentials)
//! are carried here and injected by constructor into each component. No
//! business logic reads ambient environment state; the environment is only
//! consulted by the explicit `with_env_*` loading helpers at startup.

use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_NEWS_API_BASE: &str = "https://newsapi.org/v2";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// SMTP delivery settings for the strategy mailer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host (e.g. "smtp.gmail.com")
    pub host: String,

    /// Submission port, STARTTLS-upgraded (e.g. 587)
    pub port: u16,

    /// Sender account name, also used as the From address
    pub username: String,

    /// Sender account password or app password
    pub password: String,

    /// The single fixed recipient address
    pub recipient: String,
}

/// Configuration for analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// NewsAPI key
    pub news_api_key: String,

    /// NewsAPI base URL
    pub news_api_base: String,

    /// News requests per minute (free tier allowance)
    pub news_rate_limit: u32,

    /// Text-generation service API key
    pub openai_api_key: String,

    /// Model identifier for all completion calls
    pub model: String,

    /// Number of articles requested per analysis run
    pub max_articles: usize,

    /// Most recent price observations fed to the summary prompt
    pub summary_window: usize,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Optional SMTP settings; email delivery is disabled when absent
    pub smtp: Option<SmtpConfig>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            news_api_key: String::new(),
            news_api_base: DEFAULT_NEWS_API_BASE.to_string(),
            news_rate_limit: 60,
            openai_api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_articles: 5,
            summary_window: 10,
            request_timeout: Duration::from_secs(30),
            smtp: None,
        }
    }
}

impl AdvisorConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_articles == 0 {
            return Err(AdvisorError::Config(
                "max_articles must be greater than 0".to_string(),
            ));
        }

        if self.summary_window == 0 {
            return Err(AdvisorError::Config(
                "summary_window must be greater than 0".to_string(),
            ));
        }

        if self.model.is_empty() {
            return Err(AdvisorError::Config("model must not be empty".to_string()));
        }

        if let Some(smtp) = &self.smtp {
            if smtp.host.is_empty() || smtp.recipient.is_empty() {
                return Err(AdvisorError::Config(
                    "SMTP host and recipient are required when mail is configured".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    news_api_key: Option<String>,
    news_api_base: Option<String>,
    news_rate_limit: Option<u32>,
    openai_api_key: Option<String>,
    model: Option<String>,
    max_articles: Option<usize>,
    summary_window: Option<usize>,
    request_timeout: Option<Duration>,
    smtp: Option<SmtpConfig>,
}

impl AdvisorConfigBuilder {
    /// Set the NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set the NewsAPI base URL
    pub fn news_api_base(mut self, base: impl Into<String>) -> Self {
        self.news_api_base = Some(base.into());
        self
    }

    /// Set the news requests-per-minute allowance
    pub fn news_rate_limit(mut self, limit: u32) -> Self {
        self.news_rate_limit = Some(limit);
        self
    }

    /// Set the text-generation service API key
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the number of articles per run
    pub fn max_articles(mut self, count: usize) -> Self {
        self.max_articles = Some(count);
        self
    }

    /// Set the price-summary observation window
    pub fn summary_window(mut self, window: usize) -> Self {
        self.summary_window = Some(window);
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set SMTP delivery settings
    pub fn smtp(mut self, smtp: SmtpConfig) -> Self {
        self.smtp = Some(smtp);
        self
    }

    /// Load API keys and SMTP credentials from the environment.
    ///
    /// Reads `NEWS_API_KEY`, `OPENAI_API_KEY`, `OPENAI_MODEL`, and the
    /// `SMTP_HOST`/`SMTP_PORT`/`SMTP_USERNAME`/`SMTP_PASSWORD`/
    /// `SMTP_RECIPIENT` group (all five required to enable mail).
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.news_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.model = Some(model);
        }

        let smtp_vars = (
            std::env::var("SMTP_HOST"),
            std::env::var("SMTP_USERNAME"),
            std::env::var("SMTP_PASSWORD"),
            std::env::var("SMTP_RECIPIENT"),
        );
        if let (Ok(host), Ok(username), Ok(password), Ok(recipient)) = smtp_vars {
            let port = std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587);
            self.smtp = Some(SmtpConfig {
                host,
                port,
                username,
                password,
                recipient,
            });
        }

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let defaults = AdvisorConfig::default();

        let config = AdvisorConfig {
            news_api_key: self.news_api_key.unwrap_or(defaults.news_api_key),
            news_api_base: self.news_api_base.unwrap_or(defaults.news_api_base),
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            openai_api_key: self.openai_api_key.unwrap_or(defaults.openai_api_key),
            model: self.model.unwrap_or(defaults.model),
            max_articles: self.max_articles.unwrap_or(defaults.max_articles),
            summary_window: self.summary_window.unwrap_or(defaults.summary_window),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            smtp: self.smtp,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.summary_window, 10);
        assert!(config.smtp.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AdvisorConfig::builder()
            .news_api_key("news-key")
            .openai_api_key("model-key")
            .model("gpt-4o")
            .max_articles(3)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.news_api_key, "news-key");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_articles, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation_zero_articles() {
        let config = AdvisorConfig {
            max_articles: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_incomplete_smtp() {
        let config = AdvisorConfig {
            smtp: Some(SmtpConfig {
                host: String::new(),
                port: 587,
                username: "sender@example.com".to_string(),
                password: "secret".to_string(),
                recipient: "receiver@example.com".to_string(),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
