use std::time::Duration;
use clap::Args;
use url::Url;
use crate::error::{GenerationError, Result};

pub const DEFAULT_API_KEY_HEADER: &str = "X-API-KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Connection settings for the remote automation API.
///
/// Built once at startup and shared read-only (behind an `Arc`) with every client.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    pub base_url: Option<Url>,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub timeout: Duration,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AutomationConfig {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            base_url: Some(parse_base_url(base_url)?),
            api_key: Some(api_key.to_string()),
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fails with a configuration error naming the first missing setting.
    pub fn validate(&self) -> Result<()> {
        self.credential()?;
        self.endpoint("")?;
        Ok(())
    }

    pub fn credential(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GenerationError::Config("automation API key is missing".to_string())),
        }
    }

    /// Resolves `path` below the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_ref()
            .ok_or_else(|| GenerationError::Config("automation API base URL is missing".to_string()))?;
        let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
        Url::parse(joined.trim_end_matches('/'))
            .map_err(|e| GenerationError::Config(format!("invalid automation API URL {}: {}", joined, e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| GenerationError::Config(format!("invalid automation API base URL {}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(GenerationError::Config(format!("automation API base URL {} cannot be a base", raw)));
    }
    Ok(url)
}

/// Tuning of the generation pipeline itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Quiet period after the last prompt edit before an attempt starts.
    pub debounce: Duration,
    /// Extra catalog fetches after a transport failure.
    pub retries: u32,
    pub retry_backoff: Duration,
    /// Upper bound on each remote call, whatever the client does.
    pub call_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            retries: 1,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            call_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Command line / environment configuration.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Base URL of the automation API (e.g. https://automation.example.com/api/v1)
    #[arg(long, env = "FLOWGEN_API_URL")]
    pub api_url: Option<String>,

    /// Credential sent with every automation API request
    #[arg(long, env = "FLOWGEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Header carrying the credential
    #[arg(long, env = "FLOWGEN_API_KEY_HEADER", default_value = DEFAULT_API_KEY_HEADER)]
    pub api_key_header: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "FLOWGEN_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Quiet period before a prompt edit triggers generation
    #[arg(long, env = "FLOWGEN_DEBOUNCE_MS", default_value_t = 500)]
    pub debounce_ms: u64,

    /// Catalog fetch retries after a transport failure
    #[arg(long, env = "FLOWGEN_RETRIES", default_value_t = 1)]
    pub retries: u32,
}

impl ConfigArgs {
    /// Missing settings are kept as `None`; only malformed ones fail here.
    pub fn automation(&self) -> Result<AutomationConfig> {
        let base_url = self.api_url.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_base_url)
            .transpose()?;
        Ok(AutomationConfig {
            base_url,
            api_key: self.api_key.clone(),
            api_key_header: self.api_key_header.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            retries: self.retries,
            call_timeout: Duration::from_secs(self.timeout_secs),
            ..PipelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = AutomationConfig::new("https://automation.example.com/api/v1/", "key").unwrap();
        assert_eq!(config.endpoint("nodes").unwrap().as_str(), "https://automation.example.com/api/v1/nodes");
        assert_eq!(config.endpoint("/workflows").unwrap().as_str(), "https://automation.example.com/api/v1/workflows");
    }

    #[test]
    fn test_validate_reports_missing_settings() {
        let missing_url = AutomationConfig { api_key: Some("key".into()), ..AutomationConfig::default() };
        assert_eq!(
            missing_url.validate(),
            Err(GenerationError::Config("automation API base URL is missing".to_string()))
        );

        let missing_key = AutomationConfig::new("http://localhost:5678", " ").unwrap();
        assert_eq!(
            missing_key.validate(),
            Err(GenerationError::Config("automation API key is missing".to_string()))
        );
    }

    #[test]
    fn test_malformed_base_url_is_config_error() {
        assert!(matches!(AutomationConfig::new("not a url", "key"), Err(GenerationError::Config(_))));
    }
}
