//! Configuration types for the study-guide service.
//!
//! Configuration is presence-validated only: the project id, model id and a
//! credential must be non-empty. Whether they are accepted by Vertex AI is
//! discovered on the first call.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::ConfigurationError;
use crate::transport::endpoints;

/// Default Vertex AI location.
pub const DEFAULT_LOCATION: &str = endpoints::GLOBAL_LOCATION;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default request timeout (300 seconds; video inputs are slow to process).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Credential used to authenticate against Vertex AI.
#[derive(Clone, Debug)]
pub enum Credentials {
    /// OAuth2 access token, sent as `Authorization: Bearer ...`.
    AccessToken(SecretString),
    /// API key, sent as `x-goog-api-key`.
    ApiKey(SecretString),
}

/// Retry configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// Configuration for the Vertex AI generation client.
#[derive(Clone, Debug)]
pub struct StudyBuddyConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Vertex AI location, e.g. `global` or `us-central1`.
    pub location: String,
    /// Publisher model id.
    pub model: String,
    /// Credential for outbound calls.
    pub credentials: Credentials,
    /// Service base URL.
    pub base_url: Url,
    /// API version path segment.
    pub api_version: String,
    /// Timeout for a whole request, including a streamed body.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl StudyBuddyConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StudyBuddyConfigBuilder {
        StudyBuddyConfigBuilder::default()
    }

    /// Create configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `GOOGLE_PROJECT_ID` | required |
    /// | `GOOGLE_LOCATION` | `global` |
    /// | `STUDY_BUDDY_MODEL` | `gemini-2.5-pro` |
    /// | `GOOGLE_ACCESS_TOKEN` / `GOOGLE_API_KEY` | one required |
    /// | `STUDY_BUDDY_BASE_URL` | derived from location |
    /// | `STUDY_BUDDY_TIMEOUT_SECS` | 300 |
    /// | `STUDY_BUDDY_MAX_RETRIES` | 2 |
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(project_id) = var("GOOGLE_PROJECT_ID") {
            builder = builder.project_id(project_id);
        }
        if let Some(location) = var("GOOGLE_LOCATION") {
            builder = builder.location(location);
        }
        if let Some(model) = var("STUDY_BUDDY_MODEL") {
            builder = builder.model(model);
        }

        if let Some(token) = var("GOOGLE_ACCESS_TOKEN") {
            builder = builder.credentials(Credentials::AccessToken(SecretString::new(token)));
        } else if let Some(api_key) = var("GOOGLE_API_KEY") {
            builder = builder.credentials(Credentials::ApiKey(SecretString::new(api_key)));
        }

        if let Some(base_url) = var("STUDY_BUDDY_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = var("STUDY_BUDDY_TIMEOUT_SECS") {
            let secs = parse_number::<u64>("STUDY_BUDDY_TIMEOUT_SECS", &timeout)?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = var("STUDY_BUDDY_MAX_RETRIES") {
            builder = builder.max_retries(parse_number("STUDY_BUDDY_MAX_RETRIES", &retries)?);
        }

        builder.build()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigurationError> {
    value.trim().parse().map_err(|_| ConfigurationError::InvalidConfiguration {
        message: format!("{} must be a non-negative integer, got {:?}", key, value),
    })
}

/// Builder for [`StudyBuddyConfig`].
#[derive(Default)]
pub struct StudyBuddyConfigBuilder {
    project_id: Option<String>,
    location: Option<String>,
    model: Option<String>,
    credentials: Option<Credentials>,
    base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
}

impl StudyBuddyConfigBuilder {
    /// Set the project id.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the model id.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the base URL derived from the location.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries; overrides `retry_config.max_retries`.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<StudyBuddyConfig, ConfigurationError> {
        let project_id = self
            .project_id
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigurationError::MissingProjectId)?;

        let model = match self.model {
            Some(model) if model.trim().is_empty() => return Err(ConfigurationError::MissingModel),
            Some(model) => model,
            None => DEFAULT_MODEL.to_string(),
        };

        let credentials = self.credentials.ok_or(ConfigurationError::MissingCredentials)?;

        let location = self
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let raw_base_url = self
            .base_url
            .unwrap_or_else(|| endpoints::base_url_for_location(&location));
        let mut base_url = Url::parse(&raw_base_url)
            .map_err(|_| ConfigurationError::InvalidBaseUrl { url: raw_base_url.clone() })?;
        // Endpoint paths are joined onto the base, which must end in '/' to keep its prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry_config.max_retries = max_retries;
        }

        Ok(StudyBuddyConfig {
            project_id,
            location,
            model,
            credentials,
            base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            retry_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn api_key() -> Credentials {
        Credentials::ApiKey(SecretString::new("test-key".into()))
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StudyBuddyConfig::builder()
            .project_id("my-project")
            .credentials(api_key())
            .build()
            .unwrap();

        assert_eq!(config.location, "global");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url.as_str(), "https://aiplatform.googleapis.com/");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.retry_config.max_retries, 2);
    }

    #[test]
    fn test_regional_location_derives_base_url() {
        let config = StudyBuddyConfig::builder()
            .project_id("p")
            .location("us-central1")
            .credentials(api_key())
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://us-central1-aiplatform.googleapis.com/");
    }

    #[test]
    fn test_missing_project_id() {
        let result = StudyBuddyConfig::builder().credentials(api_key()).build();
        assert_eq!(result.unwrap_err(), ConfigurationError::MissingProjectId);
    }

    #[test]
    fn test_missing_credentials() {
        let result = StudyBuddyConfig::builder().project_id("p").build();
        assert_eq!(result.unwrap_err(), ConfigurationError::MissingCredentials);
    }

    #[test]
    fn test_blank_model_is_rejected() {
        let result = StudyBuddyConfig::builder()
            .project_id("p")
            .model("  ")
            .credentials(api_key())
            .build();
        assert_eq!(result.unwrap_err(), ConfigurationError::MissingModel);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = StudyBuddyConfig::builder()
            .project_id("p")
            .credentials(api_key())
            .base_url("not a url")
            .build();
        assert!(matches!(result, Err(ConfigurationError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = StudyBuddyConfig::from_lookup(lookup(&[
            ("GOOGLE_PROJECT_ID", "p"),
            ("GOOGLE_API_KEY", "key"),
            ("STUDY_BUDDY_BASE_URL", "https://gateway.example.com/vertex"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://gateway.example.com/vertex/");
    }

    #[test]
    fn test_base_url_with_trailing_slash_is_unchanged() {
        let config = StudyBuddyConfig::builder()
            .project_id("p")
            .credentials(api_key())
            .base_url("https://gateway.example.com/vertex/")
            .build()
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://gateway.example.com/vertex/");
    }

    #[test]
    fn test_from_lookup_prefers_access_token() {
        let config = StudyBuddyConfig::from_lookup(lookup(&[
            ("GOOGLE_PROJECT_ID", "proj"),
            ("GOOGLE_LOCATION", "europe-west4"),
            ("GOOGLE_ACCESS_TOKEN", "ya29.token"),
            ("GOOGLE_API_KEY", "key"),
            ("STUDY_BUDDY_MODEL", "gemini-2.5-flash"),
            ("STUDY_BUDDY_MAX_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "proj");
        assert_eq!(config.location, "europe-west4");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.retry_config.max_retries, 0);
        match config.credentials {
            Credentials::AccessToken(token) => assert_eq!(token.expose_secret(), "ya29.token"),
            other => panic!("expected access token, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_treats_empty_values_as_unset() {
        let result = StudyBuddyConfig::from_lookup(lookup(&[
            ("GOOGLE_PROJECT_ID", ""),
            ("GOOGLE_API_KEY", "key"),
        ]));
        assert_eq!(result.unwrap_err(), ConfigurationError::MissingProjectId);
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = StudyBuddyConfig::from_lookup(lookup(&[
            ("GOOGLE_PROJECT_ID", "p"),
            ("GOOGLE_API_KEY", "key"),
            ("STUDY_BUDDY_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(ConfigurationError::InvalidConfiguration { .. })));
    }
}
