//! Authentication for Vertex AI requests.

use crate::config::Credentials;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Supplies the authentication header for outbound requests.
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    fn get_auth_header(&self) -> Option<(String, String)>;
}

/// OAuth2 bearer-token authentication.
pub struct BearerTokenAuthManager {
    token: SecretString,
}

impl BearerTokenAuthManager {
    /// Create a new bearer-token auth manager.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl AuthManager for BearerTokenAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        Some((
            "Authorization".to_string(),
            format!("Bearer {}", self.token.expose_secret()),
        ))
    }
}

/// API key authentication via the `x-goog-api-key` header.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        Some((
            "x-goog-api-key".to_string(),
            self.api_key.expose_secret().to_string(),
        ))
    }
}

/// Create the auth manager matching the configured credentials.
pub fn from_credentials(credentials: &Credentials) -> Arc<dyn AuthManager> {
    match credentials {
        Credentials::AccessToken(token) => Arc::new(BearerTokenAuthManager::new(token.clone())),
        Credentials::ApiKey(key) => Arc::new(ApiKeyAuthManager::new(key.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_header() {
        let manager = ApiKeyAuthManager::new(SecretString::new("test-key".into()));

        let (name, value) = manager.get_auth_header().unwrap();
        assert_eq!(name, "x-goog-api-key");
        assert_eq!(value, "test-key");
    }

    #[test]
    fn test_bearer_header() {
        let manager = BearerTokenAuthManager::new(SecretString::new("ya29.abc".into()));

        let (name, value) = manager.get_auth_header().unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer ya29.abc");
    }

    #[test]
    fn test_from_credentials_selects_manager() {
        let manager = from_credentials(&Credentials::AccessToken(SecretString::new("t".into())));
        assert_eq!(manager.get_auth_header().unwrap().0, "Authorization");

        let manager = from_credentials(&Credentials::ApiKey(SecretString::new("k".into())));
        assert_eq!(manager.get_auth_header().unwrap().0, "x-goog-api-key");
    }
}
