//! Turning an endpoint path and a JSON body into an authenticated request.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::http::{HttpMethod, HttpRequest};
use crate::auth::AuthManager;
use crate::error::StudyBuddyError;

const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// Resolves endpoint paths against the configured host and API version and
/// attaches credentials.
///
/// Cheap to clone; the auth manager is shared.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    api_version: String,
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a builder for `base_url` and `api_version` (for example `v1`).
    pub fn new(base_url: Url, api_version: String, auth_manager: Arc<dyn AuthManager>) -> Self {
        Self {
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// `{base_url}/{api_version}/{path}`; a leading `/` on `path` is ignored.
    ///
    /// ```
    /// # use study_buddy::transport::RequestBuilder;
    /// # use study_buddy::auth::ApiKeyAuthManager;
    /// # use secrecy::SecretString;
    /// # use std::sync::Arc;
    /// # use url::Url;
    /// let builder = RequestBuilder::new(
    ///     Url::parse("https://aiplatform.googleapis.com").unwrap(),
    ///     "v1".to_string(),
    ///     Arc::new(ApiKeyAuthManager::new(SecretString::new("key".into()))),
    /// );
    /// let url = builder.build_url("/projects/p/locations/global").unwrap();
    /// assert_eq!(url.as_str(), "https://aiplatform.googleapis.com/v1/projects/p/locations/global");
    /// ```
    pub fn build_url(&self, path: &str) -> Result<Url, StudyBuddyError> {
        let relative = format!("{}/{}", self.api_version, path.trim_start_matches('/'));
        Ok(self.base_url.join(&relative)?)
    }

    /// Builds a request for `path`.
    ///
    /// A body is serialized as JSON and marks the request as such. The auth
    /// header is always attached; `extra_headers` are applied last and win.
    pub fn build_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<HttpRequest, StudyBuddyError> {
        let url = self.build_url(path)?;
        let body = body.map(serde_json::to_vec).transpose()?.map(Bytes::from);

        let mut headers: HashMap<String, String> = self.auth_manager.get_auth_header().into_iter().collect();
        if body.is_some() {
            headers.insert(CONTENT_TYPE.to_string(), JSON.to_string());
        }
        headers.extend(extra_headers.unwrap_or_default());

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }
}
