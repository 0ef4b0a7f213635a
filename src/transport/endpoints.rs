//! Endpoint path builders for the Vertex AI generative model API.
//!
//! Paths are relative to the API version prefix; the [`RequestBuilder`]
//! joins them with the base URL and version.
//!
//! [`RequestBuilder`]: super::RequestBuilder

/// Location that is served by the global (non-regional) endpoint.
pub const GLOBAL_LOCATION: &str = "global";

/// Constructs the resource path of a Google publisher model.
///
/// # Example
///
/// ```
/// use study_buddy::transport::endpoints;
///
/// let path = endpoints::publisher_model("my-project", "us-central1", "gemini-2.5-pro");
/// assert_eq!(
///     path,
///     "/projects/my-project/locations/us-central1/publishers/google/models/gemini-2.5-pro"
/// );
/// ```
pub fn publisher_model(project: &str, location: &str, model: &str) -> String {
    format!(
        "/projects/{}/locations/{}/publishers/google/models/{}",
        project, location, model
    )
}

/// Constructs a path for the generateContent endpoint.
pub fn generate_content(project: &str, location: &str, model: &str) -> String {
    format!("{}:generateContent", publisher_model(project, location, model))
}

/// Constructs a path for the streamGenerateContent endpoint.
///
/// Without `alt=sse` the response body is a JSON array whose elements arrive
/// incrementally.
pub fn stream_generate_content(project: &str, location: &str, model: &str) -> String {
    format!("{}:streamGenerateContent", publisher_model(project, location, model))
}

/// Returns the service base URL for a location.
///
/// # Example
///
/// ```
/// use study_buddy::transport::endpoints;
///
/// assert_eq!(endpoints::base_url_for_location("global"), "https://aiplatform.googleapis.com");
/// assert_eq!(
///     endpoints::base_url_for_location("europe-west4"),
///     "https://europe-west4-aiplatform.googleapis.com"
/// );
/// ```
pub fn base_url_for_location(location: &str) -> String {
    if location == GLOBAL_LOCATION {
        "https://aiplatform.googleapis.com".to_string()
    } else {
        format!("https://{}-aiplatform.googleapis.com", location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_path() {
        assert_eq!(
            generate_content("p", "global", "gemini-2.5-pro"),
            "/projects/p/locations/global/publishers/google/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_stream_generate_content_path() {
        assert!(stream_generate_content("p", "us-east1", "m")
            .ends_with("/locations/us-east1/publishers/google/models/m:streamGenerateContent"));
    }

    #[test]
    fn test_regional_base_url() {
        assert_eq!(base_url_for_location("us-central1"), "https://us-central1-aiplatform.googleapis.com");
    }
}
