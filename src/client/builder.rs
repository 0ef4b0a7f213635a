//! Builder for the Vertex AI client.

use std::sync::Arc;

use super::vertex::VertexGenerationClient;
use crate::config::StudyBuddyConfig;
use crate::error::ConfigurationError;
use crate::observability::{Logger, StructuredLogger};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Builder for a [`VertexGenerationClient`].
///
/// # Example
///
/// ```no_run
/// use study_buddy::client::VertexClientBuilder;
/// use study_buddy::config::StudyBuddyConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StudyBuddyConfig::from_env()?;
/// let client = VertexClientBuilder::new(config).build()?;
/// # Ok(())
/// # }
/// ```
pub struct VertexClientBuilder {
    config: StudyBuddyConfig,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Option<Arc<dyn Logger>>,
}

impl VertexClientBuilder {
    /// Creates a builder from a validated configuration.
    pub fn new(config: StudyBuddyConfig) -> Self {
        Self {
            config,
            transport: None,
            logger: None,
        }
    }

    /// Sets a custom HTTP transport (for testing).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ClientInit`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<VertexGenerationClient, ConfigurationError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let transport = ReqwestTransport::new(self.config.timeout, self.config.connect_timeout)
                    .map_err(|e| ConfigurationError::ClientInit { message: e.to_string() })?;
                Arc::new(transport)
            }
        };

        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(StructuredLogger::new("study_buddy.vertex")));

        Ok(VertexGenerationClient::new(&self.config, transport, logger))
    }
}
