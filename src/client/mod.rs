//! Generation client boundary and its Vertex AI adapter.

mod builder;
mod safety;
mod traits;
mod validation;
mod vertex;

pub use builder::VertexClientBuilder;
pub use safety::check_safety_blocks;
pub use traits::{FragmentStream, GenerationClient};
pub use validation::validate_generate_request;
pub use vertex::VertexGenerationClient;

use std::sync::Arc;

use crate::config::StudyBuddyConfig;
use crate::error::ConfigurationError;

/// A usable client, or the reason none could be built.
///
/// Computed once at startup and checked before every use.
pub type ClientHandle = Result<Arc<dyn GenerationClient>, ConfigurationError>;

/// Builds the client handle for `config`.
pub fn connect(config: StudyBuddyConfig) -> ClientHandle {
    let project_id = config.project_id.clone();
    let location = config.location.clone();
    let model = config.model.clone();

    match VertexClientBuilder::new(config).build() {
        Ok(client) => {
            tracing::info!(
                project_id = %project_id,
                location = %location,
                model = %model,
                "Generation client initialised"
            );
            Ok(Arc::new(client))
        }
        Err(error) => {
            tracing::error!(error = %error, "Failed to initialise generation client");
            Err(error)
        }
    }
}

/// Builds the client handle from the process environment.
///
/// A configuration problem is returned in the handle rather than aborting,
/// so the server can still start and report it per request.
pub fn connect_from_env() -> ClientHandle {
    match StudyBuddyConfig::from_env() {
        Ok(config) => connect(config),
        Err(error) => {
            tracing::error!(error = %error, "Generation client configuration is incomplete");
            Err(error)
        }
    }
}
