//! Application state.

use std::sync::Arc;

use liveportrait_inference::{InferenceBackend, InferenceClient, InferenceResult};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Nothing in here is mutated after startup; requests share no state
/// beyond the outbound client.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub inference: Arc<dyn InferenceBackend>,
}

impl AppState {
    /// Create new application state with the HTTP inference client.
    pub fn new(config: ApiConfig) -> InferenceResult<Self> {
        let client = InferenceClient::new(config.inference.clone())?;
        Ok(Self::with_backend(config, Arc::new(client)))
    }

    /// Create state around an existing backend.
    pub fn with_backend(config: ApiConfig, inference: Arc<dyn InferenceBackend>) -> Self {
        Self { config, inference }
    }
}
