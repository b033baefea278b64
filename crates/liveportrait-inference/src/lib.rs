//! Client for the hosted LivePortrait inference model.
//!
//! This crate forwards a source image and a driving video to the external
//! inference endpoint as a multipart request and returns the generated video
//! bytes. The [`InferenceBackend`] trait is the seam the proxy depends on, so
//! the outbound transport can be replaced in tests.

pub mod client;
pub mod error;
pub mod types;

pub use client::{InferenceBackend, InferenceClient, InferenceClientConfig, DEFAULT_INFERENCE_URL};
pub use error::{InferenceError, InferenceResult};
pub use types::AnimateRequest;
