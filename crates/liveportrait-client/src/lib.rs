//! Client uploader for the LivePortrait proxy.
//!
//! This crate provides:
//! - The upload session: two media slots, one result, one error
//! - Explicit single-flight generation against the proxy
//! - A persisted credential store loaded once and saved on every edit
//! - The HTTP transport to the proxy's generate endpoint

pub mod credential;
pub mod error;
pub mod media;
pub mod session;
pub mod transport;

pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore, CREDENTIAL_STORAGE_KEY};
pub use error::{ClientError, ClientResult};
pub use media::{load_media_file, MediaSource};
pub use session::{GenerateOutcome, Phase, Uploader, UploaderState};
pub use transport::{HttpProxyTransport, ProxyTransport, Submission};
