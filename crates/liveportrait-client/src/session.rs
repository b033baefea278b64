//! Upload session state machine.
//!
//! A session holds two input slots (portrait and driving video), at most one
//! result and at most one error message. Generation is single-flight: a
//! second trigger while a request is outstanding is rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};

use liveportrait_models::{Credential, GenerationResult, MediaPayload};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::credential::CredentialStore;
use crate::error::ClientResult;
use crate::media::MediaSource;
use crate::transport::{ProxyTransport, Submission};

/// The four user-visible pieces of session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploaderState {
    pub image: Option<MediaSource>,
    pub video: Option<MediaSource>,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

/// What the session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Processing,
    Success,
    Error,
}

/// Result of a generation trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A slot was empty; nothing was sent and nothing changed.
    Skipped,
    /// Another generation is still outstanding.
    Busy,
    /// The proxy returned a video.
    Completed(GenerationResult),
    /// The attempt failed with this message. Inputs are kept for a retry.
    Failed(String),
    /// The session was reset while the request was outstanding.
    Discarded,
}

#[derive(Debug, Default)]
struct Inner {
    state: UploaderState,
    credential: Option<Credential>,
    /// Bumped by `reset` so a late completion can tell it is stale.
    epoch: u64,
}

/// One user's upload session.
pub struct Uploader<T, S> {
    transport: T,
    store: S,
    inner: Mutex<Inner>,
    /// Only set while holding `inner`; cleared by [`InFlight`] on drop.
    in_flight: AtomicBool,
}

/// Holds the single-flight marker for one attempt.
///
/// Released on every exit path, including when the `generate` future is
/// dropped before the response arrives.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T, S> Uploader<T, S>
where
    T: ProxyTransport,
    S: CredentialStore,
{
    /// Start a session, loading the saved credential once.
    pub fn new(transport: T, store: S) -> Self {
        let credential = match store.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Failed to load saved credential: {}", e);
                None
            }
        };

        Self {
            transport,
            store,
            inner: Mutex::new(Inner {
                credential,
                ..Inner::default()
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Replace the credential and persist it. Blank input clears it.
    pub async fn set_credential(&self, raw: &str) -> ClientResult<()> {
        let credential = Credential::parse(raw);
        self.store.save(credential.as_ref())?;
        self.inner.lock().await.credential = credential;
        Ok(())
    }

    /// Replace the credential for this session only, without saving it.
    pub async fn use_credential(&self, raw: &str) {
        self.inner.lock().await.credential = Credential::parse(raw);
    }

    /// Credential that will accompany the next submission.
    pub async fn credential(&self) -> Option<Credential> {
        self.inner.lock().await.credential.clone()
    }

    pub async fn select_image(&self, source: MediaSource) {
        debug!(image = %source.describe(), "Image selected");
        self.inner.lock().await.state.image = Some(source);
    }

    pub async fn select_video(&self, source: MediaSource) {
        debug!(video = %source.describe(), "Video selected");
        self.inner.lock().await.state.video = Some(source);
    }

    /// Run one generation attempt.
    pub async fn generate(&self) -> GenerateOutcome {
        let (image, video, credential, epoch, in_flight) = {
            let mut inner = self.inner.lock().await;

            let (Some(image), Some(video)) =
                (inner.state.image.clone(), inner.state.video.clone())
            else {
                debug!("Generation skipped, both inputs are required");
                return GenerateOutcome::Skipped;
            };

            if self.in_flight.swap(true, Ordering::AcqRel) {
                debug!("Generation already in flight");
                return GenerateOutcome::Busy;
            }
            let in_flight = InFlight(&self.in_flight);

            inner.state.result = None;
            inner.state.error = None;
            (image, video, inner.credential.clone(), inner.epoch, in_flight)
        };

        info!(image = %image.describe(), video = %video.describe(), "Generation started");
        let attempt = self.attempt(image, video, credential).await;

        let mut inner = self.inner.lock().await;
        drop(in_flight);

        if inner.epoch != epoch {
            info!("Session was reset during generation, discarding response");
            return GenerateOutcome::Discarded;
        }

        match attempt {
            Ok(result) => {
                info!("Generation completed");
                inner.state.result = Some(result.clone());
                GenerateOutcome::Completed(result)
            }
            Err(e) => {
                let message = e.display_message();
                warn!(error = %message, "Generation failed");
                inner.state.error = Some(message.clone());
                GenerateOutcome::Failed(message)
            }
        }
    }

    async fn attempt(
        &self,
        image: MediaSource,
        video: MediaSource,
        credential: Option<Credential>,
    ) -> ClientResult<GenerationResult> {
        let source_image = self.resolve(image).await?;
        let driving_video = self.resolve(video).await?;

        self.transport
            .submit(Submission {
                source_image,
                driving_video,
                credential,
            })
            .await
    }

    async fn resolve(&self, source: MediaSource) -> ClientResult<MediaPayload> {
        match source {
            MediaSource::Uploaded(payload) => Ok(payload),
            MediaSource::Example(asset) => self.transport.fetch_asset(asset.src).await,
        }
    }

    /// Clear image, video, result and error.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = UploaderState::default();
        inner.epoch += 1;
        debug!("Session reset");
    }

    pub async fn phase(&self) -> Phase {
        let inner = self.inner.lock().await;
        if self.in_flight.load(Ordering::Acquire) {
            Phase::Processing
        } else if inner.state.result.is_some() {
            Phase::Success
        } else if inner.state.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    pub async fn snapshot(&self) -> UploaderState {
        self.inner.lock().await.state.clone()
    }
}
