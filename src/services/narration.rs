use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client as HttpClient;
use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};

/// File name for the synthesized recommendation audio
const NARRATION_FILE: &str = "recommendation.mp3";

/// Text-to-speech backend abstraction
///
/// Narration is best-effort: the only contract is "given text, receive a
/// playable audio resource". Implementations must not be relied on for the
/// primary recommendation response.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Synthesizes speech for the given text, returning encoded audio bytes
    async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Text-to-speech over a translate-style HTTP endpoint
///
/// Sends the text as a query parameter and expects raw mp3 bytes back.
/// No timeout or retry is enforced here; the caller treats every failure
/// as skippable.
pub struct HttpTtsProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpTtsProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl NarrationProvider for HttpTtsProvider {
    async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", "en"), ("q", text)])
            .send()
            .await
            .map_err(|e| AppError::Narration(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Narration(format!(
                "TTS endpoint returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Narration(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "http-tts"
    }
}

/// Fire-and-forget narration worker
///
/// Requests are queued to a background task so synthesis never blocks the
/// HTTP response path. Failures are logged and swallowed; there is no
/// feedback channel to the caller.
#[derive(Clone)]
pub struct Narrator {
    tx: mpsc::UnboundedSender<String>,
}

impl Narrator {
    /// Spawns the narration worker writing audio under `output_dir`
    pub fn new(provider: Arc<dyn NarrationProvider>, output_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            Self::narration_task(provider, output_dir, rx).await;
        });
        Self { tx }
    }

    /// Queues narration for the given text without waiting on the result
    pub fn narrate_in_background(&self, text: String) {
        if let Err(e) = self.tx.send(text) {
            tracing::warn!(error = %e, "Narration worker is gone, skipping narration");
        }
    }

    async fn narration_task(
        provider: Arc<dyn NarrationProvider>,
        output_dir: PathBuf,
        mut rx: mpsc::UnboundedReceiver<String>,
    ) {
        tracing::info!(provider = provider.name(), "Narration worker started");

        while let Some(text) = rx.recv().await {
            if let Err(e) = Self::narrate(provider.as_ref(), &output_dir, &text).await {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Narration failed, recommendation already served"
                );
            }
        }

        tracing::info!("Narration worker stopped");
    }

    async fn narrate(
        provider: &dyn NarrationProvider,
        output_dir: &PathBuf,
        text: &str,
    ) -> AppResult<()> {
        let audio = provider.synthesize(text).await?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| AppError::Narration(e.to_string()))?;
        let path = output_dir.join(NARRATION_FILE);
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| AppError::Narration(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Wrote narration audio");
        Ok(())
    }
}
