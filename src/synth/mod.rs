//! Speech backend adapters and the synthesis entry point.
//!
//! Each backend implements [`SpeechBackend`]; dispatch happens once, via
//! the parsed [`VoiceSelection`]. The public [`synthesize`] entry never
//! propagates errors: every failure path is logged and collapsed to
//! `None` so callers treat synthesis failure uniformly across backends.

pub mod azure;
pub mod edge;
pub mod gemini;
pub mod siliconflow;
pub mod wire;

pub use azure::AzureSynthesizer;
pub use edge::EdgeSynthesizer;
pub use gemini::GeminiSynthesizer;
pub use siliconflow::SiliconFlowSynthesizer;

use crate::config::Config;
use crate::defaults::MAX_ATTEMPTS;
use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use crate::voice::VoiceSelection;
use async_trait::async_trait;
use log::{error, info};
use std::path::Path;

/// One speech synthesis backend.
///
/// Implementations perform a single attempt in [`attempt`]; the provided
/// [`synthesize`] wrapper adds the bounded sequential retry policy shared
/// by every backend. Credential and identifier validation belongs in the
/// adapter constructors so those failures are never retried.
///
/// [`attempt`]: SpeechBackend::attempt
/// [`synthesize`]: SpeechBackend::synthesize
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run one synthesis attempt, writing audio to `audio_path` and
    /// returning the timed fragments.
    async fn attempt(&self, text: &str, audio_path: &Path) -> Result<FragmentStream>;

    /// Synthesize with up to [`MAX_ATTEMPTS`] sequential attempts.
    /// Transient failures are logged and retried immediately; anything
    /// else aborts.
    async fn synthesize(&self, text: &str, audio_path: &Path) -> Result<FragmentStream> {
        let mut last_error: Option<TtsError> = None;
        for attempt in 1..=MAX_ATTEMPTS {
            info!(
                "{} synthesis attempt {}/{}",
                self.name(),
                attempt,
                MAX_ATTEMPTS
            );
            match self.attempt(text, audio_path).await {
                Ok(stream) => return Ok(stream),
                Err(e) if e.is_transient() => {
                    error!("{} attempt {} failed: {}", self.name(), attempt, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or(TtsError::Synthesis {
            message: "all synthesis attempts failed".to_string(),
        }))
    }
}

/// Build the adapter for a parsed voice selection.
pub fn build_backend(
    selection: VoiceSelection,
    rate: f32,
    volume: f32,
    config: &Config,
) -> Result<Box<dyn SpeechBackend>> {
    match selection {
        VoiceSelection::Edge { voice } => {
            Ok(Box::new(EdgeSynthesizer::new(&voice, rate, &config.edge)))
        }
        VoiceSelection::AzureV2 { voice } => {
            Ok(Box::new(AzureSynthesizer::new(&voice, &config.azure)?))
        }
        VoiceSelection::Gemini { voice } => {
            Ok(Box::new(GeminiSynthesizer::new(&voice, &config.gemini)?))
        }
        VoiceSelection::SiliconFlow { model, voice } => Ok(Box::new(
            SiliconFlowSynthesizer::new(model, voice, rate, volume, &config.siliconflow)?,
        )),
    }
}

/// Synthesize `text` with the voice identified by `voice_name`, writing
/// audio to `audio_path`.
///
/// Returns the timed fragment stream, or `None` when synthesis failed for
/// any reason (bad identifier, missing credentials, retries exhausted).
/// The failure is logged; no audio is usable when `None` is returned.
pub async fn synthesize(
    config: &Config,
    text: &str,
    voice_name: &str,
    rate: f32,
    volume: f32,
    audio_path: &Path,
) -> Option<FragmentStream> {
    let text = text.trim();

    let selection = match VoiceSelection::parse(voice_name) {
        Ok(selection) => selection,
        Err(e) => {
            error!("cannot dispatch voice {}: {}", voice_name, e);
            return None;
        }
    };

    let backend = match build_backend(selection, rate, volume, config) {
        Ok(backend) => backend,
        Err(e) => {
            error!("cannot build backend for voice {}: {}", voice_name, e);
            return None;
        }
    };

    match backend.synthesize(text, audio_path).await {
        Ok(stream) => {
            info!(
                "{} synthesis completed: {}",
                backend.name(),
                audio_path.display()
            );
            Some(stream)
        }
        Err(e) => {
            error!("{} synthesis failed: {}", backend.name(), e);
            None
        }
    }
}
