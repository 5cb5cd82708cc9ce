//! Edge read-aloud backend: free streaming synthesis with word-boundary
//! events.

use super::SpeechBackend;
use super::wire::{self, SpeechStream, WsSpeechStream};
use crate::config::EdgeConfig;
use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

const EDGE_ENDPOINT: &str = "wss://speech.platform.bing.com/consumer/speech/synthesize/\
                             readaloud/edge/v1?TrustedClientToken=6A5AA1D4EAFF4E9FB37E23D68491D6F4";

/// Convert a rate multiplier (1.0 = unchanged) to the signed percentage
/// string the streaming endpoint expects. Non-negative values carry an
/// explicit `+`.
pub fn rate_to_percent(rate: f32) -> String {
    let percent = ((rate - 1.0) * 100.0).round() as i32;
    if percent >= 0 {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}

pub struct EdgeSynthesizer {
    voice: String,
    rate: String,
    transport: Arc<dyn SpeechStream>,
}

impl EdgeSynthesizer {
    pub fn new(voice: &str, rate: f32, config: &EdgeConfig) -> Self {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| EDGE_ENDPOINT.to_string());
        Self {
            voice: voice.to_string(),
            rate: rate_to_percent(rate),
            transport: Arc::new(WsSpeechStream::new(endpoint, None)),
        }
    }

    /// Substitute the session transport (used by tests).
    pub fn with_transport(mut self, transport: Arc<dyn SpeechStream>) -> Self {
        self.transport = transport;
        self
    }
}

#[async_trait]
impl SpeechBackend for EdgeSynthesizer {
    fn name(&self) -> &'static str {
        "edge"
    }

    async fn attempt(&self, text: &str, audio_path: &Path) -> Result<FragmentStream> {
        let ssml = wire::build_ssml(text, &self.voice, &self.rate);
        let stream =
            wire::collect_session(Arc::clone(&self.transport), ssml, audio_path).await?;

        // A completed stream with no word boundaries produced no usable
        // timing; treat it as a failure so the attempt is retried.
        if stream.is_empty() {
            let _ = tokio::fs::remove_file(audio_path).await;
            return Err(TtsError::Synthesis {
                message: "stream completed but produced no fragments".to_string(),
            });
        }
        Ok(stream)
    }
}
