//! SiliconFlow hosted CosyVoice backend.
//!
//! One blocking request per attempt; the service returns the finished
//! audio with no timing information, so per-sentence timing is
//! reconstructed from the written file's measured duration, allocated by
//! character-count share. That allocation is a coarse approximation (no
//! punctuation pauses, no per-script speech-rate differences) and is kept
//! as-is; downstream consumers compensate for its bias.

use super::SpeechBackend;
use crate::audio;
use crate::config::SiliconFlowConfig;
use crate::defaults::{FALLBACK_DURATION_TICKS, SILICONFLOW_SAMPLE_RATE};
use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use crate::split;
use async_trait::async_trait;
use log::warn;
use std::path::Path;

/// Convert the application-level volume multiplier ([0.6, 5.0], 1.0 =
/// unchanged) to the service's gain range of [-10, 10].
pub fn volume_to_gain(volume: f32) -> f32 {
    (volume - 1.0).clamp(-10.0, 10.0)
}

pub struct SiliconFlowSynthesizer {
    model: String,
    voice: String,
    rate: f32,
    gain: f32,
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl SiliconFlowSynthesizer {
    /// Build the adapter, failing fast (no retry) when the API key is
    /// absent.
    pub fn new(
        model: String,
        voice: String,
        rate: f32,
        volume: f32,
        config: &SiliconFlowConfig,
    ) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(TtsError::MissingCredential {
                backend: "siliconflow",
                key: "api_key",
            });
        }
        Ok(Self {
            model,
            voice,
            rate,
            gain: volume_to_gain(volume),
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl SpeechBackend for SiliconFlowSynthesizer {
    fn name(&self) -> &'static str {
        "siliconflow"
    }

    async fn attempt(&self, text: &str, audio_path: &Path) -> Result<FragmentStream> {
        let payload = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": format!("{}:{}", self.model, self.voice),
            "response_format": "wav",
            "sample_rate": SILICONFLOW_SAMPLE_RATE,
            "stream": false,
            "speed": self.rate,
            "gain": self.gain,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TtsError::Synthesis {
                message: format!("siliconflow request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis {
                message: format!("siliconflow returned status {}: {}", status, body),
            });
        }

        let bytes = response.bytes().await.map_err(|e| TtsError::Synthesis {
            message: format!("failed to read siliconflow response: {}", e),
        })?;
        tokio::fs::write(audio_path, &bytes).await?;

        let measured = match audio::wav_duration_ticks(audio_path) {
            Ok(ticks) => Some(ticks),
            Err(e) => {
                warn!("could not measure siliconflow output duration: {}", e);
                None
            }
        };
        Ok(reconstruct_timing(text, measured))
    }
}

/// Approximate per-sentence timing for audio with no timing metadata.
///
/// Ordered fallbacks, first success wins: proportional per-sentence
/// allocation over the measured duration; one fragment spanning the
/// measured duration; one fragment spanning a one-second placeholder.
fn reconstruct_timing(text: &str, measured_ticks: Option<u64>) -> FragmentStream {
    if let Some(total) = measured_ticks
        && let Some(stream) = proportional_fragments(text, total)
    {
        return stream;
    }

    let mut stream = FragmentStream::new();
    stream.push(
        text,
        0,
        measured_ticks.unwrap_or(FALLBACK_DURATION_TICKS),
    );
    stream
}

/// Allocate each sentence a duration proportional to its character-count
/// share of the total, with cumulative offsets. Returns `None` when the
/// text yields no sentences to allocate over.
fn proportional_fragments(text: &str, total_ticks: u64) -> Option<FragmentStream> {
    let sentences = split::split_by_punctuation(text);
    let total_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    if sentences.is_empty() || total_chars == 0 {
        return None;
    }

    let mut stream = FragmentStream::new();
    let mut offset = 0u64;
    for sentence in &sentences {
        let chars = sentence.chars().count() as u64;
        let duration = total_ticks * chars / total_chars as u64;
        stream.push(sentence.clone(), offset, offset + duration);
        offset += duration;
    }
    Some(stream)
}
