//! Gemini generative-audio backend.
//!
//! One blocking request per attempt. The response carries the audio inline
//! as base64 (sometimes wrapped in a data URI); raw `audio/L16` PCM is put
//! in a WAV container before writing, anything else is written verbatim.
//! The backend has no word timing, so the result is a single fragment
//! spanning the whole text.

use super::SpeechBackend;
use crate::audio;
use crate::config::GeminiConfig;
use crate::defaults::PCM_SAMPLE_WIDTH;
use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::Path;

pub struct GeminiSynthesizer {
    voice: String,
    model: String,
    api_key: String,
    api_url: String,
    sample_rate: u32,
    channels: u16,
    client: reqwest::Client,
}

impl GeminiSynthesizer {
    /// Build the adapter, failing fast (no retry) when the API key is
    /// absent.
    pub fn new(voice: &str, config: &GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(TtsError::MissingCredential {
                backend: "gemini",
                key: "api_key",
            });
        }
        Ok(Self {
            voice: voice.to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            sample_rate: config.sample_rate,
            channels: config.channels,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl SpeechBackend for GeminiSynthesizer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn attempt(&self, text: &str, audio_path: &Path) -> Result<FragmentStream> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );
        let payload = serde_json::json!({
            "contents": [{"parts": [{"text": text}]}],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": {"voiceName": self.voice}
                    }
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TtsError::Synthesis {
                message: format!("gemini request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis {
                message: format!("gemini returned status {}: {}", status, body),
            });
        }

        let body: serde_json::Value =
            response.json().await.map_err(|e| TtsError::Synthesis {
                message: format!("failed to parse gemini response: {}", e),
            })?;

        let part = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("inlineData"))
            .ok_or_else(|| TtsError::Synthesis {
                message: "gemini response carried no inline audio".to_string(),
            })?;

        let mime_type = part
            .get("mimeType")
            .and_then(|m| m.as_str())
            .unwrap_or("audio/L16")
            .to_lowercase();
        let data = part
            .get("data")
            .and_then(|d| d.as_str())
            .ok_or_else(|| TtsError::Synthesis {
                message: "gemini response carried no audio data".to_string(),
            })?;
        let audio_bytes = unwrap_audio_payload(data)?;

        let mut stream = FragmentStream::new();
        if mime_type.starts_with("audio/l16") {
            // Raw 16-bit PCM: wrap in a WAV container and derive the
            // duration from the byte length.
            audio::write_pcm_wav(audio_path, &audio_bytes, self.sample_rate, self.channels)?;
            let duration = audio::pcm_duration_ticks(
                audio_bytes.len(),
                self.sample_rate,
                self.channels,
                PCM_SAMPLE_WIDTH,
            );
            stream.push(text, 0, duration);
        } else {
            // Already containerized (mpeg, wav, ...): write verbatim. The
            // duration stays zero (unknown); downstream tolerates it.
            tokio::fs::write(audio_path, &audio_bytes).await?;
            stream.push(text, 0, 0);
        }
        Ok(stream)
    }
}

/// Unwrap a base64 audio payload, tolerating a `data:` URI envelope.
fn unwrap_audio_payload(data: &str) -> Result<Vec<u8>> {
    let encoded = if data.starts_with("data:") {
        data.rsplit_once(',').map(|(_, b64)| b64).unwrap_or(data)
    } else {
        data
    };
    BASE64
        .decode(encoded.trim())
        .map_err(|e| TtsError::Synthesis {
            message: format!("gemini audio payload is not valid base64: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails_fast() {
        let config = GeminiConfig {
            api_key: String::new(),
            ..Default::default()
        };
        let result = GeminiSynthesizer::new("Zephyr", &config);
        match result {
            Err(e @ TtsError::MissingCredential { .. }) => assert!(!e.is_transient()),
            other => panic!("expected MissingCredential, got {:?}", other.err()),
        }
    }

    #[test]
    fn bare_base64_payload_unwraps() {
        let bytes = unwrap_audio_payload(&BASE64.encode([1u8, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn data_uri_payload_unwraps() {
        let encoded = format!("data:audio/l16;base64,{}", BASE64.encode([9u8, 8]));
        assert_eq!(unwrap_audio_payload(&encoded).unwrap(), vec![9, 8]);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let result = unwrap_audio_payload("not base64 at all!!!");
        assert!(matches!(result, Err(TtsError::Synthesis { .. })));
    }

    #[test]
    fn adapter_reports_backend_name() {
        let config = GeminiConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        let adapter = GeminiSynthesizer::new("Puck", &config).unwrap();
        assert_eq!(adapter.name(), "gemini");
    }
}
