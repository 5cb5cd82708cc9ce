//! Azure Cognitive Services speech backend.
//!
//! Uses the same session machinery as the Edge backend but authenticates
//! with a subscription key against the caller's region endpoint. Word
//! boundaries are pushed by the service during synthesis; the call blocks
//! until the turn ends or the session is cancelled. A cancelled session is
//! logged and retried like any other transient failure.

use super::SpeechBackend;
use super::wire::{self, SpeechStream, WsSpeechStream};
use crate::config::AzureConfig;
use crate::error::{Result, TtsError};
use crate::fragment::FragmentStream;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub struct AzureSynthesizer {
    voice: String,
    transport: Arc<dyn SpeechStream>,
}

impl AzureSynthesizer {
    /// Build the adapter, failing fast (no retry) when either secret is
    /// absent.
    pub fn new(voice: &str, config: &AzureConfig) -> Result<Self> {
        if config.speech_key.is_empty() {
            return Err(TtsError::MissingCredential {
                backend: "azure",
                key: "speech_key",
            });
        }
        if config.speech_region.is_empty() {
            return Err(TtsError::MissingCredential {
                backend: "azure",
                key: "speech_region",
            });
        }

        let endpoint = config.endpoint.clone().unwrap_or_else(|| {
            format!(
                "wss://{}.tts.speech.microsoft.com/cognitiveservices/websocket/v1",
                config.speech_region
            )
        });
        Ok(Self {
            voice: voice.to_string(),
            transport: Arc::new(WsSpeechStream::new(
                endpoint,
                Some(config.speech_key.clone()),
            )),
        })
    }

    /// Substitute the session transport (used by tests).
    pub fn with_transport(mut self, transport: Arc<dyn SpeechStream>) -> Self {
        self.transport = transport;
        self
    }
}

#[async_trait]
impl SpeechBackend for AzureSynthesizer {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn attempt(&self, text: &str, audio_path: &Path) -> Result<FragmentStream> {
        let ssml = wire::build_ssml(text, &self.voice, "+0%");
        wire::collect_session(Arc::clone(&self.transport), ssml, audio_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::wire::SpeechEvent;
    use tokio::sync::mpsc;

    fn config_with(key: &str, region: &str) -> AzureConfig {
        AzureConfig {
            speech_key: key.to_string(),
            speech_region: region.to_string(),
            endpoint: None,
        }
    }

    #[test]
    fn missing_key_fails_fast() {
        let result = AzureSynthesizer::new("voice", &config_with("", "eastus"));
        match result {
            Err(e @ TtsError::MissingCredential { key, .. }) => {
                assert_eq!(key, "speech_key");
                assert!(!e.is_transient());
            }
            other => panic!("expected MissingCredential, got {:?}", other.err()),
        }
    }

    #[test]
    fn missing_region_fails_fast() {
        let result = AzureSynthesizer::new("voice", &config_with("key", ""));
        assert!(matches!(
            result,
            Err(TtsError::MissingCredential {
                key: "speech_region",
                ..
            })
        ));
    }

    #[test]
    fn valid_config_builds_adapter() {
        let adapter =
            AzureSynthesizer::new("zh-CN-XiaoxiaoMultilingualNeural", &config_with("k", "eastus"))
                .unwrap();
        assert_eq!(adapter.name(), "azure");
    }

    struct CancelledStream;

    #[async_trait]
    impl SpeechStream for CancelledStream {
        async fn run(
            &self,
            _ssml: String,
            _events: mpsc::Sender<SpeechEvent>,
        ) -> Result<()> {
            Err(TtsError::Synthesis {
                message: "synthesis canceled: authentication failure".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn cancellation_is_retry_eligible_not_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("azure.mp3");

        let adapter = AzureSynthesizer::new("voice", &config_with("k", "eastus"))
            .unwrap()
            .with_transport(Arc::new(CancelledStream));

        let result = adapter.attempt("text", &path).await;
        match result {
            Err(e @ TtsError::Synthesis { .. }) => assert!(e.is_transient()),
            other => panic!("expected Synthesis error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn push_based_boundaries_accumulate_in_order() {
        struct PushStream;

        #[async_trait]
        impl SpeechStream for PushStream {
            async fn run(
                &self,
                _ssml: String,
                events: mpsc::Sender<SpeechEvent>,
            ) -> Result<()> {
                for (text, offset) in [("床前", 0u64), ("明月光", 6_000_000)] {
                    let _ = events
                        .send(SpeechEvent::WordBoundary {
                            text: text.to_string(),
                            offset,
                            duration: 5_000_000,
                        })
                        .await;
                }
                let _ = events.send(SpeechEvent::Audio(vec![0u8; 16])).await;
                let _ = events.send(SpeechEvent::TurnEnd).await;
                Ok(())
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("azure.mp3");

        let adapter = AzureSynthesizer::new("voice", &config_with("k", "eastus"))
            .unwrap()
            .with_transport(Arc::new(PushStream));

        let stream = adapter.attempt("床前明月光", &path).await.unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.last().unwrap().end, 11_000_000);
        assert!(path.exists());
    }
}
