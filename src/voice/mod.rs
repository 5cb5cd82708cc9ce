//! Voice identifier parsing and backend dispatch.
//!
//! A voice identifier is an opaque string selecting both the backend and
//! its voice parameters. It is parsed exactly once, into a closed
//! [`VoiceSelection`], and dispatched from there; no string inspection
//! happens past this module.

pub mod catalog;

pub use catalog::list_voices;

use crate::error::{Result, TtsError};

/// The backend and voice parameters encoded in a voice identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    /// Edge read-aloud streaming voice, e.g. `zh-CN-XiaoxiaoNeural`.
    Edge { voice: String },
    /// Azure Cognitive Services voice in its `-V2` form, e.g.
    /// `zh-CN-XiaoxiaoMultilingualNeural-V2`.
    AzureV2 { voice: String },
    /// Gemini prebuilt voice, e.g. `gemini:Zephyr`.
    Gemini { voice: String },
    /// SiliconFlow hosted model voice, e.g.
    /// `siliconflow:FunAudioLLM/CosyVoice2-0.5B:alex`.
    SiliconFlow { model: String, voice: String },
}

impl VoiceSelection {
    /// Parse a display-form voice identifier.
    ///
    /// Precedence: Azure `-V2` form, then the `gemini:` prefix, then the
    /// `siliconflow:` prefix, then Edge as the default. Gender suffixes
    /// (`-Male`/`-Female`) are display sugar and are stripped.
    pub fn parse(name: &str) -> Result<VoiceSelection> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TtsError::InvalidVoiceName {
                name: name.to_string(),
            });
        }

        let bare = strip_gender_suffix(trimmed);

        if let Some(voice) = bare.strip_suffix("-V2") {
            return Ok(VoiceSelection::AzureV2 {
                voice: voice.trim().to_string(),
            });
        }

        if let Some(voice) = trimmed.strip_prefix("gemini:") {
            let voice = voice.trim();
            if voice.is_empty() {
                return Err(TtsError::InvalidVoiceName {
                    name: name.to_string(),
                });
            }
            return Ok(VoiceSelection::Gemini {
                voice: voice.to_string(),
            });
        }

        if trimmed.starts_with("siliconflow:") {
            // Display format: siliconflow:model:voice-Gender
            let parts: Vec<&str> = trimmed.split(':').collect();
            if parts.len() < 3 || parts[1].is_empty() || parts[2].is_empty() {
                return Err(TtsError::InvalidVoiceName {
                    name: name.to_string(),
                });
            }
            let model = parts[1].to_string();
            let voice = parts[2]
                .split('-')
                .next()
                .unwrap_or(parts[2])
                .to_string();
            if voice.is_empty() {
                return Err(TtsError::InvalidVoiceName {
                    name: name.to_string(),
                });
            }
            return Ok(VoiceSelection::SiliconFlow { model, voice });
        }

        Ok(VoiceSelection::Edge {
            voice: bare.to_string(),
        })
    }
}

/// Remove a trailing `-Male` or `-Female` display suffix.
pub fn strip_gender_suffix(name: &str) -> &str {
    name.strip_suffix("-Female")
        .or_else(|| name.strip_suffix("-Male"))
        .unwrap_or(name)
        .trim()
}
