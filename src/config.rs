use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub edge: EdgeConfig,
    pub azure: AzureConfig,
    pub gemini: GeminiConfig,
    pub siliconflow: SiliconFlowConfig,
}

/// Edge read-aloud backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Websocket endpoint override. Defaults to the public consumer
    /// endpoint when unset; tests point this at a local server.
    pub endpoint: Option<String>,
}

/// Azure Cognitive Services speech configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AzureConfig {
    pub speech_key: String,
    pub speech_region: String,
    /// Websocket endpoint override. Defaults to the region endpoint.
    pub endpoint: Option<String>,
}

/// Gemini generative-audio configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Sample rate assumed for raw PCM (audio/L16) responses.
    pub sample_rate: u32,
    /// Channel count assumed for raw PCM responses.
    pub channels: u16,
    pub api_url: String,
}

/// SiliconFlow hosted-model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiliconFlowConfig {
    pub api_key: String,
    pub api_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: crate::defaults::GEMINI_MODEL.to_string(),
            sample_rate: crate::defaults::GEMINI_SAMPLE_RATE,
            channels: crate::defaults::GEMINI_CHANNELS,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for SiliconFlowConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.siliconflow.cn/v1/audio/speech".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXSUB_AZURE_SPEECH_KEY → azure.speech_key
    /// - VOXSUB_AZURE_SPEECH_REGION → azure.speech_region
    /// - VOXSUB_GEMINI_API_KEY → gemini.api_key
    /// - VOXSUB_SILICONFLOW_API_KEY → siliconflow.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("VOXSUB_AZURE_SPEECH_KEY")
            && !key.is_empty()
        {
            self.azure.speech_key = key;
        }

        if let Ok(region) = std::env::var("VOXSUB_AZURE_SPEECH_REGION")
            && !region.is_empty()
        {
            self.azure.speech_region = region;
        }

        if let Ok(key) = std::env::var("VOXSUB_GEMINI_API_KEY")
            && !key.is_empty()
        {
            self.gemini.api_key = key;
        }

        if let Ok(key) = std::env::var("VOXSUB_SILICONFLOW_API_KEY")
            && !key.is_empty()
        {
            self.siliconflow.api_key = key;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxsub/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("voxsub")
            .join("config.toml")
    }
}
