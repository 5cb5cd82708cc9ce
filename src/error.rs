//! Error types for voxsub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing credential for {backend}: {key} is not set")]
    MissingCredential {
        backend: &'static str,
        key: &'static str,
    },

    // Voice dispatch errors
    #[error("Invalid voice name: {name}")]
    InvalidVoiceName { name: String },

    // Synthesis errors (retry-eligible)
    #[error("Synthesis failed: {message}")]
    Synthesis { message: String },

    // Audio container errors
    #[error("Audio error: {message}")]
    Audio { message: String },

    // Subtitle alignment errors
    #[error("Subtitle alignment mismatch: {cues} cues for {lines} script lines")]
    AlignmentMismatch { cues: usize, lines: usize },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TtsError {
    /// Whether another synthesis attempt could plausibly succeed.
    ///
    /// Missing credentials and malformed voice names fail the same way
    /// every time; everything else is worth retrying.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            TtsError::MissingCredential { .. } | TtsError::InvalidVoiceName { .. }
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TtsError>;
