//! voxsub - text-to-speech synthesis with time-aligned SRT subtitles
//!
//! Converts a block of text into synthesized audio plus a subtitle file
//! whose cues follow the input's sentence boundaries, across several
//! unrelated speech backends.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod fragment;
pub mod split;
pub mod subtitle;
pub mod synth;
pub mod voice;

// Core types
pub use fragment::{FragmentStream, TimedFragment};
pub use subtitle::SubtitleCue;
pub use voice::VoiceSelection;

// Entry points
pub use subtitle::create_subtitle;
pub use synth::{SpeechBackend, synthesize};
pub use voice::list_voices;

// Error handling
pub use error::{Result, TtsError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
