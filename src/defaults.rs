//! Default configuration constants for voxsub.
//!
//! This module provides shared constants used across backends and the
//! subtitle pipeline to ensure consistency and eliminate duplication.

/// Number of 100-nanosecond ticks per second.
///
/// All fragment offsets use this unit. It matches the native resolution of
/// the streaming speech services and gives sub-millisecond precision
/// without floating point.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Maximum synthesis attempts per request.
///
/// Transient backend failures (network errors, empty results, cancelled
/// sessions) are retried sequentially up to this many times. Missing
/// credentials and malformed voice identifiers are never retried.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fallback fragment duration when output audio cannot be measured.
///
/// One second in ticks. Used by the hosted-model adapter when neither the
/// written audio nor the sentence split yields usable timing.
pub const FALLBACK_DURATION_TICKS: u64 = TICKS_PER_SECOND;

/// Default sample rate for raw PCM returned by the generative-audio
/// backend (audio/L16 is 24kHz unless the model says otherwise).
pub const GEMINI_SAMPLE_RATE: u32 = 24000;

/// Default channel count for raw PCM returned by the generative-audio
/// backend.
pub const GEMINI_CHANNELS: u16 = 1;

/// Sample width in bytes for 16-bit PCM.
pub const PCM_SAMPLE_WIDTH: u32 = 2;

/// Sample rate requested from the SiliconFlow speech endpoint.
pub const SILICONFLOW_SAMPLE_RATE: u32 = 32000;

/// Default Gemini speech model.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash-preview-tts";
