//! Minimal WAV wrapping and duration measurement.
//!
//! The generative-audio backend returns raw 16-bit PCM that must be put in
//! a container before writing; the hosted-model backend's timing
//! reconstruction needs the duration of the audio it just wrote.

use crate::defaults::TICKS_PER_SECOND;
use crate::error::{Result, TtsError};
use std::path::Path;

/// Wrap raw little-endian 16-bit PCM in a WAV container.
///
/// A trailing odd byte (truncated sample) is dropped.
pub fn write_pcm_wav(path: &Path, pcm: &[u8], sample_rate: u32, channels: u16) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| TtsError::Audio {
        message: format!("Failed to create WAV file: {}", e),
    })?;

    for chunk in pcm.chunks_exact(2) {
        let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
        writer.write_sample(sample).map_err(|e| TtsError::Audio {
            message: format!("Failed to write WAV sample: {}", e),
        })?;
    }

    writer.finalize().map_err(|e| TtsError::Audio {
        message: format!("Failed to finalize WAV file: {}", e),
    })?;

    Ok(())
}

/// Read back a WAV file and return its duration in 100-ns ticks.
pub fn wav_duration_ticks(path: &Path) -> Result<u64> {
    let reader = hound::WavReader::open(path).map_err(|e| TtsError::Audio {
        message: format!("Failed to open WAV file: {}", e),
    })?;

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(TtsError::Audio {
            message: "WAV file reports a zero sample rate".to_string(),
        });
    }

    // duration() is frames (samples per channel)
    let frames = reader.duration() as u64;
    Ok(frames * TICKS_PER_SECOND / spec.sample_rate as u64)
}

/// Duration of a raw PCM buffer in ticks, from its byte length.
pub fn pcm_duration_ticks(byte_len: usize, sample_rate: u32, channels: u16, sample_width: u32) -> u64 {
    let bytes_per_second = sample_rate as u64 * channels as u64 * sample_width as u64;
    if bytes_per_second == 0 {
        return 0;
    }
    byte_len as u64 * TICKS_PER_SECOND / bytes_per_second
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn write_then_measure_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");

        // 24000 mono frames at 24kHz = exactly one second
        let samples = vec![1000i16; 24000];
        write_pcm_wav(&path, &pcm_bytes(&samples), 24000, 1).unwrap();

        assert_eq!(wav_duration_ticks(&path).unwrap(), TICKS_PER_SECOND);
    }

    #[test]
    fn stereo_duration_counts_frames_not_samples() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");

        // 16000 interleaved samples = 8000 frames at 16kHz = 0.5s
        let samples = vec![0i16; 16000];
        write_pcm_wav(&path, &pcm_bytes(&samples), 16000, 2).unwrap();

        assert_eq!(wav_duration_ticks(&path).unwrap(), TICKS_PER_SECOND / 2);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odd.wav");

        let mut pcm = pcm_bytes(&[100i16, 200, 300]);
        pcm.push(0xFF);
        write_pcm_wav(&path, &pcm, 16000, 1).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 3);
    }

    #[test]
    fn empty_pcm_writes_empty_container() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");

        write_pcm_wav(&path, &[], 16000, 1).unwrap();
        assert_eq!(wav_duration_ticks(&path).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_audio_error() {
        let result = wav_duration_ticks(Path::new("/nonexistent/no.wav"));
        assert!(matches!(result, Err(TtsError::Audio { .. })));
    }

    #[test]
    fn pcm_duration_from_byte_length() {
        // 24kHz mono 16-bit: 48000 bytes per second
        assert_eq!(pcm_duration_ticks(48000, 24000, 1, 2), TICKS_PER_SECOND);
        assert_eq!(pcm_duration_ticks(24000, 24000, 1, 2), TICKS_PER_SECOND / 2);
        assert_eq!(pcm_duration_ticks(0, 24000, 1, 2), 0);
    }

    #[test]
    fn pcm_duration_handles_zero_rate() {
        assert_eq!(pcm_duration_ticks(48000, 0, 1, 2), 0);
    }
}
