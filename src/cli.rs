//! Command-line interface for voxsub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Text-to-speech synthesis with time-aligned SRT subtitles
#[derive(Parser, Debug)]
#[command(
    name = "voxsub",
    version = Box::leak(crate::version_string().into_boxed_str()) as &'static str,
    about = "Text-to-speech synthesis with time-aligned SRT subtitles"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize speech and write audio plus optional SRT subtitles
    Synth {
        /// Text to synthesize; reads stdin when omitted
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,

        /// Voice identifier (see `voxsub voices`)
        #[arg(long, value_name = "VOICE")]
        voice: String,

        /// Speech rate multiplier (1.0 = unchanged)
        #[arg(long, value_name = "RATE", default_value = "1.0")]
        rate: f32,

        /// Volume multiplier, 0.6 to 5.0 (1.0 = unchanged)
        #[arg(long, value_name = "VOLUME", default_value = "1.0")]
        volume: f32,

        /// Output audio file path
        #[arg(short, long, value_name = "PATH")]
        out: PathBuf,

        /// Output SRT subtitle file path
        #[arg(long, value_name = "PATH")]
        srt: Option<PathBuf>,
    },

    /// List available voices across all backends
    Voices {
        /// Locale prefix filter for neural voices (e.g. vi-VN), repeatable
        #[arg(long, value_name = "LOCALE")]
        filter: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_synth_command() {
        let cli = Cli::try_parse_from([
            "voxsub", "synth", "--text", "hello", "--voice", "gemini:Zephyr", "--out",
            "/tmp/a.mp3", "--srt", "/tmp/a.srt",
        ])
        .unwrap();
        match cli.command {
            Commands::Synth {
                text,
                voice,
                rate,
                volume,
                out,
                srt,
            } => {
                assert_eq!(text.as_deref(), Some("hello"));
                assert_eq!(voice, "gemini:Zephyr");
                assert_eq!(rate, 1.0);
                assert_eq!(volume, 1.0);
                assert_eq!(out, PathBuf::from("/tmp/a.mp3"));
                assert_eq!(srt, Some(PathBuf::from("/tmp/a.srt")));
            }
            other => panic!("expected Synth, got {:?}", other),
        }
    }

    #[test]
    fn parses_voices_with_filters() {
        let cli = Cli::try_parse_from(["voxsub", "voices", "--filter", "vi-VN"]).unwrap();
        match cli.command {
            Commands::Voices { filter } => assert_eq!(filter, vec!["vi-VN"]),
            other => panic!("expected Voices, got {:?}", other),
        }
    }

    #[test]
    fn synth_requires_voice_and_out() {
        assert!(Cli::try_parse_from(["voxsub", "synth", "--text", "hi"]).is_err());
    }
}
